//! Binding of generic record trees to typed records.
//!
//! Binding collects every problem in a record before failing, so one error
//! names all missing and unreadable fields at once.

use std::fmt;

use thiserror::Error;

use crate::normalize::parse_numbers;
use crate::tree::{RecordNode, RecordTree};

/// A typed record that can be read from a record tree.
pub trait FromRecord: Sized {
    /// Record name used in error messages.
    const RECORD: &'static str;

    fn from_record(tree: &RecordTree) -> Result<Self, BindError>;
}

/// A record failed to bind.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{record}: {}", describe(.problems))]
pub struct BindError {
    pub record: &'static str,
    pub problems: Vec<FieldProblem>,
}

fn describe(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldProblem {
    /// Dotted field path, with `[i]` for list elements.
    pub path: String,
    pub kind: ProblemKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProblemKind {
    Missing,
    Invalid { value: String, expected: &'static str },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ProblemKind::Missing => write!(f, "missing required field `{}`", self.path),
            ProblemKind::Invalid { value, expected } => {
                write!(f, "`{}` = `{value}` is not a valid {expected}", self.path)
            }
        }
    }
}

/// Reads fields out of one record tree, collecting problems as it goes.
pub struct FieldReader<'a> {
    record: &'static str,
    tree: &'a RecordTree,
    problems: Vec<FieldProblem>,
}

impl<'a> FieldReader<'a> {
    pub fn new(record: &'static str, tree: &'a RecordTree) -> Self {
        Self {
            record,
            tree,
            problems: Vec::new(),
        }
    }

    fn missing(&mut self, path: &str) {
        self.problems.push(FieldProblem {
            path: path.to_string(),
            kind: ProblemKind::Missing,
        });
    }

    fn invalid(&mut self, path: &str, value: &str, expected: &'static str) {
        self.problems.push(FieldProblem {
            path: path.to_string(),
            kind: ProblemKind::Invalid {
                value: value.to_string(),
                expected,
            },
        });
    }

    /// Text at `path`; an empty value counts as absent.
    fn text(&mut self, path: &str) -> Option<&'a str> {
        match self.tree.lookup(path)? {
            RecordNode::Scalar(value) => {
                let value = value.trim();
                (!value.is_empty()).then_some(value)
            }
            other => {
                self.invalid(path, other.kind_name(), "scalar");
                None
            }
        }
    }

    pub fn optional_string(&mut self, path: &str) -> Option<String> {
        self.text(path).map(str::to_string)
    }

    pub fn required_string(&mut self, path: &str) -> String {
        self.optional_string(path).unwrap_or_else(|| {
            self.missing(path);
            String::new()
        })
    }

    pub fn optional_f64(&mut self, path: &str) -> Option<f64> {
        let text = self.text(path)?;
        match text.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.invalid(path, text, "number");
                None
            }
        }
    }

    pub fn required_f64(&mut self, path: &str) -> f64 {
        if self.tree.lookup(path).is_none() {
            self.missing(path);
            return 0.0;
        }
        self.optional_f64(path).unwrap_or_default()
    }

    /// Integers may be written with a zero fraction, e.g. `3.0`.
    pub fn optional_i64(&mut self, path: &str) -> Option<i64> {
        let text = self.text(path)?;
        if let Ok(value) = text.parse::<i64>() {
            return Some(value);
        }
        match text.parse::<f64>() {
            Ok(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                Some(value as i64)
            }
            _ => {
                self.invalid(path, text, "integer");
                None
            }
        }
    }

    pub fn required_i64(&mut self, path: &str) -> i64 {
        if self.tree.lookup(path).is_none() {
            self.missing(path);
            return 0;
        }
        self.optional_i64(path).unwrap_or_default()
    }

    pub fn required_usize(&mut self, path: &str) -> usize {
        let value = self.required_i64(path);
        usize::try_from(value).unwrap_or_else(|_| {
            self.invalid(path, &value.to_string(), "non-negative integer");
            0
        })
    }

    pub fn required_u32(&mut self, path: &str) -> u32 {
        let value = self.required_i64(path);
        u32::try_from(value).unwrap_or_else(|_| {
            self.invalid(path, &value.to_string(), "non-negative integer");
            0
        })
    }

    /// Numeric array at `path`, whether already split or still raw text.
    pub fn numbers(&mut self, path: &str) -> Option<Vec<f64>> {
        match self.tree.lookup(path)? {
            RecordNode::Numbers(values) => Some(values.clone()),
            RecordNode::Scalar(text) => Some(parse_numbers(path, text)),
            other => {
                self.invalid(path, other.kind_name(), "number list");
                None
            }
        }
    }

    /// Binds the block at `path` when present.
    pub fn child<T: FromRecord>(&mut self, path: &str) -> Option<T> {
        match self.tree.lookup(path)? {
            RecordNode::Tree(tree) => self.nested(path, tree),
            other => {
                self.invalid(path, other.kind_name(), "block");
                None
            }
        }
    }

    /// Binds every element of the repeated block at `path`; absent lists are empty.
    pub fn list<T: FromRecord>(&mut self, path: &str) -> Vec<T> {
        let Some(node) = self.tree.lookup(path) else {
            return Vec::new();
        };
        let Some(items) = node.as_list() else {
            self.invalid(path, node.kind_name(), "block list");
            return Vec::new();
        };
        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| self.nested(&format!("{path}[{index}]"), item))
            .collect()
    }

    fn nested<T: FromRecord>(&mut self, prefix: &str, tree: &RecordTree) -> Option<T> {
        match T::from_record(tree) {
            Ok(value) => Some(value),
            Err(error) => {
                self.problems
                    .extend(error.problems.into_iter().map(|problem| FieldProblem {
                        path: format!("{prefix}.{}", problem.path),
                        kind: problem.kind,
                    }));
                None
            }
        }
    }

    /// Returns `value` unless any field read so far had a problem.
    pub fn finish<T>(self, value: T) -> Result<T, BindError> {
        if self.problems.is_empty() {
            Ok(value)
        } else {
            Err(BindError {
                record: self.record,
                problems: self.problems,
            })
        }
    }
}

/// Binds a whole tree as `T`.
pub fn bind<T: FromRecord>(tree: &RecordTree) -> Result<T, BindError> {
    T::from_record(tree)
}

/// Binds the repeated block `key` of a record file's root.
pub fn bind_list<T: FromRecord>(tree: &RecordTree, key: &str) -> Result<Vec<T>, BindError> {
    let mut fields = FieldReader::new(T::RECORD, tree);
    let items = fields.list(key);
    fields.finish(items)
}
