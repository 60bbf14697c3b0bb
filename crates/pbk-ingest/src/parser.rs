//! Parser for the planning system's nested record notation.
//!
//! A record is a sequence of assignments and named blocks:
//!
//! ```text
//! Name = "sMLC";            // assignment, '=' form
//! patient_position : HFS    // assignment, ':' form
//! Beam ={                   // block
//!   Name = "Med Lt Brst";
//! };
//! Points[] ={               // block of raw numeric data
//!   0.5, 0.5,
//! };
//! ```
//!
//! Parsing runs in three passes: comments are blanked out, each line is
//! split into block-open, block-close and statement events, and the events
//! are folded into a [`RecordTree`] by a stack of open blocks. Kind-specific
//! post-processing then runs over the finished tree.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::error::{IngestError, Result};
use crate::kind::{RecordKind, is_placeholder};
use crate::normalize::normalize;
use crate::tree::{RecordNode, RecordTree};

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_#][A-Za-z0-9_#.]*)(?:\[\])?\s*[=:]\s*(.*)$")
        .expect("Invalid assignment regex")
});

/// Structural error in a record's text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line_number}: {reason}: `{line}`")]
pub struct MalformedRecord {
    pub line_number: usize,
    pub line: String,
    pub reason: MalformedReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    UnexpectedClose,
    UnclosedBlock,
    UnnamedBlock,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnexpectedClose => "closing brace without an open block",
            Self::UnclosedBlock => "block is never closed",
            Self::UnnamedBlock => "block has no name",
        })
    }
}

/// Parses record text into a tree.
pub fn parse_record(
    text: &str,
    kind: RecordKind,
) -> std::result::Result<RecordTree, MalformedRecord> {
    let cleaned = strip_comments(text);
    let source_lines: Vec<&str> = text.lines().collect();
    let mut builder = TreeBuilder::new(kind);
    for (index, line) in cleaned.lines().enumerate() {
        let line_number = index + 1;
        let original = source_lines.get(index).copied().unwrap_or(line);
        for event in line_events(line) {
            builder.apply(event, line_number, original)?;
        }
    }
    let mut root = builder.finish()?;
    normalize(kind, &mut root);
    trace!(kind = %kind, fields = root.len(), "parsed record");
    Ok(root)
}

/// Reads and parses one record file.
pub fn parse_record_file(path: &Path, kind: RecordKind) -> Result<RecordTree> {
    if !path.is_file() {
        return Err(IngestError::DataFileMissing {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    debug!(path = %path.display(), kind = %kind, bytes = bytes.len(), "parsing record");
    parse_record(&text, kind).map_err(|source| IngestError::MalformedRecord {
        path: path.to_path_buf(),
        source,
    })
}

/// Blanks `//` and `/* */` comments outside quoted strings, keeping line breaks.
fn strip_comments(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Quoted,
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '"' => {
                    state = State::Quoted;
                    out.push(c);
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                _ => out.push(c),
            },
            State::Quoted => {
                if c == '"' || c == '\n' {
                    state = State::Code;
                }
                out.push(c);
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                    out.push(c);
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                } else if c == '\n' {
                    out.push(c);
                }
            }
        }
    }
    out
}

#[derive(Debug, PartialEq)]
enum Event {
    Open(String),
    Close,
    Statement(String),
}

/// Splits one comment-free line into structural events.
fn line_events(line: &str) -> Vec<Event> {
    let mut events = Vec::new();
    let mut pending = String::new();
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending.push(c);
            }
            '{' if !quoted => {
                events.push(Event::Open(pending.trim().to_string()));
                pending.clear();
            }
            '}' if !quoted => {
                flush_statement(&mut pending, &mut events);
                events.push(Event::Close);
            }
            ';' if !quoted => flush_statement(&mut pending, &mut events),
            _ => pending.push(c),
        }
    }
    flush_statement(&mut pending, &mut events);
    events
}

fn flush_statement(pending: &mut String, events: &mut Vec<Event>) {
    let statement = pending.trim();
    if !statement.is_empty() {
        events.push(Event::Statement(statement.to_string()));
    }
    pending.clear();
}

/// Block name from an opening header such as `Beam =` or `Points[] =`.
fn block_name(header: &str) -> &str {
    let name = header.trim_end_matches(|c: char| c == '=' || c.is_whitespace());
    name.strip_suffix("[]").unwrap_or(name).trim()
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

struct Frame {
    name: String,
    line_number: usize,
    line: String,
    tree: RecordTree,
    raw: Vec<String>,
}

impl Frame {
    fn new(name: String, line_number: usize, line: &str) -> Self {
        Self {
            name,
            line_number,
            line: line.trim().to_string(),
            tree: RecordTree::new(),
            raw: Vec::new(),
        }
    }

    fn into_node(self) -> RecordNode {
        if self.tree.is_empty() && !self.raw.is_empty() {
            return RecordNode::Scalar(self.raw.join(" "));
        }
        if !self.raw.is_empty() {
            debug!(
                block = %self.name,
                line = self.line_number,
                "ignoring raw text inside a block with fields"
            );
        }
        RecordNode::Tree(self.tree)
    }
}

struct TreeBuilder {
    kind: RecordKind,
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            stack: vec![Frame::new(String::new(), 0, "")],
        }
    }

    fn current(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn apply(
        &mut self,
        event: Event,
        line_number: usize,
        line: &str,
    ) -> std::result::Result<(), MalformedRecord> {
        match event {
            Event::Open(header) => {
                let name = block_name(&header);
                if name.is_empty() {
                    return Err(malformed(line_number, line, MalformedReason::UnnamedBlock));
                }
                self.stack.push(Frame::new(name.to_string(), line_number, line));
            }
            Event::Close => {
                if self.stack.len() < 2 {
                    return Err(malformed(line_number, line, MalformedReason::UnexpectedClose));
                }
                if let Some(frame) = self.stack.pop() {
                    self.attach(frame);
                }
            }
            Event::Statement(text) => {
                let frame = self.current();
                match ASSIGNMENT.captures(&text) {
                    Some(captures) => {
                        let key = captures[1].to_string();
                        let value = unquote(&captures[2]).to_string();
                        frame.tree.insert(key, RecordNode::Scalar(value));
                    }
                    None => frame.raw.push(text),
                }
            }
        }
        Ok(())
    }

    /// Hangs a closed block on its parent.
    fn attach(&mut self, frame: Frame) {
        let kind = self.kind;
        let name = frame.name.clone();
        let parent = self.current();
        if is_placeholder(&name) {
            let list_name = kind.placeholder_list_name(&parent.name);
            parent.tree.push_item(&list_name, into_item(frame));
        } else if kind.is_marker(&name) {
            parent.tree.push_item(&name, into_item(frame));
        } else {
            let node = frame.into_node();
            parent.tree.insert(name, node);
        }
    }

    fn finish(mut self) -> std::result::Result<RecordTree, MalformedRecord> {
        if self.stack.len() > 1 {
            let frame = self.current();
            return Err(MalformedRecord {
                line_number: frame.line_number,
                line: frame.line.clone(),
                reason: MalformedReason::UnclosedBlock,
            });
        }
        Ok(self
            .stack
            .pop()
            .map(|frame| frame.tree)
            .unwrap_or_default())
    }
}

/// List elements are always blocks; raw-only elements keep their text under `Value`.
fn into_item(frame: Frame) -> RecordTree {
    match frame.into_node() {
        RecordNode::Tree(tree) => tree,
        other => {
            let mut tree = RecordTree::new();
            tree.insert("Value", other);
            tree
        }
    }
}

fn malformed(line_number: usize, line: &str, reason: MalformedReason) -> MalformedRecord {
    MalformedRecord {
        line_number,
        line: line.trim().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments_outside_quotes() {
        let text = "A = \"http://x\"; // note\n/* block\n comment */B = 2;";
        let cleaned = strip_comments(text);
        assert_eq!(cleaned, "A = \"http://x\"; \n\nB = 2;");
    }

    #[test]
    fn splits_events_on_one_line() {
        let events = line_events("#0 ={ String = \"a;b\"; };");
        assert_eq!(
            events,
            vec![
                Event::Open("#0 =".to_string()),
                Event::Statement("String = \"a;b\"".to_string()),
                Event::Close,
            ]
        );
    }

    #[test]
    fn block_names_drop_brackets_and_equals() {
        assert_eq!(block_name("Points[] ="), "Points");
        assert_eq!(block_name("roi="), "roi");
        assert_eq!(block_name("#3 ="), "#3");
    }

    #[test]
    fn parses_both_assignment_forms() {
        let tree = parse_record(
            "x_dim = 512;\npatient_position : HFS\nName = \"LT BREAST\";",
            RecordKind::Generic,
        )
        .unwrap();
        assert_eq!(tree.scalar("x_dim"), Some("512"));
        assert_eq!(tree.scalar("patient_position"), Some("HFS"));
        assert_eq!(tree.scalar("Name"), Some("LT BREAST"));
    }

    #[test]
    fn reports_unexpected_close() {
        let error = parse_record("A = 1;\n};\n", RecordKind::Generic).unwrap_err();
        assert_eq!(error.line_number, 2);
        assert_eq!(error.reason, MalformedReason::UnexpectedClose);
    }

    #[test]
    fn reports_unclosed_block() {
        let error = parse_record("Trial ={\n  Name = \"x\";\n", RecordKind::Trial).unwrap_err();
        assert_eq!(error.line_number, 1);
        assert_eq!(error.line, "Trial ={");
        assert_eq!(error.reason, MalformedReason::UnclosedBlock);
    }
}
