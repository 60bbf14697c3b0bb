//! Generic record tree produced by the parser.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One value in a record tree.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum RecordNode {
    /// Leaf value, kept as text.
    Scalar(String),
    /// Leaf value that held a delimiter-joined numeric array.
    Numbers(Vec<f64>),
    /// Named sub-tree.
    Tree(RecordTree),
    /// Repeated blocks sharing one name.
    List(Vec<RecordTree>),
}

impl RecordNode {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&RecordTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RecordTree]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Numbers(_) => "number list",
            Self::Tree(_) => "block",
            Self::List(_) => "block list",
        }
    }
}

/// Ordered map of field name to value.
///
/// Field order follows the source file. The parser and its post-processing
/// are the only writers; everything downstream sees it read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTree {
    entries: Vec<(String, RecordNode)>,
}

impl RecordTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&RecordNode> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    /// Follows a dotted path through nested blocks.
    pub fn lookup(&self, path: &str) -> Option<&RecordNode> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut node = self.get(first)?;
        for segment in segments {
            node = node.as_tree()?.get(segment)?;
        }
        Some(node)
    }

    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RecordNode::as_scalar)
    }

    pub fn tree(&self, key: &str) -> Option<&RecordTree> {
        self.get(key).and_then(RecordNode::as_tree)
    }

    /// Items of a repeated block; empty when the block is absent.
    pub fn list(&self, key: &str) -> &[RecordTree] {
        self.get(key).and_then(RecordNode::as_list).unwrap_or_default()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &RecordNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets a field, replacing an earlier value of the same name in place.
    pub(crate) fn insert(&mut self, key: impl Into<String>, node: RecordNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = node,
            None => self.entries.push((key, node)),
        }
    }

    /// Appends one element to the repeated block `key`, opening it if needed.
    pub(crate) fn push_item(&mut self, key: &str, item: RecordTree) {
        match self.get_mut(key) {
            Some(RecordNode::List(items)) => items.push(item),
            _ => self.insert(key, RecordNode::List(vec![item])),
        }
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut RecordNode> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    pub(crate) fn tree_mut(&mut self, key: &str) -> Option<&mut RecordTree> {
        match self.get_mut(key)? {
            RecordNode::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub(crate) fn list_mut(&mut self, key: &str) -> Option<&mut Vec<RecordTree>> {
        match self.get_mut(key)? {
            RecordNode::List(items) => Some(items),
            _ => None,
        }
    }

    /// Iterates the items of a repeated block for in-place rewriting.
    pub(crate) fn items_mut(&mut self, key: &str) -> std::slice::IterMut<'_, RecordTree> {
        match self.list_mut(key) {
            Some(items) => items.iter_mut(),
            None => Default::default(),
        }
    }

    pub(crate) fn take(&mut self) -> RecordTree {
        std::mem::take(self)
    }
}

impl Serialize for RecordTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}
