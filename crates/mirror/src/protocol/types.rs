//! Value types carried inside model messages
//!
//! These are the building blocks both sides of the channel agree on:
//! positions (`ModelPath`), data roles, item flags, header orientation
//! and the dynamically typed cell `Value`.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// One step of a structural path: a row within the parent, and the column
/// the position refers to at that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    pub row: usize,
    pub column: usize,
}

impl PathSegment {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Position of an item relative to the top of the remote model
///
/// An empty path addresses the (invisible) root. Every other path walks one
/// segment per tree level; only the row of a segment selects a child, the
/// column of the final segment selects the cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelPath(Vec<PathSegment>);

impl ModelPath {
    /// The path of the root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from `(row, column)` pairs, outermost first
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Self {
        pairs
            .iter()
            .map(|&(row, column)| PathSegment::new(row, column))
            .collect()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The segment naming the addressed item itself
    pub fn last(&self) -> Option<PathSegment> {
        self.0.last().copied()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    /// Append a child segment, returning the extended path
    pub fn child(mut self, row: usize, column: usize) -> Self {
        self.0.push(PathSegment::new(row, column));
        self
    }
}

impl FromIterator<PathSegment> for ModelPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", segment.row, segment.column)?;
        }
        write!(f, "]")
    }
}

/// Header orientation
///
/// Horizontal headers label columns, vertical headers label rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Data role identifier
///
/// Roles select which aspect of a cell a value describes. The well-known
/// roles mirror the usual item-model conventions; anything at or above
/// [`Role::USER`] is application defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub i32);

impl Role {
    pub const DISPLAY: Role = Role(0);
    pub const DECORATION: Role = Role(1);
    pub const EDIT: Role = Role(2);
    pub const TOOL_TIP: Role = Role(3);
    pub const STATUS_TIP: Role = Role(4);
    pub const WHATS_THIS: Role = Role(5);
    pub const USER: Role = Role(256);
}

bitflags! {
    /// Capabilities of a cell, as reported by the remote side
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ItemFlags: u32 {
        const SELECTABLE = 1;
        const EDITABLE = 1 << 1;
        const DRAG_ENABLED = 1 << 2;
        const DROP_ENABLED = 1 << 3;
        const USER_CHECKABLE = 1 << 4;
        const ENABLED = 1 << 5;
        const TRISTATE = 1 << 6;
        const NEVER_HAS_CHILDREN = 1 << 7;
    }
}

/// A dynamically typed cell or header value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

/// Role → value map describing one cell or header section
pub type ItemData = BTreeMap<Role, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        assert_eq!(ModelPath::root().to_string(), "[]");
        assert_eq!(ModelPath::from_pairs(&[(1, 0), (2, 3)]).to_string(), "[(1, 0), (2, 3)]");
    }

    #[test]
    fn test_path_child() {
        let path = ModelPath::root().child(4, 0).child(1, 2);
        assert_eq!(path.depth(), 2);
        assert_eq!(path.last(), Some(PathSegment::new(1, 2)));
        assert!(!path.is_root());
        assert!(ModelPath::root().last().is_none());
    }

    #[test]
    fn test_flags_combine() {
        let flags = ItemFlags::SELECTABLE | ItemFlags::ENABLED;
        assert!(flags.contains(ItemFlags::ENABLED));
        assert!(!flags.contains(ItemFlags::EDITABLE));
        assert_eq!(ItemFlags::default(), ItemFlags::empty());
    }
}
