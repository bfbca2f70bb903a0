//! Node table holding the partial local copy of the remote tree
//!
//! Nodes live in a flat table keyed by [`NodeId`]. A node owns its
//! children through the ordered `children` list; the `parent` link is only
//! used for lookups. Ids are handed out from a counter that is never rewound,
//! so an id that was discarded (row removal or reset) never resolves again.

use std::collections::HashMap;

use crate::protocol::{ItemFlags, Role, Value};

/// Stable identity of a mirrored node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Fetch state of a row or column count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Count {
    /// Never requested
    #[default]
    Unknown,
    /// Requested, reply outstanding
    Pending,
    Known(usize),
}

impl Count {
    pub fn known(self) -> Option<usize> {
        match self {
            Count::Known(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Count::Known(_))
    }
}

/// One mirrored item (a row at some depth)
#[derive(Debug, Default)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub rows: Count,
    pub columns: Count,
    /// Column → role values. An empty map marks an outstanding content request.
    pub data: HashMap<usize, HashMap<Role, Value>>,
    pub flags: HashMap<usize, ItemFlags>,
}

impl Node {
    fn with_parent(parent: NodeId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct NodeTable {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTable {
    pub fn new() -> Self {
        let root = NodeId(1);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::default());
        Self {
            nodes,
            root,
            next_id: 2,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drop the whole tree and install a fresh, empty root
    ///
    /// The new root gets a new id so handles into the old tree go stale.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.root = self.allocate_id();
        self.nodes.insert(self.root, Node::default());
    }

    /// Give `id` `rows` fresh children and record both counts
    pub fn populate(&mut self, id: NodeId, rows: usize, columns: usize) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        let children: Vec<NodeId> = (0..rows).map(|_| self.spawn_child(id)).collect();
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.children = children;
        node.rows = Count::Known(rows);
        node.columns = Count::Known(columns);
        true
    }

    /// Splice `count` fresh children into `parent` at row `first`
    ///
    /// The parent's row count must be known and `first` must not be past
    /// the end of its children; otherwise nothing changes.
    pub fn insert_children(&mut self, parent: NodeId, first: usize, count: usize) -> bool {
        match self.nodes.get(&parent) {
            Some(node) if node.rows.is_known() && first <= node.children.len() => {}
            _ => return false,
        }
        let fresh: Vec<NodeId> = (0..count).map(|_| self.spawn_child(parent)).collect();
        let Some(node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        node.children.splice(first..first, fresh);
        node.rows = Count::Known(node.children.len());
        true
    }

    /// Remove children `first..=last` of `parent` together with their subtrees
    pub fn remove_children(&mut self, parent: NodeId, first: usize, last: usize) -> bool {
        let removed: Vec<NodeId> = match self.nodes.get_mut(&parent) {
            Some(node) if node.rows.is_known() && first <= last && last < node.children.len() => {
                let removed = node.children.drain(first..=last).collect();
                node.rows = Count::Known(node.children.len());
                removed
            }
            _ => return false,
        };
        for id in removed {
            self.discard(id);
        }
        true
    }

    /// Check that every node with a known row count has exactly that many children
    pub fn is_consistent(&self) -> bool {
        self.nodes.values().all(|node| match node.rows {
            Count::Known(n) => n == node.children.len(),
            _ => node.children.is_empty(),
        })
    }

    fn spawn_child(&mut self, parent: NodeId) -> NodeId {
        let id = self.allocate_id();
        self.nodes.insert(id, Node::with_parent(parent));
        id
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn discard(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                stack.extend(node.children);
            }
        }
    }
}
