//! Translation between structural paths and local node identities

use crate::protocol::{ModelPath, PathSegment};

use super::node::{NodeId, NodeTable};

impl NodeTable {
    /// Follow the rows of `path` down from the root
    ///
    /// Returns `None` if any row is outside the children materialized so far.
    pub fn resolve_path(&self, path: &ModelPath) -> Option<NodeId> {
        let mut current = self.root();
        for segment in path.segments() {
            current = *self.get(current)?.children.get(segment.row)?;
        }
        Some(current)
    }

    /// Parent and row of a non-root node
    pub fn position_of(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.get(id)?.parent?;
        let row = self.get(parent)?.children.iter().position(|child| *child == id)?;
        Some((parent, row))
    }

    /// Structural path of the cell at `column` of node `id`
    ///
    /// Ancestors contribute their row in column 0. The root maps to the
    /// empty path; a discarded node maps to `None`.
    pub fn path_of(&self, id: NodeId, column: usize) -> Option<ModelPath> {
        if id == self.root() {
            return Some(ModelPath::root());
        }
        self.get(id)?;

        let mut segments = Vec::new();
        let mut current = id;
        let mut current_column = column;
        while current != self.root() {
            let (parent, row) = self.position_of(current)?;
            segments.push(PathSegment::new(row, current_column));
            current = parent;
            current_column = 0;
        }
        segments.reverse();
        Some(segments.into_iter().collect())
    }
}
