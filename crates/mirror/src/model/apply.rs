//! Inbound message handling
//!
//! Each handler validates its target before touching the tree, so a message
//! that does not fit the current mirror is dropped without partial effects.
//! Notifications are emitted after the mutation is complete.

use crate::protocol::{Envelope, ItemData, ItemFlags, Message, ModelPath, Orientation};
use crate::transport::Transport;

use super::events::{ModelEvent, ModelIndex};
use super::node::Count;
use super::RemoteModel;

impl<T: Transport> RemoteModel<T> {
    pub(super) fn handle_message(&mut self, envelope: Envelope) {
        if envelope.address != self.address {
            tracing::debug!(
                address = %envelope.address,
                kind = envelope.message.name(),
                "message for another object, dropping"
            );
            return;
        }

        let message = envelope.message;
        if message.is_request() {
            tracing::warn!(kind = message.name(), "received a request, ignoring");
            return;
        }
        if !self.barrier.admit(&message) {
            tracing::trace!(
                kind = message.name(),
                current = self.barrier.current(),
                target = self.barrier.target(),
                "message predates the last reset, dropping"
            );
            return;
        }

        match message {
            Message::RowColumnCountReply {
                path,
                rows,
                columns,
            } => self.apply_row_column_count(&path, rows, columns),
            Message::ContentReply { path, data, flags } => self.apply_content(&path, data, flags),
            Message::HeaderReply {
                orientation,
                section,
                data,
            } => self.apply_header(orientation, section, data),
            Message::ContentChanged { begin, end } => self.apply_content_changed(&begin, &end),
            Message::HeaderChanged {
                orientation,
                first,
                last,
            } => self.apply_header_changed(orientation, first, last),
            Message::RowsAdded {
                parent,
                first,
                last,
            } => self.apply_rows_added(&parent, first, last),
            Message::RowsRemoved {
                parent,
                first,
                last,
            } => self.apply_rows_removed(&parent, first, last),
            Message::RowsMoved { .. }
            | Message::ColumnsAdded { .. }
            | Message::ColumnsMoved { .. }
            | Message::ColumnsRemoved { .. }
            | Message::LayoutChanged => {
                // TODO: mirror moves, column changes and layout changes instead of ignoring them
                tracing::debug!(kind = message.name(), "not implemented yet, ignoring");
            }
            Message::Reset => self.clear(),
            // consumed above
            Message::SyncBarrier(_)
            | Message::RowColumnCountRequest { .. }
            | Message::ContentRequest { .. }
            | Message::HeaderRequest { .. }
            | Message::SetDataRequest { .. } => {}
        }
    }

    fn apply_row_column_count(&mut self, path: &ModelPath, rows: usize, columns: usize) {
        let Some(id) = self.nodes.resolve_path(path) else {
            tracing::warn!(%path, "row/column count for unknown node");
            return;
        };
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.rows != Count::Pending {
            tracing::warn!(%path, rows = ?node.rows, "unexpected row/column count reply");
            return;
        }

        // an empty reply leaves the node pending: it is never re-requested and
        // structural changes below it are ignored until the next reset
        if rows == 0 || columns == 0 {
            tracing::debug!(%path, rows, columns, "empty row/column count");
            return;
        }

        let parent = self.index_for_node(id, 0);
        tracing::debug!(%path, rows, columns, "inserting rows and columns");
        if let Some(node) = self.nodes.get_mut(id) {
            node.columns = Count::Known(columns);
        }
        self.events.emit(ModelEvent::ColumnsInserted {
            parent,
            first: 0,
            last: columns - 1,
        });

        self.nodes.populate(id, rows, columns);
        self.events.emit(ModelEvent::RowsInserted {
            parent,
            first: 0,
            last: rows - 1,
        });
    }

    fn apply_content(&mut self, path: &ModelPath, data: ItemData, flags: ItemFlags) {
        let (Some(id), Some(segment)) = (self.nodes.resolve_path(path), path.last()) else {
            tracing::warn!(%path, "content for unknown cell");
            return;
        };
        let column = segment.column;
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.data.entry(column).or_default().extend(data);
        node.flags.insert(column, flags);

        let index = ModelIndex::new(segment.row, column, id);
        self.events.emit(ModelEvent::DataChanged {
            top_left: index,
            bottom_right: index,
        });
    }

    fn apply_header(&mut self, orientation: Orientation, section: usize, data: ItemData) {
        self.headers
            .insert(orientation, section, data.into_iter().collect());

        let root = self.nodes.get(self.nodes.root());
        let extent = match orientation {
            Orientation::Horizontal => root.and_then(|r| r.columns.known()),
            Orientation::Vertical => root.and_then(|r| r.rows.known()),
        };
        if extent.is_some_and(|extent| extent > section) {
            self.events.emit(ModelEvent::HeaderDataChanged {
                orientation,
                sections: section..section + 1,
            });
        }
    }

    fn apply_content_changed(&mut self, begin: &ModelPath, end: &ModelPath) {
        let Some(id) = self.nodes.resolve_path(begin) else {
            tracing::warn!(%begin, "content change for unknown node");
            return;
        };
        if id == self.nodes.root() {
            return;
        }
        let (Some(first), Some(last)) = (begin.last(), end.last()) else {
            return;
        };
        if first.row > last.row || first.column > last.column {
            tracing::warn!(%begin, %end, "inverted content change range");
            return;
        }
        let Some(rows) = self
            .nodes
            .get(id)
            .and_then(|node| node.parent)
            .and_then(|parent| self.nodes.get(parent))
            .and_then(|parent| parent.children.get(first.row..=last.row))
            .map(<[_]>::to_vec)
        else {
            tracing::warn!(%begin, %end, "content change outside known rows");
            return;
        };

        // drop cached content so the next query refetches it
        let columns = first.column..=last.column;
        for row in &rows {
            if let Some(node) = self.nodes.get_mut(*row) {
                node.data.retain(|column, _| !columns.contains(column));
                node.flags.retain(|column, _| !columns.contains(column));
            }
        }

        let top_left = ModelIndex::new(first.row, first.column, id);
        let bottom_right = ModelIndex::new(last.row, last.column, rows[rows.len() - 1]);
        self.events.emit(ModelEvent::DataChanged {
            top_left,
            bottom_right,
        });
    }

    fn apply_header_changed(&mut self, orientation: Orientation, first: usize, last: usize) {
        self.headers.remove_range(orientation, first..last);
        self.events.emit(ModelEvent::HeaderDataChanged {
            orientation,
            sections: first..last,
        });
    }

    fn apply_rows_added(&mut self, parent: &ModelPath, first: usize, last: usize) {
        // we don't know the parent yet, so we don't care about changes to it either
        let Some(id) = self.nodes.resolve_path(parent) else {
            return;
        };
        if !self.nodes.get(id).is_some_and(|node| node.rows.is_known()) {
            return;
        }
        let Some(count) = last.checked_sub(first).and_then(|n| n.checked_add(1)) else {
            tracing::warn!(%parent, first, last, "invalid row range");
            return;
        };
        if !self.nodes.insert_children(id, first, count) {
            tracing::warn!(%parent, first, last, "rows added outside known rows");
            return;
        }
        debug_assert!(self.nodes.is_consistent());

        self.events.emit(ModelEvent::RowsInserted {
            parent: self.index_for_node(id, 0),
            first,
            last,
        });
    }

    fn apply_rows_removed(&mut self, parent: &ModelPath, first: usize, last: usize) {
        let Some(id) = self.nodes.resolve_path(parent) else {
            return;
        };
        if !self.nodes.get(id).is_some_and(|node| node.rows.is_known()) {
            return;
        }
        if !self.nodes.remove_children(id, first, last) {
            tracing::warn!(%parent, first, last, "rows removed outside known rows");
            return;
        }
        debug_assert!(self.nodes.is_consistent());

        self.events.emit(ModelEvent::RowsRemoved {
            parent: self.index_for_node(id, 0),
            first,
            last,
        });
    }
}
