use serde::{Deserialize, Serialize};

use super::types::{ItemData, ItemFlags, ModelPath, Orientation, Role, Value};

/// Every message exchanged between a model mirror and its remote source
///
/// Requests travel from the mirror to the remote side, replies and change
/// notifications travel back. `SyncBarrier` travels both ways: the mirror
/// sends a fresh value on every reset and the remote side echoes it once
/// everything it queued before that point has been delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    // ========================================
    // MIRROR → REMOTE
    // ========================================
    /// Ask for the row and column count below `path`
    RowColumnCountRequest { path: ModelPath },
    /// Ask for all role values and flags of the cell at `path`
    ContentRequest { path: ModelPath },
    /// Ask for the header data of one section
    HeaderRequest {
        orientation: Orientation,
        section: usize,
    },
    /// Ask the remote side to change a cell value
    SetDataRequest {
        path: ModelPath,
        role: Role,
        value: Value,
    },

    // ========================================
    // BOTH DIRECTIONS
    // ========================================
    SyncBarrier(u64),

    // ========================================
    // REMOTE → MIRROR
    // ========================================
    RowColumnCountReply {
        path: ModelPath,
        rows: usize,
        columns: usize,
    },
    ContentReply {
        path: ModelPath,
        data: ItemData,
        flags: ItemFlags,
    },
    HeaderReply {
        orientation: Orientation,
        section: usize,
        data: ItemData,
    },
    /// Cached content in the rectangle spanned by `begin` and `end` is stale
    ContentChanged { begin: ModelPath, end: ModelPath },
    /// Cached header sections `first..last` are stale
    HeaderChanged {
        orientation: Orientation,
        first: usize,
        last: usize,
    },
    /// Rows `first..=last` were inserted below `parent`
    RowsAdded {
        parent: ModelPath,
        first: usize,
        last: usize,
    },
    /// Rows `first..=last` were removed below `parent`
    RowsRemoved {
        parent: ModelPath,
        first: usize,
        last: usize,
    },
    RowsMoved {
        source_parent: ModelPath,
        first: usize,
        last: usize,
        destination_parent: ModelPath,
        destination_row: usize,
    },
    ColumnsAdded {
        parent: ModelPath,
        first: usize,
        last: usize,
    },
    ColumnsMoved {
        source_parent: ModelPath,
        first: usize,
        last: usize,
        destination_parent: ModelPath,
        destination_column: usize,
    },
    ColumnsRemoved {
        parent: ModelPath,
        first: usize,
        last: usize,
    },
    LayoutChanged,
    Reset,
}

impl Message {
    /// Short name of the message kind, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Message::RowColumnCountRequest { .. } => "RowColumnCountRequest",
            Message::ContentRequest { .. } => "ContentRequest",
            Message::HeaderRequest { .. } => "HeaderRequest",
            Message::SetDataRequest { .. } => "SetDataRequest",
            Message::SyncBarrier(_) => "SyncBarrier",
            Message::RowColumnCountReply { .. } => "RowColumnCountReply",
            Message::ContentReply { .. } => "ContentReply",
            Message::HeaderReply { .. } => "HeaderReply",
            Message::ContentChanged { .. } => "ContentChanged",
            Message::HeaderChanged { .. } => "HeaderChanged",
            Message::RowsAdded { .. } => "RowsAdded",
            Message::RowsRemoved { .. } => "RowsRemoved",
            Message::RowsMoved { .. } => "RowsMoved",
            Message::ColumnsAdded { .. } => "ColumnsAdded",
            Message::ColumnsMoved { .. } => "ColumnsMoved",
            Message::ColumnsRemoved { .. } => "ColumnsRemoved",
            Message::LayoutChanged => "LayoutChanged",
            Message::Reset => "Reset",
        }
    }

    /// Whether this message originates from the mirror side
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Message::RowColumnCountRequest { .. }
                | Message::ContentRequest { .. }
                | Message::HeaderRequest { .. }
                | Message::SetDataRequest { .. }
        )
    }
}
