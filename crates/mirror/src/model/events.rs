//! Positions handed to consumers and the change notifications they receive

use std::ops::Range;

use crate::protocol::Orientation;

use super::node::NodeId;

/// A consumer-side handle to one cell of the mirror
///
/// `None` in place of a `ModelIndex` stands for the root. A handle stays
/// valid until its row is removed or the mirror is reset; after that every
/// query on it answers as if nothing were there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    node: NodeId,
}

impl ModelIndex {
    pub(crate) fn new(row: usize, column: usize, node: NodeId) -> Self {
        Self { row, column, node }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// Change notifications emitted after a mutation has been fully applied
///
/// Row and column ranges are inclusive, header ranges are half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    ColumnsInserted {
        parent: Option<ModelIndex>,
        first: usize,
        last: usize,
    },
    RowsInserted {
        parent: Option<ModelIndex>,
        first: usize,
        last: usize,
    },
    RowsRemoved {
        parent: Option<ModelIndex>,
        first: usize,
        last: usize,
    },
    DataChanged {
        top_left: ModelIndex,
        bottom_right: ModelIndex,
    },
    HeaderDataChanged {
        orientation: Orientation,
        sections: Range<usize>,
    },
    /// Everything previously observed is gone
    Reset,
}

/// Fan-out of model events to any number of subscribers
#[derive(Debug, Default)]
pub(crate) struct EventSink {
    subscribers: Vec<flume::Sender<ModelEvent>>,
}

impl EventSink {
    pub fn subscribe(&mut self) -> flume::Receiver<ModelEvent> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: ModelEvent) {
        tracing::trace!(?event, "model event");
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}
