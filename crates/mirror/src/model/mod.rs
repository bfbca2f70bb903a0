//! Client-side mirror of a remote item model
//!
//! # Architecture
//!
//! - `NodeTable`: the partially fetched tree, one node per known row
//! - `address`: path ↔ node translation
//! - `fetch`: on-demand requests for counts, cell content and headers
//! - `apply`: inbound message handling and change notifications
//! - `SyncBarrier` + `lifecycle`: resets and connection churn
//!
//! The model is a plain single-threaded state machine. Queries read the
//! current snapshot and may queue requests; inbound events are applied one
//! at a time via [`RemoteModel::handle_event`]. Hosts that query and feed
//! events from different tasks serialize access themselves (see
//! [`crate::worker`]).

mod address;
mod apply;
mod barrier;
mod events;
mod fetch;
mod headers;
mod lifecycle;
mod node;

#[cfg(test)]
mod testing;

pub use barrier::SyncBarrier;
pub use events::{ModelEvent, ModelIndex};
pub use node::{Count, NodeId};

use crate::config::MirrorConfig;
use crate::protocol::{
    Envelope, ItemFlags, Message, ModelPath, ObjectAddress, Orientation, Role, Value,
};
use crate::transport::{ClientEvent, Inbox, Transport};

use events::EventSink;
use headers::HeaderCache;
use node::NodeTable;

/// Local mirror of one remote model object
pub struct RemoteModel<T: Transport> {
    transport: T,
    config: MirrorConfig,
    address: ObjectAddress,
    nodes: NodeTable,
    headers: HeaderCache,
    barrier: SyncBarrier,
    inbox: Inbox,
    inbox_rx: flume::Receiver<ClientEvent>,
    events: EventSink,
}

impl<T: Transport> std::fmt::Debug for RemoteModel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteModel")
            .field("server_object", &self.config.server_object)
            .field("address", &self.address)
            .field("barrier", &self.barrier)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl<T: Transport> RemoteModel<T> {
    /// Create a mirror of `config.server_object`
    ///
    /// If the object is already known to the transport the mirror connects
    /// right away, otherwise it waits for the object to be registered.
    pub fn new(transport: T, config: MirrorConfig) -> Self {
        let (inbox, inbox_rx) = flume::unbounded();
        transport.subscribe(inbox.clone());
        let address = transport.object_address(&config.server_object);

        let mut model = Self {
            transport,
            config,
            address,
            nodes: NodeTable::new(),
            headers: HeaderCache::default(),
            barrier: SyncBarrier::default(),
            inbox,
            inbox_rx,
            events: EventSink::default(),
        };
        model.connect_to_server();
        model
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_valid()
    }

    pub fn server_object(&self) -> &str {
        &self.config.server_object
    }

    pub fn address(&self) -> ObjectAddress {
        self.address
    }

    pub fn barrier(&self) -> SyncBarrier {
        self.barrier
    }

    /// Receive change notifications from now on
    pub fn subscribe(&mut self) -> flume::Receiver<ModelEvent> {
        self.events.subscribe()
    }

    /// Receiving end of the inbox the transport feeds
    pub fn inbox(&self) -> flume::Receiver<ClientEvent> {
        self.inbox_rx.clone()
    }

    /// Apply every event currently waiting in the inbox
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.handle_event(event);
            processed += 1;
        }
        processed
    }

    /// Apply one inbound event
    pub fn handle_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Message(envelope) => self.handle_message(envelope),
            ClientEvent::ObjectRegistered { name, address } => {
                self.server_registered(&name, address)
            }
            ClientEvent::ObjectUnregistered { name, address } => {
                self.server_unregistered(&name, address)
            }
        }
    }

    // ========================================
    // CONSUMER QUERIES
    // ========================================

    /// Handle of the cell at `(row, column)` below `parent`
    ///
    /// Only positions inside the counts known so far are addressable.
    pub fn index(
        &self,
        row: usize,
        column: usize,
        parent: Option<&ModelIndex>,
    ) -> Option<ModelIndex> {
        if !self.is_connected() {
            return None;
        }
        let parent_node = self.node_for_index(parent)?;
        let node = self.nodes.get(parent_node)?;
        debug_assert!(node.children.len() >= node.rows.known().unwrap_or(0));
        if row >= node.rows.known()? || column >= node.columns.known()? {
            return None;
        }
        Some(ModelIndex::new(row, column, node.children[row]))
    }

    /// Handle of the row containing `index`, `None` for top-level rows
    pub fn parent(&self, index: &ModelIndex) -> Option<ModelIndex> {
        let (parent, _) = self.nodes.position_of(index.node())?;
        if parent == self.nodes.root() {
            return None;
        }
        self.index_for_node(parent, 0)
    }

    /// Number of rows below `parent`
    ///
    /// Answers 0 and requests the counts if they are not known yet.
    pub fn row_count(&mut self, parent: Option<&ModelIndex>) -> usize {
        if !self.is_connected() || parent.is_some_and(|p| p.column() > 0) {
            return 0;
        }
        let Some(id) = self.node_for_index(parent) else {
            return 0;
        };
        let Some((rows, columns)) = self.nodes.get(id).map(|n| (n.rows, n.columns)) else {
            return 0;
        };
        match rows {
            Count::Known(rows) => rows,
            // not yet requested vs. in the middle of insertion
            _ if columns == Count::Unknown => {
                self.request_row_column_count(id);
                0
            }
            _ => 0,
        }
    }

    /// Number of columns below `parent`
    pub fn column_count(&mut self, parent: Option<&ModelIndex>) -> usize {
        if !self.is_connected() {
            return 0;
        }
        let Some(id) = self.node_for_index(parent) else {
            return 0;
        };
        let Some(columns) = self.nodes.get(id).map(|n| n.columns) else {
            return 0;
        };
        match columns {
            Count::Known(columns) => columns,
            _ => {
                self.request_row_column_count(id);
                0
            }
        }
    }

    /// Value of `role` for the cell at `index`
    ///
    /// Unfetched cells are requested; meanwhile the display role answers
    /// with the configured loading text and other roles with `None`.
    pub fn data(&mut self, index: &ModelIndex, role: Role) -> Option<Value> {
        if !self.is_connected() {
            return None;
        }
        let column = index.column();
        let node = self.nodes.get(index.node())?;

        if let Some(cell) = node.data.get(&column) {
            return match cell.get(&role) {
                Some(value) => Some(value.clone()),
                None => self.loading_value(role),
            };
        }

        self.request_data_and_flags(index.node(), column);
        self.loading_value(role)
    }

    /// Flags of the cell at `index`; empty until its content arrived
    pub fn flags(&self, index: &ModelIndex) -> ItemFlags {
        self.nodes
            .get(index.node())
            .and_then(|node| node.flags.get(&index.column()).copied())
            .unwrap_or_default()
    }

    /// Header value of `role` for `section`, requesting it on first access
    pub fn header_data(
        &mut self,
        section: usize,
        orientation: Orientation,
        role: Role,
    ) -> Option<Value> {
        if !self.is_connected() {
            return None;
        }
        if !self.headers.contains(orientation, section) {
            self.request_header_data(orientation, section);
        }
        self.headers.value(orientation, section, role).cloned()
    }

    /// Ask the remote side to change a cell
    ///
    /// Always returns `false`: the change is never applied locally. If the
    /// remote side accepts it, a content change notification follows.
    pub fn set_data(&self, index: &ModelIndex, value: Value, role: Role) -> bool {
        if !self.is_connected() {
            return false;
        }
        let Some(path) = self.path_for_index(index) else {
            return false;
        };
        self.send(Message::SetDataRequest { path, role, value });
        false
    }

    /// Structural path of `index` as the remote side knows it
    pub fn path_for_index(&self, index: &ModelIndex) -> Option<ModelPath> {
        self.nodes.path_of(index.node(), index.column())
    }

    // ========================================
    // INTERNALS
    // ========================================

    fn node_for_index(&self, index: Option<&ModelIndex>) -> Option<NodeId> {
        match index {
            None => Some(self.nodes.root()),
            Some(index) => self.nodes.get(index.node()).map(|_| index.node()),
        }
    }

    fn index_for_node(&self, id: NodeId, column: usize) -> Option<ModelIndex> {
        let (_, row) = self.nodes.position_of(id)?;
        Some(ModelIndex::new(row, column, id))
    }

    fn loading_value(&self, role: Role) -> Option<Value> {
        (role == Role::DISPLAY).then(|| Value::from(self.config.loading_text.as_str()))
    }

    fn send(&self, message: Message) {
        let kind = message.name();
        if let Err(e) = self.transport.send(Envelope::new(self.address, message)) {
            tracing::warn!(address = %self.address, kind, "failed to send message: {}", e);
        }
    }
}
