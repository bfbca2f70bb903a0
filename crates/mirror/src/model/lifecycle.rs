//! Connection lifecycle and resets

use crate::protocol::{Message, ObjectAddress};
use crate::transport::Transport;

use super::events::ModelEvent;
use super::RemoteModel;

impl<T: Transport> RemoteModel<T> {
    pub(super) fn connect_to_server(&mut self) {
        if !self.is_connected() {
            return;
        }
        tracing::info!(
            object = %self.config.server_object,
            address = %self.address,
            "connecting to remote model"
        );
        self.transport
            .register_for_object(self.address, self.inbox.clone());
        self.clear();
    }

    pub(super) fn server_registered(&mut self, name: &str, address: ObjectAddress) {
        if self.config.server_object != name {
            return;
        }
        self.address = address;
        self.connect_to_server();
    }

    pub(super) fn server_unregistered(&mut self, name: &str, address: ObjectAddress) {
        if self.address != address {
            return;
        }
        tracing::info!(object = name, %address, "remote model went away");
        self.address = ObjectAddress::INVALID;
        self.clear();
    }

    /// Discard the whole mirror and start a new barrier
    ///
    /// The local tree is dropped immediately. Until the remote side echoes
    /// the new barrier value, every inbound message is treated as stale.
    pub(super) fn clear(&mut self) {
        let barrier = self.barrier.advance();
        tracing::debug!(barrier, "resetting mirror");
        if self.is_connected() {
            self.send(Message::SyncBarrier(barrier));
        }

        self.nodes.reset();
        self.headers.clear();
        self.events.emit(ModelEvent::Reset);
    }
}
