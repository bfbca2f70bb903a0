//! Flume-backed channel client
//!
//! The client sits between the network layer and any number of mirrors.
//! Outbound envelopes are framed and queued on a flume channel whose
//! receiving end belongs to whatever moves bytes to the remote process.
//! Inbound frames are decoded and routed to the inboxes registered for
//! their address; presence changes are broadcast to all subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::MirrorConfig;
use crate::protocol::{self, Envelope, ObjectAddress};

use super::{ClientEvent, Inbox, Transport, TransportError};

/// Cloneable handle to a shared channel client
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    outbound: flume::Sender<Vec<u8>>,
    max_message_size: usize,
    state: RwLock<ClientState>,
}

#[derive(Debug, Default)]
struct ClientState {
    /// Known remote objects by name
    objects: HashMap<String, ObjectAddress>,
    /// Inboxes receiving the messages of an address
    handlers: HashMap<ObjectAddress, Vec<Inbox>>,
    /// Inboxes receiving presence changes
    subscribers: Vec<Inbox>,
}

impl Client {
    /// Create a client and the receiver of its outbound frames
    pub fn new(max_message_size: usize) -> (Self, flume::Receiver<Vec<u8>>) {
        let (tx, rx) = flume::unbounded();
        let client = Self {
            inner: Arc::new(ClientInner {
                outbound: tx,
                max_message_size,
                state: RwLock::new(ClientState::default()),
            }),
        };
        (client, rx)
    }

    /// Create a client sized for the frames `config` allows
    pub fn with_config(config: &MirrorConfig) -> (Self, flume::Receiver<Vec<u8>>) {
        Self::new(config.max_message_size)
    }

    /// Decode an inbound frame and route it
    pub fn receive(&self, bytes: &[u8]) -> Result<(), TransportError> {
        let envelope = protocol::decode(bytes, self.inner.max_message_size).map_err(|e| {
            tracing::error!("failed to decode inbound frame: {}", e);
            e
        })?;
        self.deliver(envelope);
        Ok(())
    }

    /// Route an already decoded envelope to the inboxes of its address
    pub fn deliver(&self, envelope: Envelope) {
        let mut state = self.inner.state.write();
        let Some(inboxes) = state.handlers.get_mut(&envelope.address) else {
            tracing::debug!(
                address = %envelope.address,
                kind = envelope.message.name(),
                "no handler registered, dropping message"
            );
            return;
        };
        inboxes.retain(|inbox| inbox.send(ClientEvent::Message(envelope.clone())).is_ok());
    }

    /// Record that a remote object is reachable and tell all subscribers
    pub fn object_registered(&self, name: &str, address: ObjectAddress) {
        let mut state = self.inner.state.write();
        tracing::info!(object = name, %address, "remote object registered");
        state.objects.insert(name.to_string(), address);
        broadcast(
            &mut state.subscribers,
            ClientEvent::ObjectRegistered {
                name: name.to_string(),
                address,
            },
        );
    }

    /// Forget a remote object, drop its routes and tell all subscribers
    pub fn object_unregistered(&self, name: &str, address: ObjectAddress) {
        let mut state = self.inner.state.write();
        tracing::info!(object = name, %address, "remote object unregistered");
        if state.objects.get(name) == Some(&address) {
            state.objects.remove(name);
        }
        state.handlers.remove(&address);
        broadcast(
            &mut state.subscribers,
            ClientEvent::ObjectUnregistered {
                name: name.to_string(),
                address,
            },
        );
    }
}

fn broadcast(subscribers: &mut Vec<Inbox>, event: ClientEvent) {
    subscribers.retain(|inbox| inbox.send(event.clone()).is_ok());
}

impl Transport for Client {
    fn object_address(&self, name: &str) -> ObjectAddress {
        self.inner
            .state
            .read()
            .objects
            .get(name)
            .copied()
            .unwrap_or(ObjectAddress::INVALID)
    }

    fn subscribe(&self, inbox: Inbox) {
        let mut state = self.inner.state.write();
        if !state.subscribers.iter().any(|s| s.same_channel(&inbox)) {
            state.subscribers.push(inbox);
        }
    }

    fn register_for_object(&self, address: ObjectAddress, inbox: Inbox) {
        let mut state = self.inner.state.write();
        let inboxes = state.handlers.entry(address).or_default();
        if !inboxes.iter().any(|s| s.same_channel(&inbox)) {
            inboxes.push(inbox);
        }
    }

    fn send(&self, envelope: Envelope) -> Result<(), TransportError> {
        if !envelope.address.is_valid() {
            return Err(TransportError::InvalidAddress(envelope.address));
        }
        let bytes = protocol::encode(&envelope)?;
        self.inner
            .outbound
            .send(bytes)
            .map_err(|_| TransportError::Closed)
    }
}
