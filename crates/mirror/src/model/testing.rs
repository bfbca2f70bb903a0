//! Test doubles shared by the model's unit tests

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::MirrorConfig;
use crate::protocol::{Envelope, Message, ObjectAddress};
use crate::transport::{ClientEvent, Inbox, Transport, TransportError};

use super::{ModelEvent, RemoteModel};

pub const ADDRESS: ObjectAddress = ObjectAddress(1);

/// Transport that records everything the model sends
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Debug, Default)]
struct Recorded {
    objects: HashMap<String, ObjectAddress>,
    registered: Vec<ObjectAddress>,
    sent: Vec<Envelope>,
}

impl RecordingTransport {
    pub fn with_object(name: &str, address: ObjectAddress) -> Self {
        let transport = Self::default();
        transport
            .inner
            .lock()
            .objects
            .insert(name.to_string(), address);
        transport
    }

    pub fn sent(&self) -> Vec<Message> {
        self.inner
            .lock()
            .sent
            .iter()
            .map(|envelope| envelope.message.clone())
            .collect()
    }

    pub fn registered(&self) -> Vec<ObjectAddress> {
        self.inner.lock().registered.clone()
    }

    pub fn clear(&self) {
        self.inner.lock().sent.clear();
    }
}

impl Transport for RecordingTransport {
    fn object_address(&self, name: &str) -> ObjectAddress {
        self.inner
            .lock()
            .objects
            .get(name)
            .copied()
            .unwrap_or(ObjectAddress::INVALID)
    }

    fn subscribe(&self, _inbox: Inbox) {}

    fn register_for_object(&self, address: ObjectAddress, _inbox: Inbox) {
        self.inner.lock().registered.push(address);
    }

    fn send(&self, envelope: Envelope) -> Result<(), TransportError> {
        if !envelope.address.is_valid() {
            return Err(TransportError::InvalidAddress(envelope.address));
        }
        self.inner.lock().sent.push(envelope);
        Ok(())
    }
}

/// A model bound to `ADDRESS` whose first barrier has been echoed
pub fn connected_model() -> (RemoteModel<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::with_object("tree", ADDRESS);
    let mut model = RemoteModel::new(transport.clone(), MirrorConfig::for_object("tree"));
    deliver(&mut model, Message::SyncBarrier(1));
    transport.clear();
    (model, transport)
}

pub fn deliver(model: &mut RemoteModel<RecordingTransport>, message: Message) {
    model.handle_event(ClientEvent::Message(Envelope::new(ADDRESS, message)));
}

pub fn drain(events: &flume::Receiver<ModelEvent>) -> Vec<ModelEvent> {
    events.try_iter().collect()
}
