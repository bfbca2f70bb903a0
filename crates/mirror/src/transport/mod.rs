//! Channel boundary between a model mirror and the remote process
//!
//! The mirror never talks to a global connection. It is handed a
//! [`Transport`] at construction and uses it to look up object addresses,
//! register for the messages of its object and send requests. Everything
//! flowing back (messages and object presence changes) arrives as
//! [`ClientEvent`]s on the mirror's own inbox, in delivery order.

use crate::protocol::{CodecError, Envelope, ObjectAddress};

mod client;

pub use client::Client;

/// Sending half of a mirror's inbox
pub type Inbox = flume::Sender<ClientEvent>;

/// Inbound events delivered to a mirror
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// A message addressed to an object the mirror registered for
    Message(Envelope),
    /// A remote object became reachable under `address`
    ObjectRegistered {
        name: String,
        address: ObjectAddress,
    },
    /// The remote object at `address` went away
    ObjectUnregistered {
        name: String,
        address: ObjectAddress,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("cannot send to {0}")]
    InvalidAddress(ObjectAddress),
    #[error("outbound channel has been closed")]
    Closed,
}

/// Handle to the message channel, injected into each mirror
///
/// Implementations must deliver events to a registered inbox in the order
/// they were received from the remote side.
pub trait Transport: Send + Sync {
    /// Current address of a named remote object, or
    /// [`ObjectAddress::INVALID`] if it is not known
    fn object_address(&self, name: &str) -> ObjectAddress;

    /// Subscribe an inbox to object presence changes
    fn subscribe(&self, inbox: Inbox);

    /// Route messages addressed to `address` into `inbox`
    fn register_for_object(&self, address: ObjectAddress, inbox: Inbox);

    /// Queue a message for the remote side
    fn send(&self, envelope: Envelope) -> Result<(), TransportError>;
}
