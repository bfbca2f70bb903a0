//! Wire protocol between a model mirror and the remote model it reflects
//!
//! Messages are addressed to a remote object by its [`ObjectAddress`] and
//! framed as an [`Envelope`]. Framing uses bincode, so the payload of every
//! message is a fixed sequence of fields read back in declaration order.

use std::fmt;

use serde::{Deserialize, Serialize};

mod messages;
mod types;

pub use messages::Message;
pub use types::{ItemData, ItemFlags, ModelPath, Orientation, PathSegment, Role, Value};

/// Default inbound frame limit (1MB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Handle of a remote object on the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectAddress(pub u16);

impl ObjectAddress {
    /// Sentinel for "not bound to any remote object"
    pub const INVALID: ObjectAddress = ObjectAddress(0);

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl Default for ObjectAddress {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ObjectAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#invalid")
        }
    }
}

/// A message together with the object it is addressed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub address: ObjectAddress,
    pub message: Message,
}

impl Envelope {
    pub fn new(address: ObjectAddress, message: Message) -> Self {
        Self { address, message }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to serialize message: {0}")]
    Encode(bincode::Error),
    #[error("failed to deserialize message: {0}")]
    Decode(bincode::Error),
    #[error("message of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },
}

/// Serialize an envelope into a single frame
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(envelope).map_err(CodecError::Encode)
}

/// Deserialize a single frame, rejecting frames larger than `max_size`
pub fn decode(bytes: &[u8], max_size: usize) -> Result<Envelope, CodecError> {
    if bytes.len() > max_size {
        return Err(CodecError::TooLarge {
            size: bytes.len(),
            max: max_size,
        });
    }
    bincode::deserialize(bytes).map_err(CodecError::Decode)
}
