//! Client-side mirror of a remote hierarchical item model
//!
//! A [`RemoteModel`] reflects a tree/table that lives in another process.
//! Structure and cell data are fetched lazily the first time a consumer
//! asks for them, and changes pushed by the remote side are applied
//! incrementally. All traffic goes through an injected [`Transport`].

pub mod config;
pub mod model;
pub mod protocol;
pub mod transport;
pub mod worker;

pub use config::{ConfigError, MirrorConfig};
pub use model::{Count, ModelEvent, ModelIndex, NodeId, RemoteModel, SyncBarrier};
pub use protocol::{
    Envelope, ItemData, ItemFlags, Message, ModelPath, ObjectAddress, Orientation, PathSegment,
    Role, Value,
};
pub use transport::{Client, ClientEvent, Transport, TransportError};
