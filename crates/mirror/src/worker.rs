//! Async driver for a shared mirror
//!
//! The worker is the only place inbound events are applied. It takes one
//! event at a time off the mirror's inbox and applies it under the model
//! lock, so consumer queries running on other tasks always see a state
//! between two events.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::sync::watch::Receiver as WatchReceiver;

use crate::model::RemoteModel;
use crate::transport::Transport;

/// A mirror shared between the worker and its consumers
pub type SharedModel<T> = Arc<Mutex<RemoteModel<T>>>;

/// Wrap a mirror for use with [`spawn`]
pub fn shared<T: Transport>(model: RemoteModel<T>) -> SharedModel<T> {
    Arc::new(Mutex::new(model))
}

/// Apply inbound events to `model` until shutdown is signalled
///
/// Shutdown is the only way out: the model keeps a sender to its own
/// inbox, so the inbox never closes while the model is alive.
///
/// # Arguments
///
/// * `model` - The shared mirror to drive
/// * `shutdown_rx` - Watch receiver for shutdown signal
pub async fn spawn<T>(model: SharedModel<T>, mut shutdown_rx: WatchReceiver<()>) -> Result<()>
where
    T: Transport + 'static,
{
    let (inbox, object) = {
        let model = model.lock();
        (model.inbox(), model.server_object().to_string())
    };
    tracing::info!(object = %object, "mirror worker started");

    loop {
        tokio::select! {
            Ok(event) = inbox.recv_async() => {
                model.lock().handle_event(event);
            }
            _ = shutdown_rx.changed() => {
                tracing::info!(object = %object, "shutdown signal received, stopping mirror worker");
                break;
            }
        }
    }

    Ok(())
}
