//! Reset sequencing against the remote side
//!
//! Every reset bumps `target` and sends it out. The remote side echoes the
//! value back in order with the rest of its traffic, so anything arriving
//! before the echo predates the reset and must not touch the fresh tree.

use crate::protocol::Message;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncBarrier {
    /// Last value sent out
    target: u64,
    /// Last value echoed back
    current: u64,
}

impl SyncBarrier {
    /// Start a new barrier, returning the value to send
    pub fn advance(&mut self) -> u64 {
        self.target += 1;
        self.target
    }

    /// Feed an inbound message through the barrier
    ///
    /// Barrier echoes move `current`; the return value says whether the
    /// message may be applied.
    pub fn admit(&mut self, message: &Message) -> bool {
        if let Message::SyncBarrier(value) = message {
            self.current = *value;
        }
        self.is_synchronized()
    }

    pub fn is_synchronized(&self) -> bool {
        self.current == self.target
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn current(&self) -> u64 {
        self.current
    }
}
