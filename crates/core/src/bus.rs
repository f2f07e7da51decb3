//! Asynchronous handoff to the consensus event loop.

use crate::event::ConsensusEvent;
use tokio::sync::mpsc;
use tracing::trace;

/// Sending half of the consensus event loop's queue.
///
/// `post` never blocks and preserves per-post order, so it is safe to call
/// while holding the backlog lock: the event loop may itself call back into
/// the backlog, and a blocking handoff here would invert the lock order.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<ConsensusEvent>,
}

impl EventBus {
    /// Create a bus and the receiver the engine loop drains.
    pub fn channel() -> (EventBus, mpsc::UnboundedReceiver<ConsensusEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventBus { tx }, rx)
    }

    /// Post an event to the engine loop.
    ///
    /// If the loop has shut down the event is dropped; everything routed
    /// through the bus is re-sendable by peers.
    pub fn post(&self, event: ConsensusEvent) {
        if let Err(err) = self.tx.send(event) {
            trace!(event = err.0.type_name(), "event loop gone, dropping event");
        }
    }
}
