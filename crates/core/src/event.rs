//! Events posted back into the consensus engine's event loop.

use istanbul_messages::ConsensusMessage;
use istanbul_types::Address;

/// A message handed to the consensus event loop.
///
/// Events are **passive data**: the engine's loop consumes them and runs
/// the state machine; nothing here calls back into the engine.
#[derive(Debug, Clone)]
pub enum ConsensusEvent {
    /// An inbound message admitted directly at receipt.
    Message {
        /// Validator the message came from.
        src: Address,
        /// The admitted message.
        msg: ConsensusMessage,
    },

    /// A parked message re-admitted during backlog replay.
    Backlog {
        /// Validator the message came from.
        src: Address,
        /// The replayed message.
        msg: ConsensusMessage,
    },
}

impl ConsensusEvent {
    /// Get the event type name for telemetry.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConsensusEvent::Message { .. } => "Message",
            ConsensusEvent::Backlog { .. } => "Backlog",
        }
    }

    /// The validator the carried message came from.
    pub fn source(&self) -> Address {
        match self {
            ConsensusEvent::Message { src, .. } | ConsensusEvent::Backlog { src, .. } => *src,
        }
    }

    /// The carried message.
    pub fn message(&self) -> &ConsensusMessage {
        match self {
            ConsensusEvent::Message { msg, .. } | ConsensusEvent::Backlog { msg, .. } => msg,
        }
    }
}
