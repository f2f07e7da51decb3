//! Consensus message kinds.

use sbor::prelude::BasicSbor;

/// The four Istanbul BFT message kinds.
///
/// The variant order fixes the protocol integer encoding
/// (`Preprepare = 0` through `RoundChange = 3`). `Preprepare`, `Prepare`
/// and `Commit` are ordered by that encoding; `RoundChange` is not ordered
/// against the others — it is handled separately wherever ordering matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BasicSbor)]
pub enum MessageKind {
    /// Proposal broadcast by the round's proposer.
    Preprepare,
    /// Vote that a proposal was received for the view.
    Prepare,
    /// Vote that a prepare quorum was observed for the view.
    Commit,
    /// Request to move the sequence to a later round.
    RoundChange,
}

impl MessageKind {
    /// Get a human-readable name for this message kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            MessageKind::Preprepare => "Preprepare",
            MessageKind::Prepare => "Prepare",
            MessageKind::Commit => "Commit",
            MessageKind::RoundChange => "RoundChange",
        }
    }

    /// Protocol integer encoding of the kind.
    pub fn code(&self) -> u8 {
        match self {
            MessageKind::Preprepare => 0,
            MessageKind::Prepare => 1,
            MessageKind::Commit => 2,
            MessageKind::RoundChange => 3,
        }
    }
}
