//! Consensus state machine phases.

/// The phase the consensus state machine is in for the current view.
///
/// The phase gates which message kinds are processable right now; anything
/// else is either parked for later or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsensusState {
    /// Waiting for enough round-change messages to move to a new round.
    WaitingForNewRound,
    /// Ready to accept a proposal for the current view.
    AcceptRequest,
    /// A proposal was accepted; collecting prepares.
    Preprepared,
    /// Prepare quorum reached; collecting commits.
    Prepared,
    /// Commit quorum reached.
    Committed,
}

impl ConsensusState {
    /// Get a human-readable name for this state.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConsensusState::WaitingForNewRound => "WaitingForNewRound",
            ConsensusState::AcceptRequest => "AcceptRequest",
            ConsensusState::Preprepared => "Preprepared",
            ConsensusState::Prepared => "Prepared",
            ConsensusState::Committed => "Committed",
        }
    }

    /// Whether a proposal has been accepted in the current round.
    ///
    /// In these phases every message kind for the current view is
    /// processable.
    pub fn has_proposal(&self) -> bool {
        matches!(
            self,
            ConsensusState::Preprepared | ConsensusState::Prepared | ConsensusState::Committed
        )
    }
}
