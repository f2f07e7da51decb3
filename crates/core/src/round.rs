//! Read-only view of the engine's round state.

use istanbul_types::{Address, ConsensusState, Subject, ValidatorSet, View};

/// A consistent snapshot of the round coordinates the admission predicate
/// runs against.
///
/// Admission is a pure function of a snapshot: two back-to-back checks
/// against the same snapshot yield the same outcome.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// Current (sequence, round).
    pub view: View,
    /// Round the node wants to move to; may exceed `view.round` while a
    /// round change is in progress.
    pub desired_round: u64,
    /// Phase of the state machine within the current view.
    pub state: ConsensusState,
    /// Subject of the most recently committed proposal, if any. Late
    /// commits matching this view are still accepted: they extend the
    /// aggregated seal carried on the next proposal's parent.
    pub last_committed: Option<Subject>,
}

/// Round state exposed by the consensus engine.
///
/// The engine implements this on its round-state object; the backlog only
/// ever reads from it. `snapshot()` must return mutually consistent fields
/// taken at a single point in time.
pub trait RoundState: Send + Sync {
    /// Take a consistent snapshot of the current round.
    fn snapshot(&self) -> ViewSnapshot;

    /// Address of the local validator.
    fn own_address(&self) -> Address;

    /// Current validator membership.
    fn validators(&self) -> ValidatorSet;

    /// Current (sequence, round).
    fn current_view(&self) -> View {
        self.snapshot().view
    }

    /// Round the node wants to move to.
    fn desired_round(&self) -> u64 {
        self.snapshot().desired_round
    }

    /// Phase of the state machine within the current view.
    fn state(&self) -> ConsensusState {
        self.snapshot().state
    }

    /// Subject of the most recently committed proposal, if any.
    fn last_committed_subject(&self) -> Option<Subject> {
        self.snapshot().last_committed
    }
}
