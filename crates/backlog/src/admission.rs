//! The admission predicate.

use istanbul_core::ViewSnapshot;
use istanbul_messages::MessageKind;
use istanbul_types::{ConsensusState, View};
use std::cmp::Ordering;

/// Never accept messages more than this many sequences ahead of the current
/// view. Peers must agree on the horizon, so it is a protocol constant
/// rather than a configuration knob.
pub const MAX_FUTURE_SEQUENCE_GAP: u64 = 10;

/// Outcome of checking an inbound message against the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Deliverable now; hand to the state machine.
    Admit,
    /// View exceeds the current one but is within the horizon; park it.
    Future,
    /// View preceded the current one and is not a usable late commit.
    Old,
    /// The view could not be determined.
    Invalid,
    /// Sequence is beyond the future horizon; drop without parking.
    TooFar,
}

impl Admission {
    /// Get a human-readable name for this outcome.
    pub fn type_name(&self) -> &'static str {
        match self {
            Admission::Admit => "Admit",
            Admission::Future => "Future",
            Admission::Old => "Old",
            Admission::Invalid => "Invalid",
            Admission::TooFar => "TooFar",
        }
    }
}

/// Check whether a message of `kind` speaking about `view` is processable
/// under `at`.
///
/// Pure and stateless; called both on initial receipt and during backlog
/// replay.
pub fn check_message(kind: MessageKind, view: Option<View>, at: &ViewSnapshot) -> Admission {
    let Some(view) = view else {
        return Admission::Invalid;
    };

    if view.sequence > at.view.sequence.saturating_add(MAX_FUTURE_SEQUENCE_GAP) {
        return Admission::TooFar;
    }

    // Round changes are keyed on the desired round, not the current one,
    // and a stale round change for the current sequence is useless.
    if kind == MessageKind::RoundChange {
        return if view.sequence > at.view.sequence {
            Admission::Future
        } else if view.sequence == at.view.sequence && view.round < at.desired_round {
            Admission::Old
        } else {
            Admission::Admit
        };
    }

    match view.cmp(&at.view) {
        Ordering::Greater => Admission::Future,
        Ordering::Less => {
            // Commits matching the last committed subject are still useful:
            // they extend the aggregated seal on the next proposal's parent.
            if kind == MessageKind::Commit
                && at.last_committed.as_ref().map(|s| s.view) == Some(view)
            {
                Admission::Admit
            } else {
                Admission::Old
            }
        }
        Ordering::Equal => match at.state {
            // Only round changes matter here, and they were handled above.
            ConsensusState::WaitingForNewRound => Admission::Future,
            // Before a proposal arrives, prepares and commits for the view
            // are legitimately early.
            ConsensusState::AcceptRequest => {
                if kind == MessageKind::Preprepare {
                    Admission::Admit
                } else {
                    Admission::Future
                }
            }
            ConsensusState::Preprepared | ConsensusState::Prepared | ConsensusState::Committed => {
                Admission::Admit
            }
        },
    }
}
