//! Engine-facing seams for the Istanbul BFT message pipeline.
//!
//! This crate defines the two interfaces the admission and backlog
//! subsystem shares with the consensus engine:
//!
//! - [`RoundState`]: a read-only view of the engine's current round
//!   (view, desired round, state, last committed subject, membership).
//!   The engine implements it; the subsystem only reads [`ViewSnapshot`]s
//!   from it.
//! - [`EventBus`]: the asynchronous handoff that routes admitted messages
//!   back into the engine's event loop as [`ConsensusEvent`]s.
//!
//! # Architecture
//!
//! Ownership is one-way: the engine owns the backlog, and the bus is a
//! queue endpoint handed in at construction. Nothing in this crate points
//! back at the engine, which keeps the lock ordering acyclic.

mod bus;
mod event;
mod round;

pub use bus::EventBus;
pub use event::ConsensusEvent;
pub use round::{RoundState, ViewSnapshot};

/// Test utilities.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use crate::round::{RoundState, ViewSnapshot};
    use istanbul_types::{Address, ConsensusState, Subject, ValidatorSet, View};
    use std::sync::RwLock;

    /// A settable [`RoundState`] for tests.
    ///
    /// Interior mutability lets tests advance the view mid-scenario while
    /// the backlog under test holds an `Arc` to it.
    pub struct TestRound {
        own: Address,
        snapshot: RwLock<ViewSnapshot>,
        validators: RwLock<ValidatorSet>,
    }

    impl TestRound {
        /// Create a round at `(1, 0)`, `AcceptRequest`, with the given
        /// identity and membership.
        pub fn new(own: Address, validators: ValidatorSet) -> Self {
            Self {
                own,
                snapshot: RwLock::new(ViewSnapshot {
                    view: View::new(1, 0),
                    desired_round: 0,
                    state: ConsensusState::AcceptRequest,
                    last_committed: None,
                }),
                validators: RwLock::new(validators),
            }
        }

        /// Move the round to a new view.
        pub fn set_view(&self, view: View) {
            self.snapshot.write().unwrap().view = view;
        }

        /// Set the desired round.
        pub fn set_desired_round(&self, round: u64) {
            self.snapshot.write().unwrap().desired_round = round;
        }

        /// Set the state machine phase.
        pub fn set_state(&self, state: ConsensusState) {
            self.snapshot.write().unwrap().state = state;
        }

        /// Set the last committed subject.
        pub fn set_last_committed(&self, subject: Option<Subject>) {
            self.snapshot.write().unwrap().last_committed = subject;
        }

        /// Replace the validator set.
        pub fn set_validators(&self, validators: ValidatorSet) {
            *self.validators.write().unwrap() = validators;
        }
    }

    impl RoundState for TestRound {
        fn snapshot(&self) -> ViewSnapshot {
            self.snapshot.read().unwrap().clone()
        }

        fn own_address(&self) -> Address {
            self.own
        }

        fn validators(&self) -> ValidatorSet {
            self.validators.read().unwrap().clone()
        }
    }
}
