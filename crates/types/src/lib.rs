//! Core types for the Istanbul BFT message pipeline.
//!
//! This crate provides the foundational types used throughout the
//! admission and backlog subsystem:
//!
//! - **Coordinates**: [`View`] (sequence, round) and its total order
//! - **Identifiers**: [`Address`], [`Digest`]
//! - **Consensus state**: [`ConsensusState`], [`Subject`]
//! - **Membership**: [`ValidatorSet`]
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend
//! on any other workspace crates, making it the foundation layer.

mod digest;
mod state;
mod validator;
mod view;

pub use digest::Digest;
pub use state::ConsensusState;
pub use validator::{Address, ValidatorSet};
pub use view::{Subject, View};

/// Test utilities.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::*;

    /// Create a test address from a seed byte.
    pub fn test_address(seed: u8) -> Address {
        Address([seed; 20])
    }

    /// Create a test digest from a seed byte.
    pub fn test_digest(seed: u8) -> Digest {
        Digest([seed; 32])
    }

    /// Create a validator set of `n` validators seeded `1..=n`.
    pub fn test_validator_set(n: u8) -> ValidatorSet {
        ValidatorSet::new((1..=n).map(test_address).collect())
    }
}
