//! Message admission and backlog for an Istanbul BFT consensus engine.
//!
//! This crate sits between the network layer (which delivers signed
//! consensus messages from peer validators) and the consensus state machine
//! (which consumes messages valid for the current view). For each inbound
//! message it decides whether the message is immediately deliverable, too
//! old, from a future view and must be parked, or malformed.
//!
//! # Architecture
//!
//! - [`check_message`] is the pure admission predicate over a
//!   [`ViewSnapshot`]: it maps a (kind, view) pair to an [`Admission`]
//!   outcome and has no side effects.
//! - [`MessageBacklog`] owns the parked-message store: one priority-ordered
//!   heap per future sequence, a per-validator counter and a global counter,
//!   all behind a single mutex.
//! - [`MessageBacklog::process_backlog`] replays the store whenever the
//!   state machine transitions, pruning stale sequences and re-admitting
//!   current-sequence entries through the same predicate.
//!
//! Admitted messages are handed to the engine through the
//! [`EventBus`](istanbul_core::EventBus); the post is non-blocking, so the
//! backlog lock is never held across engine work.
//!
//! [`ViewSnapshot`]: istanbul_core::ViewSnapshot

mod admission;
mod config;
mod priority;
mod store;

pub use admission::{check_message, Admission, MAX_FUTURE_SEQUENCE_GAP};
pub use config::BacklogConfig;
pub use priority::message_priority;
pub use store::{BacklogStats, MessageBacklog};
