//! Wire messages for the Istanbul BFT message pipeline.
//!
//! A [`ConsensusMessage`] is the envelope the network layer delivers: a
//! message kind, the sender address recovered from the signature, and an
//! SBOR-encoded payload. The payload decodes, per kind, to one of the
//! payload structs in this crate, each of which carries the [`View`] the
//! message speaks about.
//!
//! [`View`]: istanbul_types::View

mod codec;
mod kind;
mod payload;

pub use codec::{decode_payload, encode_payload, CodecError};
pub use kind::MessageKind;
pub use payload::{ConsensusMessage, Preprepare, RoundChange};

// Re-export the subject payload from types for convenience
pub use istanbul_types::Subject;
