//! Proposal digest.

use sbor::prelude::BasicSbor;
use std::fmt;

/// A 32-byte proposal digest.
///
/// The subsystem treats digests as opaque: they are produced and checked by
/// the proposal pipeline, and only compared for equality here.
#[derive(Clone, Copy, PartialEq, Eq, Hash, BasicSbor)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// The all-zero digest.
    pub const ZERO: Digest = Digest([0u8; 32]);

    /// Raw bytes of the digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Abbreviated hex, enough to tell digests apart in logs.
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}..{:02x}{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[30], self.0[31]
        )
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
