//! Message envelope and kind-specific payloads.

use crate::codec::{decode_payload, encode_payload, CodecError};
use crate::kind::MessageKind;
use istanbul_types::{Address, Digest, Subject, View};
use sbor::prelude::BasicSbor;

/// Payload of a `Preprepare` message: the proposer's proposal for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BasicSbor)]
pub struct Preprepare {
    /// View the proposal is made for.
    pub view: View,
    /// Digest of the proposed block.
    pub proposal: Digest,
}

/// Payload of a `RoundChange` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BasicSbor)]
pub struct RoundChange {
    /// View the sender wants to move to.
    pub view: View,
}

/// A signed consensus message as delivered by the network layer.
///
/// The payload is kept encoded: the backlog parks messages without fully
/// interpreting them, and only extracts the view. Signature verification
/// happens upstream; by the time a message reaches this crate its `address`
/// is trusted to be the recovered signer.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct ConsensusMessage {
    /// Message kind, which selects the payload type.
    pub kind: MessageKind,
    /// Sender address recovered from the signature.
    pub address: Address,
    /// SBOR-encoded payload.
    pub payload: Vec<u8>,
    /// Signature over the payload.
    pub signature: Vec<u8>,
}

impl ConsensusMessage {
    /// Create a message from an already-encoded payload.
    pub fn new(kind: MessageKind, address: Address, payload: Vec<u8>) -> Self {
        Self {
            kind,
            address,
            payload,
            signature: Vec::new(),
        }
    }

    /// Create a `Preprepare` message.
    pub fn preprepare(address: Address, payload: &Preprepare) -> Result<Self, CodecError> {
        Ok(Self::new(
            MessageKind::Preprepare,
            address,
            encode_payload(payload)?,
        ))
    }

    /// Create a `Prepare` message.
    pub fn prepare(address: Address, subject: &Subject) -> Result<Self, CodecError> {
        Ok(Self::new(
            MessageKind::Prepare,
            address,
            encode_payload(subject)?,
        ))
    }

    /// Create a `Commit` message.
    pub fn commit(address: Address, subject: &Subject) -> Result<Self, CodecError> {
        Ok(Self::new(
            MessageKind::Commit,
            address,
            encode_payload(subject)?,
        ))
    }

    /// Create a `RoundChange` message.
    pub fn round_change(address: Address, payload: &RoundChange) -> Result<Self, CodecError> {
        Ok(Self::new(
            MessageKind::RoundChange,
            address,
            encode_payload(payload)?,
        ))
    }

    /// Attach a signature.
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    /// Decode the payload of a `Preprepare` message.
    pub fn decode_preprepare(&self) -> Result<Preprepare, CodecError> {
        self.expect_kind(MessageKind::Preprepare)?;
        decode_payload(&self.payload)
    }

    /// Decode the payload of a `Prepare` or `Commit` message.
    pub fn decode_subject(&self) -> Result<Subject, CodecError> {
        if !matches!(self.kind, MessageKind::Prepare | MessageKind::Commit) {
            return Err(CodecError::KindMismatch {
                expected: "Prepare|Commit",
                actual: self.kind.type_name(),
            });
        }
        decode_payload(&self.payload)
    }

    /// Decode the payload of a `RoundChange` message.
    pub fn decode_round_change(&self) -> Result<RoundChange, CodecError> {
        self.expect_kind(MessageKind::RoundChange)?;
        decode_payload(&self.payload)
    }

    /// Extract the view the message speaks about, dispatching on kind.
    pub fn view(&self) -> Result<View, CodecError> {
        match self.kind {
            MessageKind::Preprepare => Ok(self.decode_preprepare()?.view),
            MessageKind::Prepare | MessageKind::Commit => Ok(self.decode_subject()?.view),
            MessageKind::RoundChange => Ok(self.decode_round_change()?.view),
        }
    }

    fn expect_kind(&self, expected: MessageKind) -> Result<(), CodecError> {
        if self.kind != expected {
            return Err(CodecError::KindMismatch {
                expected: expected.type_name(),
                actual: self.kind.type_name(),
            });
        }
        Ok(())
    }
}
