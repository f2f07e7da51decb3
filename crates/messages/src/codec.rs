//! SBOR payload encoding and decoding.

use sbor::{BasicDecode, BasicEncode};
use thiserror::Error;

/// Errors that can occur while encoding or decoding message payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("SBOR encode error: {0}")]
    Encode(String),

    #[error("SBOR decode error: {0}")]
    Decode(String),

    #[error("payload kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Encode a payload struct to SBOR bytes.
pub fn encode_payload<T: BasicEncode>(value: &T) -> Result<Vec<u8>, CodecError> {
    sbor::basic_encode(value).map_err(|e| CodecError::Encode(format!("{:?}", e)))
}

/// Decode a payload struct from SBOR bytes.
pub fn decode_payload<T: BasicDecode>(bytes: &[u8]) -> Result<T, CodecError> {
    sbor::basic_decode(bytes).map_err(|e| CodecError::Decode(format!("{:?}", e)))
}
