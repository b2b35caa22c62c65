use thiserror::Error;

use super::checksum::ChecksumPair;
use crate::protocols::common::reader::TooShort;

/// Errors returned by binary frame parsing and encoding.
///
/// # Examples
/// ```
/// use ubxwire_core::protocols::ubx::error::UbxError;
///
/// let err = UbxError::LengthMismatch { declared: 4, actual: 2 };
/// assert!(err.to_string().contains("length mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum UbxError {
    #[error("{0}")]
    TooShort(#[from] TooShort),
    #[error("invalid sync bytes: {found:02x?}")]
    InvalidSync { found: [u8; 2] },
    #[error("length mismatch: header declares {declared} payload bytes, frame carries {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("payload of {length} bytes exceeds the 65535 byte limit")]
    PayloadTooLong { length: usize },
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Checksum {
        expected: ChecksumPair,
        actual: ChecksumPair,
    },
}
