use thiserror::Error;

use crate::codec::CodecError;
use crate::protocols::ubx::ChecksumPair;
use crate::protocols::{FrameError, FrameStage, Protocol};
use crate::source::SourceError;

/// Errors surfaced by `StreamReader`.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying stream failed. Always propagated.
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("framing error: no frame start found within {skipped} bytes")]
    Framing { skipped: usize },
    #[error("incomplete {protocol} frame: stream ended at stage {stage}")]
    IncompleteFrame { protocol: Protocol, stage: FrameStage },
    #[error("checksum error for class 0x{class:02x} id 0x{id:02x}: expected {expected}, got {actual}")]
    Checksum {
        class: u8,
        id: u8,
        expected: ChecksumPair,
        actual: ChecksumPair,
    },
    #[error(transparent)]
    Frame(FrameError),
    #[error("cannot decode class 0x{class:02x} id 0x{id:02x}: {source}")]
    Decode {
        class: u8,
        id: u8,
        #[source]
        source: CodecError,
    },
}

impl ReadError {
    /// Whether skipping the current frame lets reading continue.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ReadError::Source(_))
    }
}

impl From<FrameError> for ReadError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Source(err) => ReadError::Source(err),
            FrameError::NoSync { skipped } => ReadError::Framing { skipped },
            FrameError::Incomplete { protocol, stage } => ReadError::IncompleteFrame { protocol, stage },
            other => ReadError::Frame(other),
        }
    }
}
