use std::fmt;

use thiserror::Error;

use super::Protocol;
use super::ubx::error::UbxError;
use crate::source::SourceError;

/// Progress of a frame read, used to report where a stream ended.
///
/// The binary protocol walks every stage in order:
/// `SeekSync -> Synced -> HeaderRead -> PayloadRead -> ChecksumRead -> Complete`.
/// Text and RTCM3 frames reuse the subset that applies to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStage {
    SeekSync,
    Synced,
    HeaderRead,
    PayloadRead,
    ChecksumRead,
    Complete,
}

impl fmt::Display for FrameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameStage::SeekSync => "seek-sync",
            FrameStage::Synced => "synced",
            FrameStage::HeaderRead => "header-read",
            FrameStage::PayloadRead => "payload-read",
            FrameStage::ChecksumRead => "checksum-read",
            FrameStage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Errors raised while extracting a frame from a stream.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("no frame start found within {skipped} bytes")]
    NoSync { skipped: usize },
    #[error("{protocol} frame incomplete: stream ended at stage {stage}")]
    Incomplete { protocol: Protocol, stage: FrameStage },
    #[error("NMEA sentence exceeds {limit} bytes without terminator")]
    SentenceTooLong { limit: usize },
    #[error(transparent)]
    Ubx(#[from] UbxError),
}
