use thiserror::Error;

use crate::protocols::{FrameError, FrameStage, Protocol};
use crate::source::ByteStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("payload too short: need {needed} bytes, got {actual}")]
pub struct TooShort {
    pub needed: usize,
    pub actual: usize,
}

/// Bounds-checked access into a complete frame buffer.
pub(crate) struct SliceReader<'a> {
    bytes: &'a [u8],
}

impl<'a> SliceReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn require_len(&self, needed: usize) -> Result<(), TooShort> {
        if self.bytes.len() < needed {
            return Err(TooShort {
                needed,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn read_u8(&self, offset: usize) -> Result<u8, TooShort> {
        self.bytes.get(offset).copied().ok_or(TooShort {
            needed: offset + 1,
            actual: self.bytes.len(),
        })
    }

    pub(crate) fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, TooShort> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(TooShort {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], TooShort> {
        self.bytes.get(range.clone()).ok_or(TooShort {
            needed: range.end,
            actual: self.bytes.len(),
        })
    }
}

/// Read `n` bytes of a frame, mapping end of stream to `FrameError::Incomplete`.
pub(crate) fn read_or_incomplete<S: ByteStream + ?Sized>(
    stream: &mut S,
    n: usize,
    protocol: Protocol,
    stage: FrameStage,
) -> Result<Vec<u8>, FrameError> {
    stream
        .read_exact(n)?
        .ok_or(FrameError::Incomplete { protocol, stage })
}
