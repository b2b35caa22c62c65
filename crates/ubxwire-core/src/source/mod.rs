//! Byte stream sources.
//!
//! Frame readers consume the receiver through the `ByteStream` trait: a
//! blocking, pull-based byte source with a small lookahead used for protocol
//! detection. `IoStream` adapts any `std::io::Read` (serial port, socket,
//! file). Timeouts and cancellation are properties of the wrapped reader.

mod io;

pub use io::{IoStream, MAX_LOOKAHEAD};

use thiserror::Error;

/// Blocking byte source shared by the protocol frame readers.
///
/// Both operations return `Ok(None)` at end of stream, i.e. when fewer than
/// `n` bytes remain.
pub trait ByteStream {
    /// Return the next `n` bytes without consuming them.
    fn peek(&mut self, n: usize) -> Result<Option<&[u8]>, SourceError>;

    /// Consume exactly `n` bytes.
    ///
    /// At end of stream the partial tail is consumed and `None` is returned.
    fn read_exact(&mut self, n: usize) -> Result<Option<Vec<u8>>, SourceError>;
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn peek(&mut self, n: usize) -> Result<Option<&[u8]>, SourceError> {
        (**self).peek(n)
    }

    fn read_exact(&mut self, n: usize) -> Result<Option<Vec<u8>>, SourceError> {
        (**self).read_exact(n)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("peek of {requested} bytes exceeds lookahead limit of {limit}")]
    PeekTooLarge { requested: usize, limit: usize },
}
