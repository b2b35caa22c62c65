use std::io::{ErrorKind, Read};

use super::{ByteStream, SourceError};

/// Largest lookahead `IoStream::peek` can serve.
pub const MAX_LOOKAHEAD: usize = 8;

/// `ByteStream` over any blocking reader.
///
/// Only the peeked bytes are buffered; everything else is read on demand.
pub struct IoStream<R> {
    inner: R,
    lookahead: Vec<u8>,
}

impl<R: Read> IoStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lookahead: Vec::with_capacity(MAX_LOOKAHEAD),
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap the reader. Peeked but unconsumed bytes are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Returns `false` when the stream ends before `n` bytes are buffered.
    fn fill_lookahead(&mut self, n: usize) -> Result<bool, SourceError> {
        let mut buf = [0u8; MAX_LOOKAHEAD];
        while self.lookahead.len() < n {
            let want = n - self.lookahead.len();
            match self.inner.read(&mut buf[..want]) {
                Ok(0) => return Ok(false),
                Ok(read) => self.lookahead.extend_from_slice(&buf[..read]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(true)
    }
}

impl<R: Read> ByteStream for IoStream<R> {
    fn peek(&mut self, n: usize) -> Result<Option<&[u8]>, SourceError> {
        if n > MAX_LOOKAHEAD {
            return Err(SourceError::PeekTooLarge {
                requested: n,
                limit: MAX_LOOKAHEAD,
            });
        }
        if !self.fill_lookahead(n)? {
            return Ok(None);
        }
        Ok(Some(&self.lookahead[..n]))
    }

    fn read_exact(&mut self, n: usize) -> Result<Option<Vec<u8>>, SourceError> {
        let buffered = self.lookahead.len().min(n);
        let mut out: Vec<u8> = self.lookahead.drain(..buffered).collect();
        out.resize(n, 0);

        let mut filled = buffered;
        while filled < n {
            match self.inner.read(&mut out[filled..]) {
                Ok(0) => return Ok(None),
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {
    use super::{IoStream, MAX_LOOKAHEAD};
    use crate::source::{ByteStream, SourceError};
    use std::io::{Cursor, Read};

    /// Hands out one byte per `read` call.
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let len = buf.len().min(1);
            self.0.read(&mut buf[..len])
        }
    }

    #[test]
    fn peek_does_not_consume() {
        let mut stream = IoStream::new(Cursor::new(vec![1, 2, 3]));
        assert_eq!(stream.peek(2).unwrap(), Some(&[1, 2][..]));
        assert_eq!(stream.read_exact(3).unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn read_exact_reassembles_short_reads() {
        let mut stream = IoStream::new(Trickle(Cursor::new(vec![9, 8, 7, 6])));
        assert_eq!(stream.peek(1).unwrap(), Some(&[9][..]));
        assert_eq!(stream.read_exact(4).unwrap(), Some(vec![9, 8, 7, 6]));
        assert_eq!(stream.read_exact(1).unwrap(), None);
    }

    #[test]
    fn end_of_stream_is_reported_as_none() {
        let mut stream = IoStream::new(Cursor::new(vec![0xb5]));
        assert_eq!(stream.peek(2).unwrap(), None);
        assert_eq!(stream.peek(1).unwrap(), Some(&[0xb5][..]));
        assert_eq!(stream.read_exact(2).unwrap(), None);
        assert_eq!(stream.peek(1).unwrap(), None);
    }

    #[test]
    fn oversized_peek_is_rejected() {
        let mut stream = IoStream::new(Cursor::new(vec![0u8; 16]));
        let err = stream.peek(MAX_LOOKAHEAD + 1).unwrap_err();
        assert!(matches!(err, SourceError::PeekTooLarge { .. }));
    }
}
