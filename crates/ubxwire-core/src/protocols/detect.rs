use tracing::debug;

use super::{FrameError, Protocol, nmea, rtcm, ubx};
use crate::source::{ByteStream, SourceError};

/// Outcome of inspecting the next bytes of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Frame(Protocol),
    Unrecognized,
    EndOfStream,
}

/// Classify the frame starting at the current stream position.
///
/// Peeks at most two bytes and consumes nothing. A lone lead byte at the end
/// of the stream reports `EndOfStream`: no frame can start there.
pub fn detect<S: ByteStream + ?Sized>(stream: &mut S) -> Result<Detection, SourceError> {
    let first = match stream.peek(1)? {
        Some(bytes) => bytes[0],
        None => return Ok(Detection::EndOfStream),
    };
    if first != ubx::layout::SYNC[0] && first != nmea::layout::START && first != rtcm::layout::PREAMBLE {
        return Ok(Detection::Unrecognized);
    }

    let second = match stream.peek(2)? {
        Some(bytes) => bytes[1],
        None => return Ok(Detection::EndOfStream),
    };
    let detection = match first {
        lead if lead == ubx::layout::SYNC[0] && second == ubx::layout::SYNC[1] => {
            Detection::Frame(Protocol::Ubx)
        }
        nmea::layout::START if nmea::layout::TALKER_LEADS.contains(&second) => {
            Detection::Frame(Protocol::Nmea)
        }
        rtcm::layout::PREAMBLE if second & rtcm::layout::RESERVED_MASK == 0 => {
            Detection::Frame(Protocol::Rtcm3)
        }
        _ => Detection::Unrecognized,
    };
    Ok(detection)
}

/// Resynchronizing front end of the stream reader.
///
/// Unrecognized bytes are discarded one at a time. Once `window` bytes have
/// been discarded without finding a frame start, `FrameError::NoSync` is
/// raised and the count starts over.
#[derive(Debug, Clone)]
pub struct ProtocolDetector {
    window: usize,
    skipped: usize,
}

impl ProtocolDetector {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            skipped: 0,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Advance to the next frame start. `Ok(None)` means end of stream.
    pub fn seek<S: ByteStream + ?Sized>(
        &mut self,
        stream: &mut S,
    ) -> Result<Option<Protocol>, FrameError> {
        loop {
            match detect(stream)? {
                Detection::Frame(protocol) => {
                    if self.skipped > 0 {
                        debug!(skipped = self.skipped, %protocol, "resynchronized");
                    }
                    self.skipped = 0;
                    return Ok(Some(protocol));
                }
                Detection::EndOfStream => {
                    if self.skipped > 0 {
                        debug!(skipped = self.skipped, "stream ended while resynchronizing");
                    }
                    self.skipped = 0;
                    return Ok(None);
                }
                Detection::Unrecognized => {
                    if stream.read_exact(1)?.is_none() {
                        self.skipped = 0;
                        return Ok(None);
                    }
                    self.skipped += 1;
                    if self.skipped >= self.window {
                        let skipped = std::mem::take(&mut self.skipped);
                        return Err(FrameError::NoSync { skipped });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Detection, ProtocolDetector, detect};
    use crate::protocols::{FrameError, Protocol};
    use crate::source::{ByteStream, IoStream};
    use std::io::Cursor;

    fn detect_bytes(bytes: &[u8]) -> Detection {
        let mut stream = IoStream::new(Cursor::new(bytes.to_vec()));
        detect(&mut stream).unwrap()
    }

    #[test]
    fn detects_each_protocol() {
        assert_eq!(detect_bytes(&[0xb5, 0x62, 0x05]), Detection::Frame(Protocol::Ubx));
        assert_eq!(detect_bytes(b"$GNGGA"), Detection::Frame(Protocol::Nmea));
        assert_eq!(detect_bytes(b"$PUBX"), Detection::Frame(Protocol::Nmea));
        assert_eq!(detect_bytes(&[0xd3, 0x00, 0x13]), Detection::Frame(Protocol::Rtcm3));
    }

    #[test]
    fn near_misses_are_unrecognized() {
        assert_eq!(detect_bytes(&[0xb5, 0x63]), Detection::Unrecognized);
        assert_eq!(detect_bytes(b"$X"), Detection::Unrecognized);
        assert_eq!(detect_bytes(&[0xd3, 0x40]), Detection::Unrecognized);
        assert_eq!(detect_bytes(&[0x00, 0xb5]), Detection::Unrecognized);
    }

    #[test]
    fn lone_lead_byte_is_end_of_stream() {
        assert_eq!(detect_bytes(&[0xb5]), Detection::EndOfStream);
        assert_eq!(detect_bytes(&[]), Detection::EndOfStream);
    }

    #[test]
    fn seek_skips_garbage() {
        let mut stream = IoStream::new(Cursor::new(vec![0x01, 0x02, 0x03, 0xb5, 0x62, 0x05]));
        let mut detector = ProtocolDetector::new(16);
        assert_eq!(detector.seek(&mut stream).unwrap(), Some(Protocol::Ubx));
        assert_eq!(stream.peek(2).unwrap(), Some(&[0xb5, 0x62][..]));
    }

    #[test]
    fn seek_gives_up_after_window() {
        let mut bytes = vec![0x55u8; 10];
        bytes.extend_from_slice(&[0xb5, 0x62]);
        let mut stream = IoStream::new(Cursor::new(bytes));
        let mut detector = ProtocolDetector::new(4);

        let err = detector.seek(&mut stream).unwrap_err();
        assert!(matches!(err, FrameError::NoSync { skipped: 4 }));
        let err = detector.seek(&mut stream).unwrap_err();
        assert!(matches!(err, FrameError::NoSync { skipped: 4 }));
        assert_eq!(detector.seek(&mut stream).unwrap(), Some(Protocol::Ubx));
    }

    #[test]
    fn seek_on_trailing_garbage_ends_quietly() {
        let mut stream = IoStream::new(Cursor::new(vec![0x01, 0x02]));
        let mut detector = ProtocolDetector::new(16);
        assert_eq!(detector.seek(&mut stream).unwrap(), None);
    }
}
