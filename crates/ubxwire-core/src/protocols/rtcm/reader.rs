use super::layout;
use super::parser::declared_length;
use crate::protocols::common::reader::read_or_incomplete;
use crate::protocols::{FrameError, FrameStage, Protocol};
use crate::source::ByteStream;

/// Extract one RTCM3 frame (header, payload, CRC) from a stream positioned at
/// the preamble.
pub fn read_frame<S: ByteStream + ?Sized>(stream: &mut S) -> Result<Vec<u8>, FrameError> {
    let mut frame =
        read_or_incomplete(stream, layout::HEADER_LEN, Protocol::Rtcm3, FrameStage::SeekSync)?;
    let length = declared_length(&frame).unwrap_or_default();

    let payload = read_or_incomplete(stream, length, Protocol::Rtcm3, FrameStage::HeaderRead)?;
    frame.extend_from_slice(&payload);
    let crc = read_or_incomplete(stream, layout::CRC_LEN, Protocol::Rtcm3, FrameStage::PayloadRead)?;
    frame.extend_from_slice(&crc);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::read_frame;
    use crate::protocols::{FrameError, FrameStage, Protocol};
    use crate::source::IoStream;
    use std::io::Cursor;

    #[test]
    fn reads_header_payload_and_crc() {
        let mut bytes = vec![0xd3, 0x00, 0x04, 0x3e, 0xd0, 0x01, 0x02, 0xaa, 0xbb, 0xcc];
        bytes.push(0x24);
        let mut stream = IoStream::new(Cursor::new(bytes));
        let frame = read_frame(&mut stream).unwrap();
        assert_eq!(frame.len(), 10);
        assert_eq!(&frame[7..], &[0xaa, 0xbb, 0xcc]);
    }

    #[test]
    fn missing_crc_is_incomplete() {
        let bytes = vec![0xd3, 0x00, 0x02, 0x3e, 0xd0, 0xaa];
        let mut stream = IoStream::new(Cursor::new(bytes));
        let err = read_frame(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Incomplete {
                protocol: Protocol::Rtcm3,
                stage: FrameStage::PayloadRead
            }
        ));
    }
}
