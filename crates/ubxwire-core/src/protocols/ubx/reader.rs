use super::checksum::ChecksumPair;
use super::layout;
use super::parser::UbxFrame;
use crate::protocols::common::reader::read_or_incomplete;
use crate::protocols::{FrameError, FrameStage, Protocol};
use crate::source::ByteStream;

/// Extract one binary frame from a stream positioned at its sync bytes.
///
/// The checksum is read but not verified. When the stream ends early the
/// error names the last stage that completed.
pub fn read_frame<S: ByteStream + ?Sized>(stream: &mut S) -> Result<UbxFrame, FrameError> {
    let sync = read_or_incomplete(stream, layout::SYNC_LEN, Protocol::Ubx, FrameStage::SeekSync)?;
    if sync != layout::SYNC {
        return Err(super::error::UbxError::InvalidSync {
            found: [sync[0], sync[1]],
        }
        .into());
    }

    let header = read_or_incomplete(stream, layout::HEADER_LEN, Protocol::Ubx, FrameStage::Synced)?;
    let class = header[0];
    let id = header[1];
    let length = u16::from_le_bytes([header[2], header[3]]) as usize;

    let payload = read_or_incomplete(stream, length, Protocol::Ubx, FrameStage::HeaderRead)?;
    let trailer = read_or_incomplete(
        stream,
        layout::CHECKSUM_LEN,
        Protocol::Ubx,
        FrameStage::PayloadRead,
    )?;

    Ok(UbxFrame::from_parts(
        class,
        id,
        payload,
        ChecksumPair::from_bytes([trailer[0], trailer[1]]),
    ))
}

#[cfg(test)]
mod tests {
    use super::read_frame;
    use crate::protocols::{FrameError, FrameStage, Protocol};
    use crate::source::IoStream;
    use std::io::Cursor;

    const ACK: [u8; 10] = [0xb5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x01, 0x0f, 0x38];

    fn incomplete_stage(bytes: &[u8]) -> FrameStage {
        let mut stream = IoStream::new(Cursor::new(bytes.to_vec()));
        match read_frame(&mut stream) {
            Err(FrameError::Incomplete {
                protocol: Protocol::Ubx,
                stage,
            }) => stage,
            other => panic!("expected incomplete frame, got {other:?}"),
        }
    }

    #[test]
    fn reads_one_frame_and_stops() {
        let mut bytes = ACK.to_vec();
        bytes.extend_from_slice(&[0x24, 0x47]);
        let mut stream = IoStream::new(Cursor::new(bytes));
        let frame = read_frame(&mut stream).unwrap();
        assert_eq!(frame.class(), 0x05);
        assert_eq!(frame.payload(), &[0x06, 0x01]);
        assert!(frame.is_valid());

        let mut rest = stream.into_inner();
        let mut tail = Vec::new();
        std::io::Read::read_to_end(&mut rest, &mut tail).unwrap();
        assert_eq!(tail, [0x24, 0x47]);
    }

    #[test]
    fn does_not_verify_checksum() {
        let mut bytes = ACK;
        bytes[8] = 0x00;
        let mut stream = IoStream::new(Cursor::new(bytes.to_vec()));
        let frame = read_frame(&mut stream).unwrap();
        assert!(!frame.is_valid());
    }

    #[test]
    fn reports_stage_at_which_stream_ended() {
        assert_eq!(incomplete_stage(&ACK[..1]), FrameStage::SeekSync);
        assert_eq!(incomplete_stage(&ACK[..4]), FrameStage::Synced);
        assert_eq!(incomplete_stage(&ACK[..7]), FrameStage::HeaderRead);
        assert_eq!(incomplete_stage(&ACK[..9]), FrameStage::PayloadRead);
    }
}
