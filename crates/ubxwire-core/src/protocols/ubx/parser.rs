use super::checksum::{self, ChecksumPair};
use super::error::UbxError;
use super::layout;
use crate::protocols::common::reader::SliceReader;

/// One binary frame. The declared length always equals `payload.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UbxFrame {
    class: u8,
    id: u8,
    payload: Vec<u8>,
    checksum: ChecksumPair,
}

impl UbxFrame {
    /// Build a frame with a freshly computed checksum.
    pub fn new(class: u8, id: u8, payload: Vec<u8>) -> Result<Self, UbxError> {
        let length = payload_length(&payload)?;
        let checksum = checksum::compute(class, id, length, &payload);
        Ok(Self {
            class,
            id,
            payload,
            checksum,
        })
    }

    /// Frame as read from the wire; the checksum is not verified.
    pub(crate) fn from_parts(class: u8, id: u8, payload: Vec<u8>, checksum: ChecksumPair) -> Self {
        Self {
            class,
            id,
            payload,
            checksum,
        }
    }

    pub fn class(&self) -> u8 {
        self.class
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    pub fn length(&self) -> u16 {
        self.payload.len() as u16
    }

    /// Checksum carried by the frame.
    pub fn checksum(&self) -> ChecksumPair {
        self.checksum
    }

    pub fn computed_checksum(&self) -> ChecksumPair {
        checksum::compute(self.class, self.id, self.length(), &self.payload)
    }

    pub fn is_valid(&self) -> bool {
        checksum::verify(self)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::FRAME_OVERHEAD + self.payload.len());
        out.extend_from_slice(&layout::SYNC);
        out.push(self.class);
        out.push(self.id);
        out.extend_from_slice(&self.length().to_le_bytes());
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(&self.checksum.to_bytes());
        out
    }
}

/// Build a complete wire frame (sync, header, payload, checksum).
///
/// # Examples
/// ```
/// use ubxwire_core::protocols::ubx::encode_frame;
///
/// let bytes = encode_frame(0x05, 0x01, &[0x06, 0x01]).unwrap();
/// assert_eq!(bytes, [0xb5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x01, 0x0f, 0x38]);
/// ```
pub fn encode_frame(class: u8, id: u8, payload: &[u8]) -> Result<Vec<u8>, UbxError> {
    Ok(UbxFrame::new(class, id, payload.to_vec())?.to_bytes())
}

/// Parse and verify one complete frame buffer.
///
/// The buffer must hold exactly one frame: trailing bytes are reported as a
/// length mismatch.
pub fn parse_frame(bytes: &[u8]) -> Result<UbxFrame, UbxError> {
    let reader = SliceReader::new(bytes);
    reader.require_len(layout::FRAME_OVERHEAD)?;

    let sync = reader.read_slice(0..layout::SYNC_LEN)?;
    if sync != layout::SYNC {
        return Err(UbxError::InvalidSync {
            found: [sync[0], sync[1]],
        });
    }

    let class = reader.read_u8(layout::CLASS_OFFSET)?;
    let id = reader.read_u8(layout::ID_OFFSET)?;
    let declared = reader.read_u16_le(layout::LENGTH_RANGE.clone())? as usize;
    let actual = reader.len() - layout::FRAME_OVERHEAD;
    if declared != actual {
        return Err(UbxError::LengthMismatch { declared, actual });
    }

    let payload_end = layout::PAYLOAD_OFFSET + declared;
    let payload = reader.read_slice(layout::PAYLOAD_OFFSET..payload_end)?;
    let trailer = reader.read_slice(payload_end..payload_end + layout::CHECKSUM_LEN)?;
    let frame = UbxFrame::from_parts(
        class,
        id,
        payload.to_vec(),
        ChecksumPair::from_bytes([trailer[0], trailer[1]]),
    );

    let expected = frame.computed_checksum();
    if expected != frame.checksum() {
        return Err(UbxError::Checksum {
            expected,
            actual: frame.checksum(),
        });
    }
    Ok(frame)
}

fn payload_length(payload: &[u8]) -> Result<u16, UbxError> {
    u16::try_from(payload.len()).map_err(|_| UbxError::PayloadTooLong {
        length: payload.len(),
    })
}
