use super::layout;

/// 12-bit message number at the start of the payload of a complete frame.
pub fn message_type(frame: &[u8]) -> Option<u16> {
    let payload = frame.get(layout::HEADER_LEN..layout::HEADER_LEN + 2)?;
    Some(((payload[0] as u16) << 4) | ((payload[1] as u16) >> 4))
}

/// Payload length declared by a 3-byte header.
pub(crate) fn declared_length(header: &[u8]) -> Option<usize> {
    let bytes = header.get(layout::LENGTH_RANGE.clone())?;
    Some((u16::from_be_bytes([bytes[0], bytes[1]]) & layout::LENGTH_MASK) as usize)
}
