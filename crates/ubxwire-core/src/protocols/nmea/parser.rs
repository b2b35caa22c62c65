use super::layout;

/// Address field of a sentence (`GNGGA`, `PUBX`, ...), if it is printable ASCII.
pub fn sentence_address(sentence: &[u8]) -> Option<String> {
    let body = sentence.strip_prefix(&[layout::START])?;
    let end = body
        .iter()
        .position(|&b| {
            b == layout::FIELD_SEPARATOR || b == layout::CHECKSUM_DELIMITER || b == b'\r' || b == b'\n'
        })
        .unwrap_or(body.len());
    let address = &body[..end];
    if address.is_empty() || !address.iter().all(u8::is_ascii_alphanumeric) {
        return None;
    }
    Some(String::from_utf8_lossy(address).into_owned())
}
