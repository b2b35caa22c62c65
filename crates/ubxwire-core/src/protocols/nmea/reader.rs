use super::layout;
use crate::protocols::common::reader::read_or_incomplete;
use crate::protocols::{FrameError, FrameStage, Protocol};
use crate::source::ByteStream;

/// Extract one sentence, terminator included, from a stream positioned at `$`.
pub fn read_sentence<S: ByteStream + ?Sized>(stream: &mut S) -> Result<Vec<u8>, FrameError> {
    let mut sentence = read_or_incomplete(stream, 1, Protocol::Nmea, FrameStage::SeekSync)?;
    loop {
        if sentence.len() >= layout::MAX_SENTENCE_LEN {
            return Err(FrameError::SentenceTooLong {
                limit: layout::MAX_SENTENCE_LEN,
            });
        }
        let byte = read_or_incomplete(stream, 1, Protocol::Nmea, FrameStage::Synced)?;
        sentence.push(byte[0]);
        if byte[0] == layout::TERMINATOR {
            return Ok(sentence);
        }
    }
}
