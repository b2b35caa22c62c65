pub const START: u8 = b'$';
/// Second byte of talker ids accepted as a sentence start (`$G...`, `$P...`).
pub const TALKER_LEADS: [u8; 2] = [b'G', b'P'];
pub const TERMINATOR: u8 = b'\n';
pub const FIELD_SEPARATOR: u8 = b',';
pub const CHECKSUM_DELIMITER: u8 = b'*';

/// Upper bound for one sentence, proprietary sentences included.
pub const MAX_SENTENCE_LEN: usize = 1024;
