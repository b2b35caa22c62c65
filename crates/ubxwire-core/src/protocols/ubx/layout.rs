pub const SYNC: [u8; 2] = [0xb5, 0x62];
pub const SYNC_LEN: usize = 2;

pub const CLASS_OFFSET: usize = 2;
pub const ID_OFFSET: usize = 3;
pub const LENGTH_RANGE: std::ops::Range<usize> = 4..6;
pub const PAYLOAD_OFFSET: usize = 6;

/// Class, id and the two length bytes.
pub const HEADER_LEN: usize = 4;
pub const CHECKSUM_LEN: usize = 2;
pub const FRAME_OVERHEAD: usize = SYNC_LEN + HEADER_LEN + CHECKSUM_LEN;

pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;
pub const MAX_FRAME_LEN: usize = FRAME_OVERHEAD + MAX_PAYLOAD_LEN;
