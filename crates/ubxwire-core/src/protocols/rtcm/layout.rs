pub const PREAMBLE: u8 = 0xd3;
/// Bits of the second header byte that must be zero.
pub const RESERVED_MASK: u8 = 0xfc;
pub const HEADER_LEN: usize = 3;
pub const LENGTH_RANGE: std::ops::Range<usize> = 1..3;
pub const LENGTH_MASK: u16 = 0x03ff;
pub const CRC_LEN: usize = 3;
