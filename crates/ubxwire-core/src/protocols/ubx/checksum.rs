use std::fmt;

use serde::Serialize;

use super::parser::UbxFrame;

/// Trailing two-byte checksum of a binary frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecksumPair {
    pub ck_a: u8,
    pub ck_b: u8,
}

impl ChecksumPair {
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self {
            ck_a: bytes[0],
            ck_b: bytes[1],
        }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        [self.ck_a, self.ck_b]
    }
}

impl fmt::Display for ChecksumPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}", self.ck_a, self.ck_b)
    }
}

/// Checksum over `class || id || length (LE) || payload`.
///
/// # Examples
/// ```
/// use ubxwire_core::protocols::ubx::compute;
///
/// let ck = compute(0x05, 0x01, 2, &[0x06, 0x01]);
/// assert_eq!(ck.to_bytes(), [0x0f, 0x38]);
/// ```
pub fn compute(class: u8, id: u8, length: u16, payload: &[u8]) -> ChecksumPair {
    let [len_lo, len_hi] = length.to_le_bytes();
    fletcher8([class, id, len_lo, len_hi].iter().chain(payload))
}

/// Recompute the checksum of `frame` and compare it with the one it carries.
pub fn verify(frame: &UbxFrame) -> bool {
    frame.computed_checksum() == frame.checksum()
}

fn fletcher8<'a>(bytes: impl IntoIterator<Item = &'a u8>) -> ChecksumPair {
    let mut ck_a = 0u8;
    let mut ck_b = 0u8;
    for &byte in bytes {
        ck_a = ck_a.wrapping_add(byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }
    ChecksumPair { ck_a, ck_b }
}
