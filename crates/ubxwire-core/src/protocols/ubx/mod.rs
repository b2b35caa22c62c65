//! u-blox binary protocol framing.
//!
//! Frame layout: `[sync0][sync1][class][id][length LE][payload][ck_a][ck_b]`.
//! The checksum is an 8-bit Fletcher sum over class, id, length and payload.
//! `reader` extracts frames from a stream without verifying them; the stream
//! reader decides whether a checksum mismatch is fatal. `parser` works on
//! complete frame buffers and always verifies.

pub mod checksum;
pub mod classes;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use checksum::{ChecksumPair, compute, verify};
pub use parser::{UbxFrame, encode_frame, parse_frame};
pub use reader::read_frame;
