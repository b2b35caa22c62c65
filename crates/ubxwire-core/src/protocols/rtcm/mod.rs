//! RTCM 3 frame skipping.
//!
//! Frames are delimited by the 10-bit length in the 3-byte header and carry a
//! 24-bit CRC trailer. The CRC is not checked; frames are returned opaque.

pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::message_type;
pub use reader::read_frame;
