//! NMEA 0183 sentence framing.
//!
//! Sentences are extracted whole (start character through line terminator)
//! and returned opaque. Only the address field is parsed, to label frames.

pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::sentence_address;
pub use reader::read_sentence;
