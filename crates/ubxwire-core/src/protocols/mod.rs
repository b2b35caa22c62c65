//! Protocol framing modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: sync values, offsets and sizes (source of truth)
//! - `reader`: stream access and protocol conventions
//! - `parser`: byte-slice decoding (no I/O)
//! - `error`: explicit, actionable errors
//!
//! `detect` discriminates the protocols sharing one stream and resynchronizes
//! on garbage. Only the binary protocol is decoded; NMEA and RTCM3 frames are
//! extracted whole and handed back opaque.

use std::fmt;

use serde::{Deserialize, Serialize};

pub(crate) mod common;
pub mod detect;
pub mod error;
pub mod nmea;
pub mod rtcm;
pub mod ubx;

pub use detect::{Detection, ProtocolDetector, detect};
pub use common::reader::TooShort;
pub use error::{FrameError, FrameStage};

/// Wire protocols that may share a receiver stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ubx,
    Nmea,
    Rtcm3,
}

impl Protocol {
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::Ubx => "ubx",
            Protocol::Nmea => "nmea",
            Protocol::Rtcm3 => "rtcm3",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
