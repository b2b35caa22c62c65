//! Schema-driven payload codec.
//!
//! `attribute` converts single fields between bytes and [`Value`]s, `scaling`
//! handles fixed-point attributes, and `payload` walks a [`MessageSchema`]
//! over a whole payload, expanding bitfields and repeat groups.
//!
//! [`MessageSchema`]: crate::schema::MessageSchema

pub mod attribute;
pub mod error;
pub mod payload;
pub mod scaling;
pub mod value;

pub use attribute::{decode_attribute, decode_bits, encode_attribute, encode_bits};
pub use error::CodecError;
pub use payload::{decode_payload, encode_payload};
pub use scaling::{to_raw, to_scaled};
pub use value::{Record, Value};

use serde::{Deserialize, Serialize};

/// Interpretation switches shared by decoding and encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecOptions {
    /// Expand bitfields into named sub-values instead of raw integers.
    pub decode_bitfields: bool,
    /// Apply scale exponents instead of exposing raw integers.
    pub apply_scaling: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            decode_bitfields: true,
            apply_scaling: true,
        }
    }
}
