use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SchemaError;

/// Widest integer attribute that accepts a scale exponent.
pub const MAX_SCALED_WIDTH: usize = 6;

/// Storage type of one payload attribute.
///
/// Tags follow the textual form `<letter><3-digit width>`, e.g. `U004` for a
/// 4-byte unsigned integer or `C030` for a 30-character text field. Every
/// well-formed tag parses; whether the codec implements a given width is
/// checked at decode/encode time (see [`AttributeType::is_supported`]).
///
/// # Examples
/// ```
/// use ubxwire_core::schema::AttributeType;
///
/// let attribute: AttributeType = "I004".parse().unwrap();
/// assert_eq!(attribute, AttributeType::Signed(4));
/// assert_eq!(attribute.width(), 4);
/// assert_eq!(attribute.to_string(), "I004");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttributeType {
    /// `U`: little-endian unsigned integer.
    Unsigned(usize),
    /// `I`: little-endian two's-complement integer.
    Signed(usize),
    /// `R`: IEEE-754 float.
    Float(usize),
    /// `C`: fixed-width character array.
    Char(usize),
    /// `X`: little-endian unsigned integer whose bits carry sub-values.
    Bitfield(usize),
    /// `E`: unsigned enumeration value.
    Enumeration(usize),
    /// `L`: boolean byte.
    Logical(usize),
    /// `A`: opaque byte array.
    Bytes(usize),
}

impl AttributeType {
    pub fn width(&self) -> usize {
        match *self {
            AttributeType::Unsigned(width)
            | AttributeType::Signed(width)
            | AttributeType::Float(width)
            | AttributeType::Char(width)
            | AttributeType::Bitfield(width)
            | AttributeType::Enumeration(width)
            | AttributeType::Logical(width)
            | AttributeType::Bytes(width) => width,
        }
    }

    fn letter(&self) -> char {
        match self {
            AttributeType::Unsigned(_) => 'U',
            AttributeType::Signed(_) => 'I',
            AttributeType::Float(_) => 'R',
            AttributeType::Char(_) => 'C',
            AttributeType::Bitfield(_) => 'X',
            AttributeType::Enumeration(_) => 'E',
            AttributeType::Logical(_) => 'L',
            AttributeType::Bytes(_) => 'A',
        }
    }

    /// Whether the attribute codec implements this type and width.
    pub fn is_supported(&self) -> bool {
        match *self {
            AttributeType::Unsigned(width) | AttributeType::Signed(width) => {
                matches!(width, 1..=6 | 8)
            }
            AttributeType::Float(width) => matches!(width, 4 | 8),
            AttributeType::Bitfield(width) => matches!(width, 1 | 2 | 4 | 6 | 8),
            AttributeType::Enumeration(width) => matches!(width, 1 | 2 | 4),
            AttributeType::Logical(width) => width == 1,
            AttributeType::Char(width) | AttributeType::Bytes(width) => width > 0,
        }
    }

    /// Integer types that may carry a repeat count.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            AttributeType::Unsigned(_) | AttributeType::Signed(_) | AttributeType::Enumeration(_)
        )
    }

    /// Integer types that may carry a scale exponent: every raw value of
    /// these widths converts to a float and back without loss.
    pub fn is_scalable(&self) -> bool {
        self.is_integer() && self.width() <= MAX_SCALED_WIDTH
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.letter(), self.width())
    }
}

impl FromStr for AttributeType {
    type Err = SchemaError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidAttributeTag {
            tag: tag.to_string(),
        };
        let mut chars = tag.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let width: usize = digits.parse().map_err(|_| invalid())?;
        if width == 0 {
            return Err(invalid());
        }
        let attribute = match letter {
            'U' => AttributeType::Unsigned(width),
            'I' => AttributeType::Signed(width),
            'R' => AttributeType::Float(width),
            'C' => AttributeType::Char(width),
            'X' => AttributeType::Bitfield(width),
            'E' => AttributeType::Enumeration(width),
            'L' => AttributeType::Logical(width),
            'A' => AttributeType::Bytes(width),
            _ => return Err(invalid()),
        };
        Ok(attribute)
    }
}

impl TryFrom<String> for AttributeType {
    type Error = SchemaError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<AttributeType> for String {
    fn from(attribute: AttributeType) -> Self {
        attribute.to_string()
    }
}
