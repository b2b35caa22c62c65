//! Single-attribute conversion between wire bytes and [`Value`]s.

use super::error::CodecError;
use super::scaling::{to_raw, to_scaled};
use super::value::{Record, Value};
use crate::schema::{AttributeType, BitRange};

/// Decode one attribute occupying exactly `bytes`.
///
/// With a scale exponent, integer attributes decode to [`Value::Float`].
pub fn decode_attribute(
    attribute: AttributeType,
    scale: Option<u8>,
    bytes: &[u8],
) -> Result<Value, CodecError> {
    ensure_supported(attribute)?;
    if bytes.len() != attribute.width() {
        return Err(CodecError::InvalidLength {
            attribute,
            expected: attribute.width(),
            actual: bytes.len(),
        });
    }

    let value = match attribute {
        AttributeType::Unsigned(_) | AttributeType::Enumeration(_) => {
            let raw = read_le(bytes);
            match scale {
                Some(exponent) => Value::Float(to_scaled(raw as f64, exponent)),
                None => Value::Unsigned(raw),
            }
        }
        AttributeType::Signed(width) => {
            let raw = sign_extend(read_le(bytes), width);
            match scale {
                Some(exponent) => Value::Float(to_scaled(raw as f64, exponent)),
                None => Value::Signed(raw),
            }
        }
        AttributeType::Bitfield(_) => Value::Unsigned(read_le(bytes)),
        AttributeType::Float(4) => {
            Value::Float(f64::from(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])))
        }
        AttributeType::Float(_) => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(bytes);
            Value::Float(f64::from_le_bytes(raw))
        }
        AttributeType::Char(_) => {
            let end = bytes
                .iter()
                .rposition(|byte| *byte != 0 && *byte != b' ')
                .map_or(0, |index| index + 1);
            Value::Text(String::from_utf8_lossy(&bytes[..end]).into_owned())
        }
        AttributeType::Logical(_) => Value::Bool(bytes[0] != 0),
        AttributeType::Bytes(_) => Value::Bytes(bytes.to_vec()),
    };
    Ok(value)
}

/// Encode `value` into exactly `attribute.width()` bytes.
///
/// `field` only labels errors.
pub fn encode_attribute(
    field: &str,
    attribute: AttributeType,
    scale: Option<u8>,
    value: &Value,
) -> Result<Vec<u8>, CodecError> {
    ensure_supported(attribute)?;
    let width = attribute.width();
    let overflow = || CodecError::EncodingOverflow {
        field: field.to_string(),
        attribute,
    };
    let mismatch = || CodecError::TypeMismatch {
        field: field.to_string(),
        expected: attribute.to_string(),
    };

    match attribute {
        AttributeType::Unsigned(_) | AttributeType::Enumeration(_) | AttributeType::Bitfield(_) => {
            let raw = match scale {
                Some(exponent) => {
                    let raw = to_raw(value.as_f64().ok_or_else(mismatch)?, exponent);
                    if !(raw >= 0.0 && raw < integer_limit(width)) {
                        return Err(overflow());
                    }
                    raw as u64
                }
                None => value.as_u64().ok_or_else(mismatch)?,
            };
            if raw > unsigned_max(width) {
                return Err(overflow());
            }
            Ok(raw.to_le_bytes()[..width].to_vec())
        }
        AttributeType::Signed(_) => {
            let (min, max) = signed_range(width);
            let raw = match scale {
                Some(exponent) => {
                    let raw = to_raw(value.as_f64().ok_or_else(mismatch)?, exponent);
                    let limit = integer_limit(width) / 2.0;
                    if !(raw >= -limit && raw < limit) {
                        return Err(overflow());
                    }
                    raw as i64
                }
                None => value.as_i64().ok_or_else(mismatch)?,
            };
            if raw < min || raw > max {
                return Err(overflow());
            }
            Ok(raw.to_le_bytes()[..width].to_vec())
        }
        AttributeType::Float(4) => {
            let wide = value.as_f64().ok_or_else(mismatch)?;
            let narrow = wide as f32;
            if wide.is_finite() && !narrow.is_finite() {
                return Err(overflow());
            }
            Ok(narrow.to_le_bytes().to_vec())
        }
        AttributeType::Float(_) => Ok(value.as_f64().ok_or_else(mismatch)?.to_le_bytes().to_vec()),
        AttributeType::Char(_) => {
            let text = value.as_str().ok_or_else(mismatch)?;
            pad(text.as_bytes(), width).ok_or_else(overflow)
        }
        AttributeType::Logical(_) => {
            let flag = match value {
                Value::Bool(flag) => *flag,
                other => other.as_u64().ok_or_else(mismatch)? != 0,
            };
            Ok(vec![u8::from(flag)])
        }
        AttributeType::Bytes(_) => match value {
            Value::Bytes(bytes) => pad(bytes, width).ok_or_else(overflow),
            _ => Err(mismatch()),
        },
    }
}

/// Split a raw bitfield into its named sub-ranges.
///
/// Single-bit ranges become booleans, wider ranges unsigned integers.
pub fn decode_bits(raw: u64, bits: &[BitRange]) -> Record {
    bits.iter()
        .map(|range| {
            let value = raw.checked_shr(u32::from(range.offset)).unwrap_or(0) & bit_mask(range.width);
            let value = if range.width == 1 {
                Value::Bool(value == 1)
            } else {
                Value::Unsigned(value)
            };
            (range.name.clone(), value)
        })
        .collect()
}

/// Pack named sub-values back into a raw bitfield. Absent ranges are zero.
pub fn encode_bits(
    field: &str,
    attribute: AttributeType,
    bits: &[BitRange],
    values: &Record,
) -> Result<u64, CodecError> {
    let mut raw = 0u64;
    for range in bits {
        let Some(value) = values.get(&range.name) else {
            continue;
        };
        let label = || format!("{field}.{}", range.name);
        let sub = value.as_u64().ok_or_else(|| CodecError::TypeMismatch {
            field: label(),
            expected: format!("an integer of {} bits", range.width),
        })?;
        if sub > bit_mask(range.width) {
            return Err(CodecError::EncodingOverflow {
                field: label(),
                attribute,
            });
        }
        raw |= sub.checked_shl(u32::from(range.offset)).unwrap_or(0);
    }
    Ok(raw)
}

pub(crate) fn ensure_supported(attribute: AttributeType) -> Result<(), CodecError> {
    if attribute.is_supported() {
        Ok(())
    } else {
        Err(CodecError::UnsupportedAttributeType { attribute })
    }
}

fn read_le(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .rev()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

fn sign_extend(raw: u64, width: usize) -> i64 {
    let unused = 64 - 8 * width as u32;
    ((raw << unused) as i64) >> unused
}

fn unsigned_max(width: usize) -> u64 {
    bit_mask((8 * width) as u8)
}

/// `2^(8 * width)`, exact in f64 for every supported width.
fn integer_limit(width: usize) -> f64 {
    2f64.powi(8 * width as i32)
}

fn signed_range(width: usize) -> (i64, i64) {
    let max = (unsigned_max(width) >> 1) as i64;
    (-max - 1, max)
}

fn bit_mask(width: u8) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn pad(bytes: &[u8], width: usize) -> Option<Vec<u8>> {
    if bytes.len() > width {
        return None;
    }
    let mut padded = bytes.to_vec();
    padded.resize(width, 0);
    Some(padded)
}

#[cfg(test)]
mod tests {
    use super::{decode_attribute, decode_bits, encode_attribute, encode_bits};
    use crate::codec::{CodecError, Record, Value};
    use crate::schema::{AttributeType, BitRange};

    fn tag(text: &str) -> AttributeType {
        text.parse().unwrap()
    }

    #[test]
    fn decodes_little_endian_integers() {
        assert_eq!(
            decode_attribute(tag("U002"), None, &[0x34, 0x12]).unwrap(),
            Value::Unsigned(0x1234)
        );
        assert_eq!(
            decode_attribute(tag("U008"), None, &[0xff; 8]).unwrap(),
            Value::Unsigned(u64::MAX)
        );
        assert_eq!(
            decode_attribute(tag("I002"), None, &[0xfe, 0xff]).unwrap(),
            Value::Signed(-2)
        );
    }

    #[test]
    fn sign_extends_odd_widths() {
        assert_eq!(
            decode_attribute(tag("I003"), None, &[0xff, 0xff, 0xff]).unwrap(),
            Value::Signed(-1)
        );
        assert_eq!(
            decode_attribute(tag("I003"), None, &[0x00, 0x00, 0x80]).unwrap(),
            Value::Signed(-8_388_608)
        );
        assert_eq!(
            decode_attribute(tag("I005"), None, &[0xff, 0xff, 0xff, 0xff, 0x7f]).unwrap(),
            Value::Signed(549_755_813_887)
        );
        assert_eq!(
            decode_attribute(tag("I006"), None, &[0xfe, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap(),
            Value::Signed(-2)
        );
    }

    #[test]
    fn signed_odd_widths_encode_back() {
        for raw in [-8_388_608i64, -1, 0, 1, 8_388_607] {
            let bytes = encode_attribute("x", tag("I003"), None, &Value::Signed(raw)).unwrap();
            assert_eq!(bytes.len(), 3);
            assert_eq!(
                decode_attribute(tag("I003"), None, &bytes).unwrap(),
                Value::Signed(raw)
            );
        }
    }

    #[test]
    fn scaled_integers_decode_to_floats() {
        let bytes = (-1_234_567_890i32).to_le_bytes();
        assert_eq!(
            decode_attribute(tag("I004"), Some(7), &bytes).unwrap(),
            Value::Float(-123.456789)
        );
        let encoded = encode_attribute("lon", tag("I004"), Some(7), &Value::Float(-123.456789)).unwrap();
        assert_eq!(encoded, bytes.to_vec());
    }

    #[test]
    fn scaled_widths_round_trip_their_full_range() {
        let unsigned = ["U001", "U002", "U003", "U004", "U005", "U006", "E001", "E002", "E004"];
        for text in unsigned {
            let attribute = tag(text);
            let width = attribute.width();
            let max = u64::MAX >> (64 - 8 * width);
            for raw in [0, 1, max / 3, max - 1, max] {
                let bytes = raw.to_le_bytes()[..width].to_vec();
                for exponent in 0u8..=9 {
                    let value = decode_attribute(attribute, Some(exponent), &bytes).unwrap();
                    let encoded = encode_attribute("v", attribute, Some(exponent), &value).unwrap();
                    assert_eq!(encoded, bytes, "{text} raw {raw} exponent {exponent}");
                }
            }
        }
        for text in ["I001", "I002", "I003", "I004", "I005", "I006"] {
            let attribute = tag(text);
            let width = attribute.width();
            let max = i64::MAX >> (64 - 8 * width);
            let min = -max - 1;
            for raw in [min, min + 1, -1, 0, 1, max / 3, max - 1, max] {
                let bytes = raw.to_le_bytes()[..width].to_vec();
                for exponent in 0u8..=9 {
                    let value = decode_attribute(attribute, Some(exponent), &bytes).unwrap();
                    let encoded = encode_attribute("v", attribute, Some(exponent), &value).unwrap();
                    assert_eq!(encoded, bytes, "{text} raw {raw} exponent {exponent}");
                }
            }
        }
    }

    #[test]
    fn six_byte_scaled_value_keeps_low_digits() {
        let bytes = 98_765_432_109_876i64.to_le_bytes()[..6].to_vec();
        let value = decode_attribute(tag("I006"), Some(2), &bytes).unwrap();
        assert_eq!(value, Value::Float(987_654_321_098.76));
        assert_eq!(encode_attribute("v", tag("I006"), Some(2), &value).unwrap(), bytes);
    }

    #[test]
    fn scaled_eight_byte_bounds_are_strict() {
        assert!(matches!(
            encode_attribute("n", tag("U008"), Some(0), &Value::Float(2f64.powi(64))),
            Err(CodecError::EncodingOverflow { .. })
        ));
        assert!(matches!(
            encode_attribute("n", tag("I008"), Some(0), &Value::Float(2f64.powi(63))),
            Err(CodecError::EncodingOverflow { .. })
        ));
        assert_eq!(
            encode_attribute("n", tag("I008"), Some(0), &Value::Float(-(2f64.powi(63)))).unwrap(),
            i64::MIN.to_le_bytes().to_vec()
        );
    }

    #[test]
    fn floats_are_ieee_little_endian() {
        let bytes = 1.5f32.to_le_bytes();
        assert_eq!(decode_attribute(tag("R004"), None, &bytes).unwrap(), Value::Float(1.5));
        let bytes = encode_attribute("x", tag("R008"), None, &Value::Float(-0.25)).unwrap();
        assert_eq!(bytes, (-0.25f64).to_le_bytes().to_vec());
        assert!(matches!(
            encode_attribute("x", tag("R004"), None, &Value::Float(1e300)),
            Err(CodecError::EncodingOverflow { .. })
        ));
    }

    #[test]
    fn text_trims_and_pads() {
        assert_eq!(
            decode_attribute(tag("C006"), None, b"ROM \0\0").unwrap(),
            Value::Text("ROM".to_string())
        );
        assert_eq!(
            encode_attribute("sw", tag("C006"), None, &Value::from("ROM")).unwrap(),
            b"ROM\0\0\0".to_vec()
        );
        assert!(matches!(
            encode_attribute("sw", tag("C002"), None, &Value::from("ROM")),
            Err(CodecError::EncodingOverflow { .. })
        ));
    }

    #[test]
    fn integer_range_is_checked() {
        assert!(matches!(
            encode_attribute("n", tag("U001"), None, &Value::Unsigned(256)),
            Err(CodecError::EncodingOverflow { .. })
        ));
        assert!(matches!(
            encode_attribute("n", tag("I001"), None, &Value::Signed(-129)),
            Err(CodecError::EncodingOverflow { .. })
        ));
        assert!(matches!(
            encode_attribute("n", tag("U002"), Some(2), &Value::Float(655.36)),
            Err(CodecError::EncodingOverflow { .. })
        ));
        assert!(matches!(
            encode_attribute("n", tag("U001"), None, &Value::Signed(-1)),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_unsupported_and_misfit_inputs() {
        assert!(matches!(
            decode_attribute(tag("U007"), None, &[0; 7]),
            Err(CodecError::UnsupportedAttributeType { .. })
        ));
        assert!(matches!(
            decode_attribute(tag("U004"), None, &[0; 3]),
            Err(CodecError::InvalidLength { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn bit_ranges_expand_and_pack() {
        let bits = vec![
            BitRange::flag("gpsFixOk", 0),
            BitRange::flag("diffSoln", 1),
            BitRange::new("psmState", 2, 3),
        ];
        let record = decode_bits(0b1_0101, &bits);
        assert_eq!(record["gpsFixOk"], Value::Bool(true));
        assert_eq!(record["diffSoln"], Value::Bool(false));
        assert_eq!(record["psmState"], Value::Unsigned(0b101));
        assert_eq!(encode_bits("flags", tag("X001"), &bits, &record).unwrap(), 0b1_0101);

        let mut partial = Record::new();
        partial.insert("psmState".to_string(), Value::Unsigned(2));
        assert_eq!(encode_bits("flags", tag("X001"), &bits, &partial).unwrap(), 0b0_1000);

        partial.insert("psmState".to_string(), Value::Unsigned(8));
        assert!(matches!(
            encode_bits("flags", tag("X001"), &bits, &partial),
            Err(CodecError::EncodingOverflow { .. })
        ));
    }
}
