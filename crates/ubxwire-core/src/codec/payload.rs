//! Schema walk over a whole payload.
//!
//! Fields are laid out contiguously in declaration order. Decoding must
//! consume the payload exactly; leftover or missing bytes are reported as
//! [`CodecError::SchemaLengthMismatch`].

use std::collections::HashMap;

use super::attribute::{decode_attribute, decode_bits, encode_attribute, encode_bits, ensure_supported};
use super::error::CodecError;
use super::value::{Record, Value};
use super::CodecOptions;
use crate::schema::{FieldKind, FieldSchema, MessageSchema, RepeatCount, fixed_record_size};

/// Decode `payload` against `schema`.
///
/// ```
/// use ubxwire_core::codec::{CodecOptions, Value, decode_payload};
/// use ubxwire_core::schema::{AttributeType, FieldSchema, MessageSchema};
///
/// let schema = MessageSchema::new(
///     0x05,
///     0x01,
///     "ACK-ACK",
///     vec![
///         FieldSchema::scalar("clsID", AttributeType::Unsigned(1)),
///         FieldSchema::scalar("msgID", AttributeType::Unsigned(1)),
///     ],
/// )
/// .unwrap();
/// let record = decode_payload(&schema, &[0x06, 0x01], CodecOptions::default()).unwrap();
/// assert_eq!(record["clsID"], Value::Unsigned(6));
/// assert_eq!(record["msgID"], Value::Unsigned(1));
/// ```
pub fn decode_payload(
    schema: &MessageSchema,
    payload: &[u8],
    options: CodecOptions,
) -> Result<Record, CodecError> {
    let mut cursor = Cursor::new(payload);
    let record = decode_fields(schema.fields(), &mut cursor, options)?;
    if cursor.position != payload.len() {
        return Err(CodecError::SchemaLengthMismatch {
            declared: payload.len(),
            consumed: cursor.position,
        });
    }
    Ok(record)
}

/// Encode `record` against `schema`.
///
/// Repeat counts are derived from the group list lengths; a count supplied in
/// `record` must agree with them.
pub fn encode_payload(
    schema: &MessageSchema,
    record: &Record,
    options: CodecOptions,
) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode_fields(schema.fields(), record, &mut out, options)?;
    Ok(out)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let end = self.position + len;
        let bytes = self
            .bytes
            .get(self.position..end)
            .ok_or(CodecError::SchemaLengthMismatch {
                declared: self.bytes.len(),
                consumed: end,
            })?;
        self.position = end;
        Ok(bytes)
    }
}

fn decode_fields(
    fields: &[FieldSchema],
    cursor: &mut Cursor<'_>,
    options: CodecOptions,
) -> Result<Record, CodecError> {
    let mut record = Record::new();
    for field in fields {
        let value = match &field.kind {
            FieldKind::Scalar { attribute, scale } => {
                ensure_supported(*attribute)?;
                let bytes = cursor.take(attribute.width())?;
                decode_attribute(*attribute, scale.filter(|_| options.apply_scaling), bytes)?
            }
            FieldKind::Bitfield { attribute, bits } => {
                ensure_supported(*attribute)?;
                let raw = decode_attribute(*attribute, None, cursor.take(attribute.width())?)?;
                match raw {
                    Value::Unsigned(raw) if options.decode_bitfields && !bits.is_empty() => {
                        Value::Bitfield(decode_bits(raw, bits))
                    }
                    raw => raw,
                }
            }
            FieldKind::Group { count, fields: sub } => {
                let repeats = repeat_count(&field.name, count, sub, &record, cursor)?;
                let mut records = Vec::with_capacity(repeats.min(cursor.remaining()));
                for _ in 0..repeats {
                    records.push(decode_fields(sub, cursor, options)?);
                }
                Value::Group(records)
            }
        };
        record.insert(field.name.clone(), value);
    }
    Ok(record)
}

fn repeat_count(
    group: &str,
    count: &RepeatCount,
    fields: &[FieldSchema],
    decoded: &Record,
    cursor: &Cursor<'_>,
) -> Result<usize, CodecError> {
    let invalid = |count: &str| CodecError::InvalidRepeatCount {
        group: group.to_string(),
        count: count.to_string(),
    };
    match count {
        RepeatCount::Field(name) => decoded
            .get(name)
            .and_then(Value::as_u64)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| invalid(name)),
        RepeatCount::Remaining => match fixed_record_size(fields) {
            Some(size) if size > 0 => Ok(cursor.remaining() / size),
            _ => Err(invalid("<remaining>")),
        },
    }
}

fn encode_fields(
    fields: &[FieldSchema],
    record: &Record,
    out: &mut Vec<u8>,
    options: CodecOptions,
) -> Result<(), CodecError> {
    let counts = group_lengths(fields, record);
    for field in fields {
        match &field.kind {
            FieldKind::Scalar { attribute, scale } => {
                let value = match counts.get(field.name.as_str()) {
                    Some(&(group, actual)) => {
                        let actual_value = Value::Unsigned(actual as u64);
                        if let Some(given) = record.get(&field.name) {
                            if given.as_u64() != Some(actual as u64) {
                                return Err(CodecError::CountMismatch {
                                    count: field.name.clone(),
                                    group: group.to_string(),
                                    given: given.clone(),
                                    actual,
                                });
                            }
                        }
                        actual_value
                    }
                    None => required(record, &field.name)?.clone(),
                };
                let scale = scale.filter(|_| options.apply_scaling);
                out.extend(encode_attribute(&field.name, *attribute, scale, &value)?);
            }
            FieldKind::Bitfield { attribute, bits } => {
                let value = match required(record, &field.name)? {
                    Value::Bitfield(sub) => {
                        Value::Unsigned(encode_bits(&field.name, *attribute, bits, sub)?)
                    }
                    raw => raw.clone(),
                };
                out.extend(encode_attribute(&field.name, *attribute, None, &value)?);
            }
            FieldKind::Group { fields: sub, .. } => {
                let records = required(record, &field.name)?
                    .as_group()
                    .ok_or_else(|| CodecError::TypeMismatch {
                        field: field.name.clone(),
                        expected: "a list of records".to_string(),
                    })?;
                for entry in records {
                    encode_fields(sub, entry, out, options)?;
                }
            }
        }
    }
    Ok(())
}

/// Count field name to (group name, list length) for this level.
fn group_lengths<'a>(fields: &'a [FieldSchema], record: &Record) -> HashMap<&'a str, (&'a str, usize)> {
    fields
        .iter()
        .filter_map(|field| match &field.kind {
            FieldKind::Group {
                count: RepeatCount::Field(count),
                ..
            } => {
                let len = record.get(&field.name)?.as_group()?.len();
                Some((count.as_str(), (field.name.as_str(), len)))
            }
            _ => None,
        })
        .collect()
}

fn required<'r>(record: &'r Record, field: &str) -> Result<&'r Value, CodecError> {
    record.get(field).ok_or_else(|| CodecError::MissingField {
        field: field.to_string(),
    })
}
