//! Message schemas: the data that drives payload decoding.
//!
//! A schema is an ordered list of typed field descriptors keyed by
//! `(class, id, mode)`. Schemas are data, typically loaded from a JSON catalog, and
//! are validated once at construction so the payload codec can trust them:
//! repeat counts refer to earlier integer fields, bit ranges fit their
//! bitfield, and field names are unique per level.
//!
//! Catalog format:
//! ```json
//! { "messages": [
//!   { "class": 5, "id": 1, "name": "ACK-ACK", "fields": [
//!     { "name": "ackClass", "type": "U001" },
//!     { "name": "ackId", "type": "U001" } ] },
//!   { "class": 6, "id": 8, "name": "CFG-RATE", "mode": "poll", "fields": [] } ] }
//! ```
//! `mode` (`get`, `set` or `poll`, default `get`) tells apart messages that
//! share a `(class, id)` but differ by direction.
//! Fields take `type` plus optional `scale` (power-of-ten divisor) or `bits`
//! (`[{ "name", "offset", "width" }]`), or `repeat: { "count"?, "fields" }`
//! for groups. A group without `count` repeats to the end of the payload.

use std::collections::HashSet;

use serde::Deserialize;

pub mod attribute;
pub mod error;
pub mod mode;
pub mod registry;

pub use attribute::AttributeType;
pub use error::SchemaError;
pub use mode::{MessageMode, UnknownMode};
pub use registry::{SchemaProvider, SchemaRegistry};

/// Named sub-range of a bitfield: `width` bits starting at bit `offset`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BitRange {
    pub name: String,
    pub offset: u8,
    pub width: u8,
}

impl BitRange {
    pub fn new(name: impl Into<String>, offset: u8, width: u8) -> Self {
        Self {
            name: name.into(),
            offset,
            width,
        }
    }

    pub fn flag(name: impl Into<String>, offset: u8) -> Self {
        Self::new(name, offset, 1)
    }
}

/// Number of records in a repeat group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatCount {
    /// Value of an earlier integer field in the same record.
    Field(String),
    /// As many records as the remaining payload holds.
    Remaining,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar {
        attribute: AttributeType,
        scale: Option<u8>,
    },
    Bitfield {
        attribute: AttributeType,
        bits: Vec<BitRange>,
    },
    Group {
        count: RepeatCount,
        fields: Vec<FieldSchema>,
    },
}

/// One named field of a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "FieldDef")]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSchema {
    pub fn scalar(name: impl Into<String>, attribute: AttributeType) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar {
                attribute,
                scale: None,
            },
        }
    }

    /// Integer field holding `value * 10^exponent`.
    pub fn scaled(name: impl Into<String>, attribute: AttributeType, exponent: u8) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar {
                attribute,
                scale: Some(exponent),
            },
        }
    }

    pub fn bitfield(name: impl Into<String>, attribute: AttributeType, bits: Vec<BitRange>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Bitfield { attribute, bits },
        }
    }

    pub fn group(name: impl Into<String>, count_field: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Group {
                count: RepeatCount::Field(count_field.into()),
                fields,
            },
        }
    }

    pub fn group_to_end(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Group {
                count: RepeatCount::Remaining,
                fields,
            },
        }
    }

    /// Bytes occupied by this field, if independent of the payload.
    pub fn fixed_size(&self) -> Option<usize> {
        match &self.kind {
            FieldKind::Scalar { attribute, .. } | FieldKind::Bitfield { attribute, .. } => {
                Some(attribute.width())
            }
            FieldKind::Group { .. } => None,
        }
    }
}

/// Total size of a record made only of fixed-size fields.
pub fn fixed_record_size(fields: &[FieldSchema]) -> Option<usize> {
    fields.iter().map(FieldSchema::fixed_size).sum()
}

/// Validated field layout of one message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSchema {
    class: u8,
    id: u8,
    mode: MessageMode,
    name: String,
    fields: Vec<FieldSchema>,
}

impl MessageSchema {
    pub fn new(
        class: u8,
        id: u8,
        name: impl Into<String>,
        fields: Vec<FieldSchema>,
    ) -> Result<Self, SchemaError> {
        validate_fields(&fields, true)?;
        Ok(Self {
            class,
            id,
            mode: MessageMode::Get,
            name: name.into(),
            fields,
        })
    }

    pub fn class(&self) -> u8 {
        self.class
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn mode(&self) -> MessageMode {
        self.mode
    }

    pub fn with_mode(mut self, mode: MessageMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }
}

fn validate_fields(fields: &[FieldSchema], top_level: bool) -> Result<(), SchemaError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for (index, field) in fields.iter().enumerate() {
        if !seen.insert(&field.name) {
            return Err(SchemaError::DuplicateField {
                field: field.name.clone(),
            });
        }
        match &field.kind {
            FieldKind::Scalar { attribute, scale } => {
                if scale.is_some() && !attribute.is_scalable() {
                    return Err(SchemaError::InvalidScale {
                        field: field.name.clone(),
                        attribute: attribute.to_string(),
                    });
                }
            }
            FieldKind::Bitfield { attribute, bits } => validate_bits(&field.name, *attribute, bits)?,
            FieldKind::Group { count, fields: sub } => {
                if sub.is_empty() {
                    return Err(SchemaError::EmptyGroup {
                        group: field.name.clone(),
                    });
                }
                match count {
                    RepeatCount::Field(count) => validate_count(&field.name, count, &fields[..index])?,
                    RepeatCount::Remaining => {
                        if !top_level {
                            return Err(SchemaError::RemainingGroupNested {
                                group: field.name.clone(),
                            });
                        }
                        if index + 1 != fields.len() {
                            return Err(SchemaError::RemainingGroupNotLast {
                                group: field.name.clone(),
                            });
                        }
                        if fixed_record_size(sub).is_none() {
                            return Err(SchemaError::RemainingGroupNotFixed {
                                group: field.name.clone(),
                            });
                        }
                    }
                }
                validate_fields(sub, false)?;
            }
        }
    }
    Ok(())
}

fn validate_bits(field: &str, attribute: AttributeType, bits: &[BitRange]) -> Result<(), SchemaError> {
    if !matches!(attribute, AttributeType::Bitfield(_)) {
        return Err(SchemaError::BitsOnNonBitfield {
            field: field.to_string(),
            attribute: attribute.to_string(),
        });
    }
    let available = attribute.width() * 8;
    let mut seen: HashSet<&str> = HashSet::new();
    for range in bits {
        if !seen.insert(&range.name) {
            return Err(SchemaError::DuplicateField {
                field: format!("{field}.{}", range.name),
            });
        }
        let end = range.offset as usize + range.width as usize;
        if range.width == 0 || range.width > 64 || end > available {
            return Err(SchemaError::InvalidBitRange {
                field: field.to_string(),
                bits: range.name.clone(),
                available,
            });
        }
    }
    Ok(())
}

fn validate_count(group: &str, count: &str, earlier: &[FieldSchema]) -> Result<(), SchemaError> {
    let target = earlier
        .iter()
        .find(|field| field.name == count)
        .ok_or_else(|| SchemaError::UnresolvedCount {
            group: group.to_string(),
            count: count.to_string(),
        })?;
    match target.kind {
        FieldKind::Scalar {
            attribute,
            scale: None,
        } if attribute.is_integer() => Ok(()),
        _ => Err(SchemaError::InvalidCountField {
            group: group.to_string(),
            count: count.to_string(),
        }),
    }
}

/// Catalog representation of a field, converted into `FieldSchema`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDef {
    name: String,
    #[serde(rename = "type")]
    attribute: Option<AttributeType>,
    scale: Option<u8>,
    #[serde(default)]
    bits: Option<Vec<BitRange>>,
    repeat: Option<RepeatDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RepeatDef {
    count: Option<String>,
    fields: Vec<FieldSchema>,
}

impl TryFrom<FieldDef> for FieldSchema {
    type Error = SchemaError;

    fn try_from(def: FieldDef) -> Result<Self, Self::Error> {
        let kind = match (def.attribute, def.repeat) {
            (Some(_), Some(_)) => return Err(SchemaError::AmbiguousKind { field: def.name }),
            (None, None) => return Err(SchemaError::MissingKind { field: def.name }),
            (None, Some(repeat)) => FieldKind::Group {
                count: repeat.count.map_or(RepeatCount::Remaining, RepeatCount::Field),
                fields: repeat.fields,
            },
            (Some(attribute), None) => match def.bits {
                Some(bits) => FieldKind::Bitfield { attribute, bits },
                None => FieldKind::Scalar {
                    attribute,
                    scale: def.scale,
                },
            },
        };
        Ok(FieldSchema {
            name: def.name,
            kind,
        })
    }
}
