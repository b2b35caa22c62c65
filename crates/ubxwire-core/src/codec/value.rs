use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::protocols::common::serde_hex::serialize_hex;

/// Decoded fields in wire order.
pub type Record = IndexMap<String, Value>;

/// One decoded attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    /// Floats and scaled integers.
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
    /// Expanded bitfield: sub-range name to flag or integer.
    Bitfield(Record),
    /// Repeat group: one record per repetition.
    Group(Vec<Record>),
}

impl Value {
    /// Non-negative integer view; booleans count as 0/1.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Unsigned(value) => Some(value),
            Value::Signed(value) => u64::try_from(value).ok(),
            Value::Bool(value) => Some(value as u64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Unsigned(value) => i64::try_from(value).ok(),
            Value::Signed(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Unsigned(value) => Some(value as f64),
            Value::Signed(value) => Some(value as f64),
            Value::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bitfield(&self) -> Option<&Record> {
        match self {
            Value::Bitfield(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&[Record]> {
        match self {
            Value::Group(records) => Some(records),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unsigned(value) => write!(f, "{value}"),
            Value::Signed(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value:?}"),
            Value::Bytes(bytes) => f.write_str(&hex::encode(bytes)),
            Value::Bitfield(_) | Value::Group(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

macro_rules! impl_from {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(impl From<$source> for Value {
            fn from(value: $source) -> Self {
                Value::$variant(value as $target)
            }
        })+
    };
}

impl_from!(Unsigned, u64, u8, u16, u32, u64);
impl_from!(Signed, i64, i8, i16, i32, i64);
impl_from!(Float, f64, f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<Record>> for Value {
    fn from(records: Vec<Record>) -> Self {
        Value::Group(records)
    }
}
