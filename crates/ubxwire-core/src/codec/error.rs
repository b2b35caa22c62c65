use thiserror::Error;

use super::value::Value;
use crate::protocols::ubx::error::UbxError;
use crate::schema::{AttributeType, MessageMode};

/// Errors returned by the attribute and payload codecs.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported attribute type {attribute}")]
    UnsupportedAttributeType { attribute: AttributeType },
    #[error("schema/length mismatch: schema consumes {consumed} bytes, payload has {declared}")]
    SchemaLengthMismatch { declared: usize, consumed: usize },
    #[error("value for field '{field}' does not fit {attribute}")]
    EncodingOverflow { field: String, attribute: AttributeType },
    #[error("field '{field}' expects {expected}")]
    TypeMismatch { field: String, expected: String },
    #[error("{attribute} needs {expected} bytes, got {actual}")]
    InvalidLength {
        attribute: AttributeType,
        expected: usize,
        actual: usize,
    },
    #[error("missing value for field '{field}'")]
    MissingField { field: String },
    #[error("group '{group}': count field '{count}' holds no usable count")]
    InvalidRepeatCount { group: String, count: String },
    #[error("count field '{count}' is {given} but group '{group}' has {actual} records")]
    CountMismatch {
        count: String,
        group: String,
        given: Value,
        actual: usize,
    },
    #[error("no {mode} schema for class 0x{class:02x} id 0x{id:02x}")]
    UnknownSchema { class: u8, id: u8, mode: MessageMode },
    #[error(transparent)]
    Frame(#[from] UbxError),
}
