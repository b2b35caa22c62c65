use thiserror::Error;

use super::mode::MessageMode;

/// Errors raised while building or loading message schemas.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid attribute tag '{tag}'")]
    InvalidAttributeTag { tag: String },
    #[error("field '{field}' must declare either a type or a repeat group")]
    MissingKind { field: String },
    #[error("field '{field}' declares both a type and a repeat group")]
    AmbiguousKind { field: String },
    #[error("duplicate field '{field}'")]
    DuplicateField { field: String },
    #[error("field '{field}': scale applies to integer attributes of at most 6 bytes, not {attribute}")]
    InvalidScale { field: String, attribute: String },
    #[error("field '{field}': bit range '{bits}' is empty or exceeds {available} bits")]
    InvalidBitRange {
        field: String,
        bits: String,
        available: usize,
    },
    #[error("field '{field}': bit ranges require a bitfield attribute, not {attribute}")]
    BitsOnNonBitfield { field: String, attribute: String },
    #[error("group '{group}' refers to count field '{count}' which is not declared before it")]
    UnresolvedCount { group: String, count: String },
    #[error("group '{group}': count field '{count}' must be an unscaled integer")]
    InvalidCountField { group: String, count: String },
    #[error("group '{group}' has no fields")]
    EmptyGroup { group: String },
    #[error("group '{group}' repeats to the end of the payload and must be the last field")]
    RemainingGroupNotLast { group: String },
    #[error("group '{group}' repeats to the end of the payload and needs fixed-size records")]
    RemainingGroupNotFixed { group: String },
    #[error("group '{group}' repeats to the end of the payload and must be at the top level")]
    RemainingGroupNested { group: String },
    #[error("duplicate {mode} schema for class 0x{class:02x} id 0x{id:02x}")]
    DuplicateMessage { class: u8, id: u8, mode: MessageMode },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("schema catalog error: {0}")]
    Json(#[from] serde_json::Error),
}
