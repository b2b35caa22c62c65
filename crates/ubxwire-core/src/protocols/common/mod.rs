pub(crate) mod reader;
pub(crate) mod serde_hex;
