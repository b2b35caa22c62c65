use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a binary message.
///
/// Configuration and command messages reuse one `(class, id)` for the
/// receiver's output (`get`), a host command (`set`) and a host request
/// (`poll`), each with its own payload layout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MessageMode {
    /// Output from the receiver.
    #[default]
    Get,
    /// Command to the receiver.
    Set,
    /// Request for a `get` message.
    Poll,
}

impl MessageMode {
    pub fn name(&self) -> &'static str {
        match self {
            MessageMode::Get => "get",
            MessageMode::Set => "set",
            MessageMode::Poll => "poll",
        }
    }
}

impl fmt::Display for MessageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown message mode '{0}' (expected get, set or poll)")]
pub struct UnknownMode(pub String);

impl FromStr for MessageMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(MessageMode::Get),
            "set" => Ok(MessageMode::Set),
            "poll" => Ok(MessageMode::Poll),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}
