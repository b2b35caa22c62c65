use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::CodecOptions;
use crate::protocols::ubx::layout::MAX_FRAME_LEN;
use crate::schema::MessageMode;

/// Garbage bytes tolerated before a framing error: one maximum binary frame.
pub const DEFAULT_RESYNC_WINDOW: usize = MAX_FRAME_LEN;

/// What the stream reader does with a frame it cannot deliver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Return the error to the caller.
    Raise,
    /// Drop the frame, emit a warning event and keep reading.
    #[default]
    Log,
    /// Drop the frame silently and keep reading.
    Ignore,
}

impl ErrorPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorPolicy::Raise => "raise",
            ErrorPolicy::Log => "log",
            ErrorPolicy::Ignore => "ignore",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown error policy '{0}' (expected raise, log or ignore)")]
pub struct UnknownPolicy(pub String);

impl FromStr for ErrorPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raise" => Ok(ErrorPolicy::Raise),
            "log" => Ok(ErrorPolicy::Log),
            "ignore" => Ok(ErrorPolicy::Ignore),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

/// Stream reader options. Missing keys take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Deliver only binary messages of this class.
    pub filter_class: Option<u8>,
    /// Deliver only binary messages with this id.
    pub filter_id: Option<u8>,
    pub error_policy: ErrorPolicy,
    /// Which schema direction binary payloads are decoded with.
    pub message_mode: MessageMode,
    pub decode_bitfields: bool,
    pub apply_scaling: bool,
    /// Skip NMEA and RTCM3 frames instead of returning them opaque.
    pub recognized_protocols_only: bool,
    pub validate_checksum: bool,
    pub resync_window: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            filter_class: None,
            filter_id: None,
            error_policy: ErrorPolicy::default(),
            message_mode: MessageMode::default(),
            decode_bitfields: true,
            apply_scaling: true,
            recognized_protocols_only: false,
            validate_checksum: true,
            resync_window: DEFAULT_RESYNC_WINDOW,
        }
    }
}

impl ReaderConfig {
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_mode(mut self, mode: MessageMode) -> Self {
        self.message_mode = mode;
        self
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            decode_bitfields: self.decode_bitfields,
            apply_scaling: self.apply_scaling,
        }
    }

    /// Whether a binary message passes the class/id filter.
    pub fn accepts(&self, class: u8, id: u8) -> bool {
        self.filter_class.is_none_or(|wanted| wanted == class)
            && self.filter_id.is_none_or(|wanted| wanted == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_RESYNC_WINDOW, ErrorPolicy, ReaderConfig};
    use crate::schema::MessageMode;

    #[test]
    fn defaults_fill_missing_keys() {
        let config: ReaderConfig =
            serde_json::from_str(r#"{ "error_policy": "ignore", "filter_class": 5 }"#).unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::Ignore);
        assert_eq!(config.filter_class, Some(5));
        assert!(config.validate_checksum);
        assert!(config.apply_scaling);
        assert_eq!(config.resync_window, DEFAULT_RESYNC_WINDOW);
        assert_eq!(DEFAULT_RESYNC_WINDOW, 65_543);
        assert_eq!(config.message_mode, MessageMode::Get);
    }

    #[test]
    fn message_mode_is_configurable() {
        let config: ReaderConfig = serde_json::from_str(r#"{ "message_mode": "poll" }"#).unwrap();
        assert_eq!(config.message_mode, MessageMode::Poll);
        assert_eq!(ReaderConfig::default().with_mode(MessageMode::Set).message_mode, MessageMode::Set);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("RAISE".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Raise);
        assert_eq!("log".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Log);
        assert!("quit".parse::<ErrorPolicy>().is_err());
    }

    #[test]
    fn filter_matches_class_and_id() {
        let config = ReaderConfig {
            filter_class: Some(0x05),
            ..ReaderConfig::default()
        };
        assert!(config.accepts(0x05, 0x00));
        assert!(!config.accepts(0x01, 0x00));

        let config = ReaderConfig {
            filter_id: Some(0x01),
            ..config
        };
        assert!(config.accepts(0x05, 0x01));
        assert!(!config.accepts(0x05, 0x00));
    }
}
