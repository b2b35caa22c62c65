use serde::Serialize;

use crate::codec::Record;
use crate::protocols::Protocol;
use crate::protocols::common::serde_hex::serialize_hex;
use crate::protocols::ubx::classes::message_identity;

/// One frame returned by the stream reader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum Message {
    Ubx(DecodedMessage),
    Nmea(OpaqueFrame),
    Rtcm3(OpaqueFrame),
}

impl Message {
    pub fn protocol(&self) -> Protocol {
        match self {
            Message::Ubx(_) => Protocol::Ubx,
            Message::Nmea(_) => Protocol::Nmea,
            Message::Rtcm3(_) => Protocol::Rtcm3,
        }
    }

    pub fn as_ubx(&self) -> Option<&DecodedMessage> {
        match self {
            Message::Ubx(message) => Some(message),
            _ => None,
        }
    }

    /// Label of the frame: message name, sentence address or RTCM type.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Message::Ubx(message) => Some(message.identity()),
            Message::Nmea(frame) | Message::Rtcm3(frame) => frame.identity(),
        }
    }
}

/// Binary message with its payload and, when a schema is known, its fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedMessage {
    class: u8,
    id: u8,
    identity: String,
    #[serde(serialize_with = "serialize_hex")]
    payload: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Record>,
}

impl DecodedMessage {
    /// `schema_name` is `None` for opaque payloads.
    pub fn new(class: u8, id: u8, payload: Vec<u8>, schema_name: Option<&str>, fields: Option<Record>) -> Self {
        Self {
            class,
            id,
            identity: message_identity(class, id, schema_name),
            payload,
            fields,
        }
    }

    pub fn class(&self) -> u8 {
        self.class
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decoded fields; `None` when no schema is registered.
    pub fn fields(&self) -> Option<&Record> {
        self.fields.as_ref()
    }

    pub fn is_opaque(&self) -> bool {
        self.fields.is_none()
    }
}

/// Undecoded NMEA sentence or RTCM3 frame, bytes as read from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaqueFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<String>,
    #[serde(serialize_with = "serialize_hex")]
    raw: Vec<u8>,
}

impl OpaqueFrame {
    pub fn new(identity: Option<String>, raw: Vec<u8>) -> Self {
        Self { identity, raw }
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}
