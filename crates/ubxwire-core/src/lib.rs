//! ubxwire core library: u-blox UBX stream codec.
//!
//! A receiver stream may interleave binary UBX frames, NMEA sentences and
//! RTCM3 corrections. This crate separates them, verifies UBX checksums and
//! decodes UBX payloads into named, typed and scaled fields using schemas
//! supplied as data.
//!
//! Pipeline: `source` (blocking byte stream with lookahead) ->
//! `protocols::detect` (discrimination and resync) -> protocol readers
//! (layout/reader/parser) -> `codec` (schema-driven payload walk) ->
//! [`StreamReader`] (filtering and error policy).
//!
//! Invariants:
//! - A UBX frame's declared length always equals its payload length.
//! - A decoded payload is consumed exactly by its schema.
//! - Stream failures propagate regardless of the error policy.
//!
//! # Examples
//! ```
//! use std::io::Cursor;
//!
//! use ubxwire_core::codec::Value;
//! use ubxwire_core::{ErrorPolicy, ReaderConfig, SchemaRegistry, StreamReader};
//!
//! let schemas = SchemaRegistry::from_json_str(
//!     r#"{ "messages": [{
//!         "class": 5, "id": 1, "name": "ACK-ACK",
//!         "fields": [
//!             { "name": "ackClass", "type": "U001" },
//!             { "name": "ackId", "type": "U001" }
//!         ]
//!     }] }"#,
//! )?;
//! let bytes = [0xb5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x01, 0x0f, 0x38];
//! let config = ReaderConfig::default().with_policy(ErrorPolicy::Raise);
//! let mut reader = StreamReader::from_reader(Cursor::new(bytes), schemas, config);
//!
//! let message = reader.next_message()?.expect("one frame");
//! let ack = message.as_ubx().expect("binary frame");
//! assert_eq!(ack.identity(), "ACK-ACK");
//! assert_eq!(ack.fields().unwrap()["ackClass"], Value::Unsigned(6));
//! assert!(reader.next_message()?.is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
mod message;
pub mod protocols;
pub mod schema;
mod source;
mod stream;

pub use codec::{CodecError, CodecOptions, Record, Value};
pub use message::{DecodedMessage, Message, OpaqueFrame};
pub use protocols::Protocol;
pub use protocols::ubx::{ChecksumPair, UbxFrame, encode_frame, parse_frame};
pub use schema::{MessageMode, MessageSchema, SchemaError, SchemaProvider, SchemaRegistry};
pub use source::{ByteStream, IoStream, MAX_LOOKAHEAD, SourceError};
pub use stream::{
    DEFAULT_RESYNC_WINDOW, ErrorPolicy, ReadError, ReaderConfig, StreamReader, UnknownPolicy,
};
