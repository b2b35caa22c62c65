//! Pull-based reader over a mixed-protocol receiver stream.
//!
//! Each `next_message` call resynchronizes on the next frame start, extracts
//! one frame and turns it into a [`Message`]. Failures that only affect the
//! current frame go through the configured [`ErrorPolicy`]; stream failures
//! always propagate.

mod config;
mod error;

pub use config::{DEFAULT_RESYNC_WINDOW, ErrorPolicy, ReaderConfig, UnknownPolicy};
pub use error::ReadError;

use std::io::Read;

use tracing::{debug, warn};

use crate::codec::decode_payload;
use crate::message::{DecodedMessage, Message, OpaqueFrame};
use crate::protocols::{Protocol, ProtocolDetector, nmea, rtcm, ubx};
use crate::schema::{SchemaProvider, SchemaRegistry};
use crate::source::{ByteStream, IoStream};

enum Step {
    Message(Message),
    Skipped,
    EndOfStream,
}

/// Decodes messages from a [`ByteStream`] using schemas from `P`.
///
/// Not meant for concurrent use; run one reader per stream. The schema
/// provider may be shared, e.g. behind an `Arc` or a reference.
pub struct StreamReader<S, P = SchemaRegistry> {
    stream: S,
    schemas: P,
    config: ReaderConfig,
    detector: ProtocolDetector,
    finished: bool,
}

impl<R: Read, P: SchemaProvider> StreamReader<IoStream<R>, P> {
    /// Reader over any `std::io::Read`.
    pub fn from_reader(reader: R, schemas: P, config: ReaderConfig) -> Self {
        Self::new(IoStream::new(reader), schemas, config)
    }
}

impl<S: ByteStream, P: SchemaProvider> StreamReader<S, P> {
    pub fn new(stream: S, schemas: P, config: ReaderConfig) -> Self {
        Self {
            detector: ProtocolDetector::new(config.resync_window),
            stream,
            schemas,
            config,
            finished: false,
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Next delivered message, or `Ok(None)` at end of stream.
    pub fn next_message(&mut self) -> Result<Option<Message>, ReadError> {
        loop {
            match self.read_step() {
                Ok(Step::Message(message)) => return Ok(Some(message)),
                Ok(Step::Skipped) => {}
                Ok(Step::EndOfStream) => return Ok(None),
                Err(err) => self.handle(err)?,
            }
        }
    }

    /// Single point where the error policy is applied.
    fn handle(&self, err: ReadError) -> Result<(), ReadError> {
        if !err.is_recoverable() {
            return Err(err);
        }
        match self.config.error_policy {
            ErrorPolicy::Raise => Err(err),
            ErrorPolicy::Log => {
                warn!(error = %err, "dropping frame");
                Ok(())
            }
            ErrorPolicy::Ignore => Ok(()),
        }
    }

    fn read_step(&mut self) -> Result<Step, ReadError> {
        let Some(protocol) = self.detector.seek(&mut self.stream)? else {
            return Ok(Step::EndOfStream);
        };
        match protocol {
            Protocol::Ubx => self.read_ubx(),
            Protocol::Nmea => {
                let raw = nmea::read_sentence(&mut self.stream)?;
                Ok(self.opaque(protocol, nmea::sentence_address(&raw), raw))
            }
            Protocol::Rtcm3 => {
                let raw = rtcm::read_frame(&mut self.stream)?;
                let identity = rtcm::message_type(&raw).map(|kind| format!("RTCM-{kind}"));
                Ok(self.opaque(protocol, identity, raw))
            }
        }
    }

    fn read_ubx(&mut self) -> Result<Step, ReadError> {
        let frame = ubx::read_frame(&mut self.stream)?;
        let (class, id) = (frame.class(), frame.id());
        if self.config.validate_checksum && !frame.is_valid() {
            return Err(ReadError::Checksum {
                class,
                id,
                expected: frame.computed_checksum(),
                actual: frame.checksum(),
            });
        }
        if !self.config.accepts(class, id) {
            debug!(class, id, "message filtered out");
            return Ok(Step::Skipped);
        }

        let message = match self.schemas.schema_for(class, id, self.config.message_mode) {
            Some(schema) => {
                let fields = decode_payload(schema, frame.payload(), self.config.codec_options())
                    .map_err(|source| ReadError::Decode { class, id, source })?;
                DecodedMessage::new(class, id, frame.into_payload(), Some(schema.name()), Some(fields))
            }
            None => {
                debug!(
                    class,
                    id,
                    mode = %self.config.message_mode,
                    length = frame.length(),
                    "no schema, returning opaque payload"
                );
                DecodedMessage::new(class, id, frame.into_payload(), None, None)
            }
        };
        Ok(Step::Message(Message::Ubx(message)))
    }

    fn opaque(&self, protocol: Protocol, identity: Option<String>, raw: Vec<u8>) -> Step {
        if self.config.recognized_protocols_only {
            debug!(%protocol, length = raw.len(), "skipping non-binary frame");
            return Step::Skipped;
        }
        let frame = OpaqueFrame::new(identity, raw);
        match protocol {
            Protocol::Rtcm3 => Step::Message(Message::Rtcm3(frame)),
            _ => Step::Message(Message::Nmea(frame)),
        }
    }
}

/// Yields messages until end of stream or the first propagated error.
impl<S: ByteStream, P: SchemaProvider> Iterator for StreamReader<S, P> {
    type Item = Result<Message, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_message() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
