use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::error::SchemaError;
use super::{FieldSchema, MessageMode, MessageSchema};
use crate::codec::{CodecError, CodecOptions, Record, encode_payload};
use crate::protocols::ubx;

/// Read-only source of message schemas.
///
/// `None` is the normal answer for a message nobody described: its payload
/// is then passed through opaque.
pub trait SchemaProvider {
    fn schema_for(&self, class: u8, id: u8, mode: MessageMode) -> Option<&MessageSchema>;
}

impl<P: SchemaProvider + ?Sized> SchemaProvider for &P {
    fn schema_for(&self, class: u8, id: u8, mode: MessageMode) -> Option<&MessageSchema> {
        (**self).schema_for(class, id, mode)
    }
}

impl<P: SchemaProvider + ?Sized> SchemaProvider for Arc<P> {
    fn schema_for(&self, class: u8, id: u8, mode: MessageMode) -> Option<&MessageSchema> {
        (**self).schema_for(class, id, mode)
    }
}

/// In-memory schema table keyed by `(class, id, mode)`.
///
/// Immutable once built; share it between readers by reference or `Arc`.
///
/// # Examples
/// ```
/// use ubxwire_core::{MessageMode, SchemaRegistry};
///
/// let registry = SchemaRegistry::from_json_str(
///     r#"{ "messages": [ { "class": 5, "id": 1, "name": "ACK-ACK", "fields": [
///         { "name": "ackClass", "type": "U001" }, { "name": "ackId", "type": "U001" } ] } ] }"#,
/// )?;
/// assert_eq!(registry.lookup(5, 1, MessageMode::Get).map(|s| s.name()), Some("ACK-ACK"));
/// assert!(registry.lookup(5, 1, MessageMode::Poll).is_none());
/// assert!(registry.lookup(5, 0, MessageMode::Get).is_none());
/// # Ok::<(), ubxwire_core::schema::SchemaError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<(u8, u8, MessageMode), MessageSchema>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDef {
    messages: Vec<MessageDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MessageDef {
    class: u8,
    id: u8,
    #[serde(default)]
    mode: MessageMode,
    name: String,
    fields: Vec<FieldSchema>,
}

impl SchemaRegistry {
    /// Empty registry: every payload decodes opaque.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_schemas(schemas: impl IntoIterator<Item = MessageSchema>) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for schema in schemas {
            let key = (schema.class(), schema.id(), schema.mode());
            if registry.schemas.contains_key(&key) {
                return Err(SchemaError::DuplicateMessage {
                    class: key.0,
                    id: key.1,
                    mode: key.2,
                });
            }
            registry.schemas.insert(key, schema);
        }
        Ok(registry)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let catalog: CatalogDef = serde_json::from_str(json)?;
        Self::from_catalog(catalog)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, SchemaError> {
        let catalog: CatalogDef = serde_json::from_reader(reader)?;
        Self::from_catalog(catalog)
    }

    /// Load a JSON catalog from disk.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    fn from_catalog(catalog: CatalogDef) -> Result<Self, SchemaError> {
        let schemas = catalog
            .messages
            .into_iter()
            .map(|def| {
                MessageSchema::new(def.class, def.id, def.name, def.fields)
                    .map(|schema| schema.with_mode(def.mode))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_schemas(schemas)
    }

    pub fn lookup(&self, class: u8, id: u8, mode: MessageMode) -> Option<&MessageSchema> {
        self.schemas.get(&(class, id, mode))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schemas sorted by `(class, id, mode)`.
    pub fn iter(&self) -> impl Iterator<Item = &MessageSchema> {
        let mut schemas: Vec<&MessageSchema> = self.schemas.values().collect();
        schemas.sort_by_key(|schema| (schema.class(), schema.id(), schema.mode()));
        schemas.into_iter()
    }

    /// Encode `record` with the schema registered for `mode` and wrap it in
    /// a frame.
    pub fn encode_message(
        &self,
        class: u8,
        id: u8,
        mode: MessageMode,
        record: &Record,
        options: CodecOptions,
    ) -> Result<Vec<u8>, CodecError> {
        let schema = self
            .lookup(class, id, mode)
            .ok_or(CodecError::UnknownSchema { class, id, mode })?;
        let payload = encode_payload(schema, record, options)?;
        Ok(ubx::encode_frame(class, id, &payload)?)
    }
}

impl SchemaProvider for SchemaRegistry {
    fn schema_for(&self, class: u8, id: u8, mode: MessageMode) -> Option<&MessageSchema> {
        self.lookup(class, id, mode)
    }
}
