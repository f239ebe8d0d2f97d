//! Fixture document: a structured export of data-store records.
//!
//! A fixture is an ordered sequence of records, each tagged with the model it
//! came from and a field-name → value mapping. The wire form is a UTF-8 JSON
//! array of `{"model": "<app.model>", "fields": {...}}` objects; this is part
//! of the stable archive contract consumed by the restore process.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{Read, Write};

/// Model identifier in `app.model` form, e.g. `crm.contact`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        ModelId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ModelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        ModelId(s.to_string())
    }
}

/// One serialized record: its model identifier plus a field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub model: ModelId,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// An ordered export of records, grouped as produced by the serializer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureDocument {
    pub records: Vec<FixtureRecord>,
}

impl FixtureDocument {
    pub fn new(records: Vec<FixtureRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FixtureRecord> {
        self.records.iter()
    }

    /// Write the document as indented JSON.
    pub fn write_to(&self, writer: impl Write) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(writer, self)
    }

    pub fn read_from(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(model: &str, fields: serde_json::Value) -> FixtureRecord {
        FixtureRecord {
            model: ModelId::from(model),
            fields: fields.as_object().unwrap().clone(),
        }
    }

    #[test]
    fn test_wire_format() {
        let doc = FixtureDocument::new(vec![record(
            "crm.contact",
            json!({"name": "Ada", "avatar": "avatars/ada.png"}),
        )]);

        let encoded = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            encoded,
            json!([{"model": "crm.contact", "fields": {"name": "Ada", "avatar": "avatars/ada.png"}}])
        );
    }

    #[test]
    fn test_round_trip_through_writer() {
        let doc = FixtureDocument::new(vec![
            record("crm.contact", json!({"name": "Ada"})),
            record("crm.company", json!({"name": "Analytical Engines Ltd"})),
        ]);

        let mut buf = Vec::new();
        doc.write_to(&mut buf).unwrap();
        let decoded = FixtureDocument::read_from(buf.as_slice()).unwrap();
        assert_eq!(doc, decoded);
    }
}
