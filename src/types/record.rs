//! Record types - the localized content graph.
//!
//! A [`Record`] carries, per field, a value keyed by locale code. Reference
//! values name other records by [`RecordId`], so a [`RecordSet`] can express
//! cyclic graphs (a record may transitively reference itself) without any
//! interior mutability.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stable identity of a record, used for cycle detection and memoization.
pub type RecordId = String;

/// Mapping from locale code to a field's raw value for that locale.
pub type LocaleValueMap = IndexMap<String, Value>;

/// A raw field value for one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// Terminal JSON scalar (string, number, bool, plain object).
    Scalar(serde_json::Value),

    /// Reference to another record in the set, by id.
    Link(RecordId),

    /// Ordered sequence of references or scalars under one field.
    Array(Vec<Value>),
}

impl Value {
    /// Create a scalar value from anything JSON-convertible.
    pub fn scalar(value: impl Into<serde_json::Value>) -> Self {
        Self::Scalar(value.into())
    }

    /// Create a reference to another record.
    pub fn link(id: impl Into<RecordId>) -> Self {
        Self::Link(id.into())
    }

    /// Create an array value.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Whether this value is a reference.
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link(_))
    }
}

/// The kind of a record, driving how it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecordKind {
    /// Schema-backed node; field metadata is looked up by content type.
    Entry { content_type_id: String },

    /// Flat node with one-level localized values and no schema.
    Asset,
}

/// A content node with a stable identity and per-field, per-locale values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identity, unique within a [`RecordSet`].
    pub id: RecordId,

    /// Entry (schema-backed) or Asset (flat).
    pub kind: RecordKind,

    /// Field key -> locale code -> raw value. Field order is preserved.
    #[serde(default)]
    pub fields: IndexMap<String, LocaleValueMap>,
}

impl Record {
    /// Create an entry record for the given content type.
    pub fn entry(id: impl Into<RecordId>, content_type_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RecordKind::Entry {
                content_type_id: content_type_id.into(),
            },
            fields: IndexMap::new(),
        }
    }

    /// Create an asset record.
    pub fn asset(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            kind: RecordKind::Asset,
            fields: IndexMap::new(),
        }
    }

    /// Add a field with its per-locale values.
    pub fn with_field<K, L, I>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        L: Into<String>,
        I: IntoIterator<Item = (L, Value)>,
    {
        self.fields.insert(
            key.into(),
            values
                .into_iter()
                .map(|(locale, value)| (locale.into(), value))
                .collect(),
        );
        self
    }

    /// The content type id, for entries.
    pub fn content_type_id(&self) -> Option<&str> {
        match &self.kind {
            RecordKind::Entry { content_type_id } => Some(content_type_id),
            RecordKind::Asset => None,
        }
    }
}

/// The record graph: every record reachable from the root, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    records: IndexMap<RecordId, Record>,
}

impl RecordSet {
    /// Create an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, keyed by its id. Replaces any previous record
    /// with the same id.
    pub fn insert(&mut self, record: Record) {
        self.records.insert(record.id.clone(), record);
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    /// Number of records in the set.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_field_order() {
        let record = Record::entry("rec-1", "page")
            .with_field("title", [("en", Value::scalar("Home"))])
            .with_field("body", [("en", Value::scalar("..."))])
            .with_field("author", [("en", Value::link("rec-2"))]);

        let keys: Vec<_> = record.fields.keys().cloned().collect();
        assert_eq!(keys, vec!["title", "body", "author"]);
    }

    #[test]
    fn test_record_set_lookup() {
        let set: RecordSet = [Record::entry("a", "page"), Record::asset("b")]
            .into_iter()
            .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a").unwrap().content_type_id(), Some("page"));
        assert!(set.get("b").unwrap().content_type_id().is_none());
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn test_value_round_trips_through_json() {
        let value = Value::array([
            Value::link("rec-2"),
            Value::scalar(json!({"nested": true})),
        ]);
        let encoded = serde_json::to_string(&value).unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, value);
    }
}
