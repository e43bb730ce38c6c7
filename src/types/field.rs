//! Field metadata looked up by content type.

use serde::{Deserialize, Serialize};

/// Metadata for one field of a content type.
///
/// The field set for a content type is immutable for the resolution
/// session and safe to cache by content-type id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field key.
    pub id: String,

    /// Declared type (e.g. "Symbol", "Link", "Array").
    #[serde(rename = "type")]
    pub field_type: String,

    /// Whether the field carries one value per locale.
    #[serde(default)]
    pub localized: bool,

    /// Whether a localized value must be present for every locale.
    #[serde(default)]
    pub required: bool,
}

impl Field {
    /// Create a non-localized, optional field.
    pub fn new(id: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: field_type.into(),
            localized: false,
            required: false,
        }
    }

    /// Mark the field as localized.
    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A content type: an id plus the fields records of that type carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub id: String,
    pub fields: Vec<Field>,
}

impl ContentType {
    /// Create a content type with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: vec![],
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_deserializes_wire_shape() {
        let field: Field = serde_json::from_str(
            r#"{"id": "title", "type": "Symbol", "localized": true, "required": true}"#,
        )
        .unwrap();
        assert_eq!(field, Field::new("title", "Symbol").localized().required());
    }

    #[test]
    fn test_field_flags_default_to_false() {
        let field: Field = serde_json::from_str(r#"{"id": "slug", "type": "Symbol"}"#).unwrap();
        assert!(!field.localized);
        assert!(!field.required);
    }
}
