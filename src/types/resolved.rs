//! Resolved output types.
//!
//! A [`ResolvedNode`] is the fully materialized tree for one record at one
//! locale. Completed nodes are shared by `Arc`, so a record referenced by
//! two parents resolves to the identical node within one resolution run.
//! A reference back to an ancestor that is still being resolved (a cycle)
//! materializes as [`ResolvedValue::Circular`], a back-reference by id.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use super::record::RecordId;

/// Fully materialized, locale-tagged output tree for one record.
///
/// Field order is the insertion order of the source record's field keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNode {
    /// Provenance marker: the locale this node was resolved for.
    #[serde(rename = "locale$$")]
    pub locale: String,

    /// Field key -> resolved value.
    #[serde(flatten)]
    pub fields: IndexMap<String, ResolvedValue>,
}

impl ResolvedNode {
    /// Create an empty node tagged with a locale.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            fields: IndexMap::new(),
        }
    }

    /// Look up a resolved field by key.
    pub fn get(&self, key: &str) -> Option<&ResolvedValue> {
        self.fields.get(key)
    }
}

/// A resolved field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    /// Absent optional translation, or a value flattened away by the
    /// default pass's depth bound.
    Null,

    /// Terminal JSON scalar, passed through unchanged.
    Scalar(serde_json::Value),

    /// A resolved record. Shared between parents that reference the
    /// same record.
    Node(Arc<ResolvedNode>),

    /// An ordered sequence of resolved values.
    Many(Vec<ResolvedValue>),

    /// Back-reference to an ancestor node still being resolved when this
    /// value was produced (the record graph contains a cycle).
    Circular {
        #[serde(rename = "circular$$")]
        id: RecordId,
    },
}

impl ResolvedValue {
    /// The node, if this value is a resolved record.
    pub fn as_node(&self) -> Option<&Arc<ResolvedNode>> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The scalar, if this value is one.
    pub fn as_scalar(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The elements, if this value is an array.
    pub fn as_many(&self) -> Option<&[ResolvedValue]> {
        match self {
            Self::Many(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// The per-locale outcome of one top-level resolution.
///
/// The default locale always appears in `data` and never in `errors`;
/// every other locale appears in exactly one of the two.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedSet {
    /// Locale code -> resolved tree, for every locale that resolved cleanly.
    pub data: IndexMap<String, Arc<ResolvedNode>>,

    /// Locale code -> failure message, for every locale that did not.
    pub errors: IndexMap<String, String>,
}

impl ResolvedSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}
