//! Typed errors for locale resolution.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Failures inside a record
//! tree accumulate a breadcrumb of enclosing field segments as they
//! bubble, so a leaf failure is attributable to the exact nested field.

use thiserror::Error;

use crate::types::Field;

/// Errors that can occur while resolving a record tree for one locale.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A required, localized field has no value for the target locale.
    #[error("required, localized field \"{field_id}\" of type \"{field_type}\" is missing value for key \"{key}\" for locale \"{locale}\"")]
    MissingRequiredLocalization {
        field_id: String,
        field_type: String,
        key: String,
        locale: String,
    },

    /// Breadcrumb wrapper: the failure happened somewhere below a
    /// localized field of an enclosing entry.
    #[error("{source}\n\tin localized field \"{field_id}\" of type \"{field_type}\" for key \"{key}\"")]
    InLocalizedField {
        field_id: String,
        field_type: String,
        key: String,
        #[source]
        source: Box<ResolveError>,
    },

    /// Breadcrumb wrapper for the non-localized counterpart.
    #[error("{source}\n\tin non-localized field \"{field_id}\" of type \"{field_type}\" for key \"{key}\"")]
    InNonLocalizedField {
        field_id: String,
        field_type: String,
        key: String,
        #[source]
        source: Box<ResolveError>,
    },

    /// An entry carries a field key its content type knows nothing about.
    #[error("no field \"{key}\" on content type \"{content_type}\"")]
    UnknownField { key: String, content_type: String },

    /// A reference names a record id absent from the record set.
    #[error("no record with id \"{id}\" in the record set")]
    UnknownRecord { id: String },

    /// Schema or space lookup failed.
    #[error("provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The space's locale set is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ResolveError {
    /// Wrap with the enclosing localized field's identity.
    pub(crate) fn in_localized_field(self, field: &Field, key: &str) -> Self {
        Self::InLocalizedField {
            field_id: field.id.clone(),
            field_type: field.field_type.clone(),
            key: key.to_string(),
            source: Box::new(self),
        }
    }

    /// Wrap with the enclosing non-localized field's identity.
    pub(crate) fn in_non_localized_field(self, field: &Field, key: &str) -> Self {
        Self::InNonLocalizedField {
            field_id: field.id.clone(),
            field_type: field.field_type.clone(),
            key: key.to_string(),
            source: Box::new(self),
        }
    }
}

/// Locale-set configuration errors, fatal to the whole session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No locale in the space is marked as default.
    #[error("no locale in the space is marked as default")]
    NoDefaultLocale,

    /// More than one locale is marked as default.
    #[error("{count} locales are marked as default, expected exactly one")]
    MultipleDefaultLocales { count: usize },
}

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
