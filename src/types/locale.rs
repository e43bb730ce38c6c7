//! Locale and space types from the external space lookup.

use serde::{Deserialize, Serialize};

/// A locale in the space's locale set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Locale code, e.g. "en-US" or "de".
    pub code: String,

    /// Whether this locale is the fallback source for missing translations.
    /// Exactly one locale in a space must be default.
    #[serde(default)]
    pub default: bool,
}

impl Locale {
    /// Create a locale.
    pub fn new(code: impl Into<String>, default: bool) -> Self {
        Self {
            code: code.into(),
            default,
        }
    }
}

/// Space configuration: the locale set content is resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub locales: Vec<Locale>,
}

impl Space {
    /// Create a space from its locales.
    pub fn new(locales: impl IntoIterator<Item = Locale>) -> Self {
        Self {
            locales: locales.into_iter().collect(),
        }
    }
}
