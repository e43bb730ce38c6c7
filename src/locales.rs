//! Locale directory - the validated locale set of a space.

use crate::error::ConfigError;
use crate::types::{Locale, Space};

/// The locale set and its designated default, resolved once at setup.
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct LocaleDirectory {
    locales: Vec<Locale>,
    default_index: usize,
}

impl LocaleDirectory {
    /// Validate a space's locale set.
    ///
    /// Fails unless exactly one locale is marked as default.
    pub fn from_space(space: Space) -> Result<Self, ConfigError> {
        let defaults: Vec<usize> = space
            .locales
            .iter()
            .enumerate()
            .filter(|(_, locale)| locale.default)
            .map(|(index, _)| index)
            .collect();

        match defaults.as_slice() {
            [] => Err(ConfigError::NoDefaultLocale),
            [index] => Ok(Self {
                locales: space.locales,
                default_index: *index,
            }),
            many => Err(ConfigError::MultipleDefaultLocales { count: many.len() }),
        }
    }

    /// The fallback source for missing translations.
    pub fn default_locale(&self) -> &Locale {
        &self.locales[self.default_index]
    }

    /// Every locale except the default.
    pub fn alternatives(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter().filter(|locale| !locale.default)
    }

    /// All locales, in space order.
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }
}
