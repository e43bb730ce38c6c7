//! The resolver - main entry point of the library.
//!
//! Composes the three components top-down: the locale directory resolves
//! the locale set once at setup, the default pass builds one
//! default-locale tree, and one locale run per non-default locale
//! resolves against that tree. The runs share the memoized schema cache
//! and proceed fully concurrently; one locale's failure is recorded under
//! that locale's key and never aborts its siblings.

pub(crate) mod locale;
pub(crate) mod naive;

use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::locales::LocaleDirectory;
use crate::resolver::locale::LocaleRun;
use crate::resolver::naive::naive_resolve;
use crate::schema::SchemaCache;
use crate::traits::ContentApi;
use crate::types::{RecordSet, ResolvedSet, ResolverConfig};

/// Resolves a localized record graph into one materialized tree per locale.
///
/// # Example
///
/// ```rust,ignore
/// let resolver = Resolver::connect(api).await?;
/// let result = resolver.resolve(&records, &root_id).await?;
///
/// for (locale, tree) in &result.data {
///     println!("{locale}: {}", serde_json::to_string(tree)?);
/// }
/// for (locale, message) in &result.errors {
///     eprintln!("{locale} failed: {message}");
/// }
/// ```
#[derive(Debug)]
pub struct Resolver<C> {
    schema: SchemaCache<C>,
    locales: LocaleDirectory,
    config: ResolverConfig,
}

impl<C: ContentApi> Resolver<C> {
    /// Connect to a content API with default configuration.
    ///
    /// Fetches the space and validates its locale set; fails with
    /// [`crate::ConfigError`] unless exactly one locale is default.
    pub async fn connect(api: C) -> Result<Self> {
        Self::connect_with_config(api, ResolverConfig::default()).await
    }

    /// Connect with custom configuration.
    pub async fn connect_with_config(api: C, config: ResolverConfig) -> Result<Self> {
        let space = api.get_space().await?;
        let locales = LocaleDirectory::from_space(space)?;
        debug!(
            default = %locales.default_locale().code,
            locales = locales.locales().len(),
            "locale directory initialized"
        );
        Ok(Self {
            schema: SchemaCache::new(api),
            locales,
            config,
        })
    }

    /// The validated locale set.
    pub fn locales(&self) -> &LocaleDirectory {
        &self.locales
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the tree rooted at `root` for every locale of the space.
    ///
    /// The default locale's tree comes from the depth-bounded, error-free
    /// default pass and is always present in `data`. Every other locale
    /// lands in exactly one of `data` (success) or `errors`
    /// (locale-suffixed failure message).
    pub async fn resolve(&self, records: &RecordSet, root: &str) -> Result<ResolvedSet> {
        let root = records
            .get(root)
            .ok_or_else(|| ResolveError::UnknownRecord {
                id: root.to_string(),
            })?;
        let default_locale = self.locales.default_locale();
        let default_data = Arc::new(naive_resolve(records, root, default_locale, &self.config));

        let runs = self.locales.alternatives().map(|locale| {
            let default_data = &default_data;
            async move {
                let run = LocaleRun {
                    schema: &self.schema,
                    records,
                    locale,
                    default_locale,
                };
                (locale.code.clone(), run.resolve(root, default_data).await)
            }
        });
        let outcomes = join_all(runs).await;

        let mut set = ResolvedSet::new();
        set.data
            .insert(default_locale.code.clone(), default_data.clone());
        for (code, outcome) in outcomes {
            match outcome {
                Ok(node) => {
                    set.data.insert(code, node);
                }
                Err(error) => {
                    let message = format!("{error}\n\t for locale {code}");
                    set.errors.insert(code, message);
                }
            }
        }
        Ok(set)
    }
}
