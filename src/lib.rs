//! Locale fallback resolution for cyclic localized content graphs.
//!
//! A record graph carries, per field, a value keyed by locale code; some
//! fields are scalars, some reference other records, and the reference
//! graph may be cyclic. This library materializes one fully-resolved tree
//! per locale: a missing translation falls back to the default locale's
//! resolved value, recursively, field-by-field, and a field that cannot
//! be resolved fails with a breadcrumb naming the exact nested field.
//!
//! # Design
//!
//! - Schemas and locales come from an external content service behind the
//!   narrow [`ContentApi`] trait; everything else is pure tree work.
//! - One depth-bounded default pass flattens the graph for the default
//!   locale; every other locale resolves concurrently against that tree,
//!   failures isolated per locale.
//! - Schema lookups are memoized per content type with in-flight
//!   deduplication.
//!
//! # Usage
//!
//! ```rust,ignore
//! use localize::{Record, RecordSet, Resolver, Value};
//!
//! let records: RecordSet = [
//!     Record::entry("home", "page")
//!         .with_field("title", [("en", Value::scalar("Home")),
//!                               ("de", Value::scalar("Startseite"))])
//!         .with_field("hero", [("en", Value::link("tree"))]),
//!     Record::asset("tree")
//!         .with_field("file", [("en", Value::scalar("/tree.png"))]),
//! ]
//! .into_iter()
//! .collect();
//!
//! let resolver = Resolver::connect(api).await?;
//! let result = resolver.resolve(&records, "home").await?;
//! // result.data:   locale code -> resolved tree
//! // result.errors: locale code -> failure message
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The [`ContentApi`] seam to the external content service
//! - [`types`] - Record graph, schema, locale, and resolved-output types
//! - [`resolver`] - The default pass and per-locale resolution
//! - [`schema`] - Memoized schema cache
//! - [`locales`] - Validated locale directory
//! - [`testing`] - Mock content API for tests

pub mod error;
pub mod locales;
pub mod resolver;
pub mod schema;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ConfigError, ResolveError, Result};
pub use locales::LocaleDirectory;
pub use resolver::Resolver;
pub use schema::SchemaCache;
pub use traits::ContentApi;
pub use types::{
    ContentType, Field, Locale, LocaleValueMap, Record, RecordId, RecordKind, RecordSet,
    ResolvedNode, ResolvedSet, ResolvedValue, ResolverConfig, Space, Value, VisitScope,
};
