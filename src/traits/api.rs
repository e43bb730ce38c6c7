//! The content API trait - the resolver's only window to the outside.
//!
//! The resolver needs exactly two things from a remote content service:
//! the locale set of the space, fetched once at setup, and field metadata
//! per content type, fetched lazily through the memoized schema cache.
//! Everything beneath these calls (HTTP, auth, caching) is the
//! implementor's concern.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ContentType, Space};

/// Async lookup of schemas and space configuration.
///
/// Implementations wrap a specific content service client and map its
/// failures into [`crate::ResolveError::Provider`].
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Fetch the field metadata for a content type.
    ///
    /// Called through the schema cache, at most once per content type id
    /// per session (a failed lookup may be retried).
    async fn get_content_type(&self, id: &str) -> Result<ContentType>;

    /// Fetch the space configuration, including its locale set.
    ///
    /// Called once, at setup time.
    async fn get_space(&self) -> Result<Space>;
}
