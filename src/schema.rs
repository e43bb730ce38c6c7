//! Memoized schema cache with in-flight deduplication.
//!
//! Field metadata for a content type is immutable for the session, so it
//! is fetched at most once and shared read-only across all concurrently
//! running per-locale resolutions. Concurrent lookups for the same
//! uncomputed content type collapse to a single in-flight request: each
//! id owns a `tokio::sync::OnceCell`, handed out under a brief mutex, and
//! the cell serializes initialization. A failed fetch leaves the cell
//! empty, so a later lookup may retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::traits::ContentApi;
use crate::types::Field;

/// Read-only, lazily populated mapping from content-type id to fields.
#[derive(Debug)]
pub struct SchemaCache<C> {
    api: C,
    cells: Mutex<HashMap<String, Arc<OnceCell<Arc<[Field]>>>>>,
}

impl<C: ContentApi> SchemaCache<C> {
    /// Create an empty cache over a content API.
    pub fn new(api: C) -> Self {
        Self {
            api,
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying content API.
    pub fn api(&self) -> &C {
        &self.api
    }

    /// The field metadata for a content type, fetching on first use.
    pub async fn fields(&self, content_type_id: &str) -> Result<Arc<[Field]>> {
        let cell = {
            let mut cells = self.cells.lock().unwrap();
            cells
                .entry(content_type_id.to_string())
                .or_default()
                .clone()
        };

        let fields = cell
            .get_or_try_init(|| async {
                debug!(content_type = content_type_id, "schema cache miss");
                let content_type = self.api.get_content_type(content_type_id).await?;
                Ok::<_, ResolveError>(Arc::from(content_type.fields))
            })
            .await?;

        Ok(fields.clone())
    }
}
