//! Testing utilities including a mock content API.
//!
//! Useful for testing applications that resolve record graphs without a
//! real content service behind them.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ResolveError, Result};
use crate::traits::ContentApi;
use crate::types::{ContentType, Locale, Space};

/// A mock content API with configurable schemas and locales.
///
/// Records every call, so tests can assert memoization and in-flight
/// deduplication; an optional artificial delay makes concurrent lookups
/// observable. Cloning shares the underlying state, so a test can keep a
/// handle for assertions after handing the mock to a resolver.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    content_types: Arc<RwLock<HashMap<String, ContentType>>>,
    space: Arc<RwLock<Option<Space>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<MockCall>>>,
    delay: Option<Duration>,
}

/// Record of a call made to the mock API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetContentType { id: String },
    GetSpace,
}

impl MockApi {
    /// Create a mock with no schemas and no space configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content type.
    pub fn with_content_type(self, content_type: ContentType) -> Self {
        self.add_content_type(content_type);
        self
    }

    /// Add a content type to an already-shared mock.
    pub fn add_content_type(&self, content_type: ContentType) {
        self.content_types
            .write()
            .unwrap()
            .insert(content_type.id.clone(), content_type);
    }

    /// Configure the space's locale set.
    pub fn with_locales(self, locales: impl IntoIterator<Item = Locale>) -> Self {
        *self.space.write().unwrap() = Some(Space::new(locales));
        self
    }

    /// Make lookups for one content type id fail.
    pub fn failing_content_type(self, id: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(id.into());
        self
    }

    /// Sleep this long inside every lookup.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of schema lookups for one content type id.
    pub fn content_type_lookups(&self, id: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, MockCall::GetContentType { id: called } if called == id))
            .count()
    }
}

#[async_trait]
impl ContentApi for MockApi {
    async fn get_content_type(&self, id: &str) -> Result<ContentType> {
        self.calls
            .write()
            .unwrap()
            .push(MockCall::GetContentType { id: id.to_string() });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.read().unwrap().contains(id) {
            return Err(ResolveError::Provider(
                format!("content type lookup failed: {id}").into(),
            ));
        }
        self.content_types
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ResolveError::Provider(format!("unknown content type: {id}").into()))
    }

    async fn get_space(&self) -> Result<Space> {
        self.calls.write().unwrap().push(MockCall::GetSpace);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.space
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| ResolveError::Provider("no space configured".into()))
    }
}
