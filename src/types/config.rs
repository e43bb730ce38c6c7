//! Configuration for the resolution passes.

use serde::{Deserialize, Serialize};

/// Scoping of the default pass's revisit counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitScope {
    /// The counter map is propagated by value down each recursive branch,
    /// so sibling branches do not interfere with each other's counts.
    PerPath,

    /// One counter map is shared across the whole pass; every visit of a
    /// record anywhere in the tree consumes its budget.
    Global,
}

/// Configuration for the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// How many times the default pass may enter a record before further
    /// revisits flatten to null. Default: 1 (a second visit yields null).
    pub naive_depth: usize,

    /// Scoping of the default pass's revisit counter.
    ///
    /// Default: [`VisitScope::PerPath`].
    pub naive_scope: VisitScope,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            naive_depth: 1,
            naive_scope: VisitScope::PerPath,
        }
    }
}

impl ResolverConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the revisit depth for the default pass.
    pub fn with_naive_depth(mut self, depth: usize) -> Self {
        self.naive_depth = depth;
        self
    }

    /// Set the revisit counter scope for the default pass.
    pub fn with_naive_scope(mut self, scope: VisitScope) -> Self {
        self.naive_scope = scope;
        self
    }
}
