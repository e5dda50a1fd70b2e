//! # Reference Resolver
//!
//! Resolves `$ref` locators through a [`SchemaStore`] and caches the parsed
//! documents for the life of the resolver. The cache is a concurrent map:
//! lookups from many threads proceed in parallel, and the entry API makes
//! each locator load at most once even when threads race on a cold entry.
//!
//! Failed loads are not cached; the next lookup retries the store.

use std::sync::Arc;

use dashmap::DashMap;
use jsv_core::ResolutionError;
use serde_json::Value;

use crate::store::SchemaStore;

/// Locator → schema lookup as seen by the engine.
pub trait Resolve: Send + Sync {
    /// Return the schema named by `locator`.
    fn resolve(&self, locator: &str) -> Result<Arc<Value>, ResolutionError>;
}

/// Caching resolver over a [`SchemaStore`].
#[derive(Debug)]
pub struct Resolver<S> {
    store: S,
    cache: DashMap<String, Arc<Value>>,
}

impl<S: SchemaStore> Resolver<S> {
    /// Resolver with an empty cache.
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: DashMap::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether `locator` has been loaded already.
    pub fn is_cached(&self, locator: &str) -> bool {
        self.cache.contains_key(locator)
    }

    /// Number of cached documents.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

impl<S: SchemaStore> Resolve for Resolver<S> {
    fn resolve(&self, locator: &str) -> Result<Arc<Value>, ResolutionError> {
        if let Some(cached) = self.cache.get(locator) {
            tracing::trace!(locator, "schema cache hit");
            return Ok(Arc::clone(cached.value()));
        }

        let entry = self
            .cache
            .entry(locator.to_string())
            .or_try_insert_with(|| {
                tracing::debug!(locator, "loading schema document");
                self.store.load(locator).map(Arc::new)
            })
            .map_err(|error| {
                tracing::debug!(locator, error = %error, "schema resolution failed");
                error
            })?;
        Ok(Arc::clone(entry.value()))
    }
}
