//! Query result cache using moka
//!
//! Results are keyed by operation and variables, so a page fetched ahead of
//! time is served instantly when the same variables are requested again.
//! Each key knows which record typenames its result contains; mutations
//! evict by typename.

use crate::error::ApiError;
use crate::types::{
    Connection, Label, LabelKeySearchOptions, LabelValueSearchOptions, UserSearchOptions,
    UserSummary,
};
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Typename of user records
pub const USER_TYPENAME: &str = "User";
/// Typename of label records
pub const LABEL_TYPENAME: &str = "Label";

/// Operation plus variables identifying one cached result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Users(UserSearchOptions),
    LabelKeys(LabelKeySearchOptions),
    LabelValues(LabelValueSearchOptions),
    UserLabels(String),
}

impl QueryKey {
    /// Record typenames contained in this query's result
    #[must_use]
    pub fn typenames(&self) -> &'static [&'static str] {
        match self {
            Self::Users(_) => &[USER_TYPENAME],
            Self::LabelKeys(_) | Self::LabelValues(_) => &[LABEL_TYPENAME],
            Self::UserLabels(_) => &[USER_TYPENAME, LABEL_TYPENAME],
        }
    }

    /// Operation name, for logging
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Users(_) => "users",
            Self::LabelKeys(_) => "labelKeys",
            Self::LabelValues(_) => "labelValues",
            Self::UserLabels(_) => "userLabels",
        }
    }
}

/// A cached query result
#[derive(Debug, Clone)]
pub enum CachedResult {
    Users(Arc<Connection<UserSummary>>),
    Strings(Arc<Vec<String>>),
    Labels(Arc<Vec<Label>>),
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Approximate number of entries in cache
    pub entry_count: u64,
}

/// Shared result cache
///
/// Cloning is cheap; clones share the same entries.
#[derive(Debug, Clone)]
pub struct QueryCache {
    inner: Cache<QueryKey, CachedResult>,
}

impl QueryCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .support_invalidation_closures()
                .build(),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .support_invalidation_closures()
                .build(),
        }
    }

    /// Cached result, if present
    #[inline]
    pub async fn get(&self, key: &QueryKey) -> Option<CachedResult> {
        self.inner.get(key).await
    }

    /// Insert a result
    #[inline]
    pub async fn insert(&self, key: QueryKey, value: CachedResult) {
        self.inner.insert(key, value).await;
    }

    /// Cached result, or run `fetch` and cache its success
    ///
    /// Concurrent calls for the same key share one `fetch`. Errors are not
    /// cached.
    pub async fn get_or_fetch<F>(&self, key: QueryKey, fetch: F) -> Result<CachedResult, ApiError>
    where
        F: Future<Output = Result<CachedResult, ApiError>>,
    {
        self.inner
            .try_get_with(key, fetch)
            .await
            .map_err(|err| (*err).clone())
    }

    /// Evict every entry containing any of the given typenames
    pub fn invalidate_typenames(&self, typenames: &[&str]) {
        let stale: Vec<String> = typenames.iter().map(|t| (*t).to_string()).collect();
        tracing::debug!(typenames = ?stale, "invalidating cached queries");

        let predicate = move |key: &QueryKey, _: &CachedResult| {
            key.typenames()
                .iter()
                .any(|name| stale.iter().any(|s| s == name))
        };
        if let Err(err) = self.inner.invalidate_entries_if(predicate) {
            tracing::warn!("typename invalidation unavailable, clearing cache: {err}");
            self.inner.invalidate_all();
        }
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Check if cache contains key
    #[inline]
    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.inner.get(key).await.is_some()
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for QueryCache {
    /// Create cache with default capacity (10,000 entries)
    fn default() -> Self {
        Self::new(10_000)
    }
}
