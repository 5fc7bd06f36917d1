//! Cache-first query client
//!
//! Wraps a [`DirectoryApi`] with a [`QueryCache`]:
//! - queries are served from cache when possible
//! - identical in-flight queries share one request
//! - successful mutations invalidate the typenames they affect

use crate::api::DirectoryApi;
use crate::cache::{CachedResult, QueryCache, QueryKey};
use crate::error::ApiError;
use crate::types::{
    Connection, Label, LabelKeySearchOptions, LabelValueSearchOptions, SetLabelInput,
    UserSearchOptions, UserSummary,
};
use std::sync::Arc;

/// Query client shared by list, selects and dialogs
#[derive(Debug)]
pub struct QueryClient<A: ?Sized> {
    api: Arc<A>,
    cache: QueryCache,
}

impl<A: ?Sized> Clone for QueryClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            cache: self.cache.clone(),
        }
    }
}

impl<A: DirectoryApi + ?Sized> QueryClient<A> {
    /// Create client with a default cache
    #[inline]
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self::with_cache(api, QueryCache::default())
    }

    /// Create client over an existing cache
    #[inline]
    #[must_use]
    pub fn with_cache(api: Arc<A>, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    /// Underlying API
    #[inline]
    #[must_use]
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Result cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Users page from cache only, never issuing a request
    pub async fn cached_users(
        &self,
        input: &UserSearchOptions,
    ) -> Option<Arc<Connection<UserSummary>>> {
        match self.cache.get(&QueryKey::Users(input.clone())).await {
            Some(CachedResult::Users(page)) => Some(page),
            _ => None,
        }
    }

    /// One page of users
    pub async fn users(
        &self,
        input: &UserSearchOptions,
    ) -> Result<Arc<Connection<UserSummary>>, ApiError> {
        let key = QueryKey::Users(input.clone());
        let fetched = self
            .cache
            .get_or_fetch(key, async {
                tracing::debug!(search = %input.search, cm_value = %input.cm_value, after = %input.after, "fetching users page");
                let page = self.api.users(input).await?;
                Ok::<_, ApiError>(CachedResult::Users(Arc::new(page)))
            })
            .await?;

        match fetched {
            CachedResult::Users(page) => Ok(page),
            other => Err(mismatch("users", &other)),
        }
    }

    /// Label keys matching the options
    pub async fn label_keys(
        &self,
        input: &LabelKeySearchOptions,
    ) -> Result<Arc<Vec<String>>, ApiError> {
        let key = QueryKey::LabelKeys(input.clone());
        let fetched = self
            .cache
            .get_or_fetch(key, async {
                let keys = self.api.label_keys(input).await?;
                Ok::<_, ApiError>(CachedResult::Strings(Arc::new(keys)))
            })
            .await?;

        match fetched {
            CachedResult::Strings(keys) => Ok(keys),
            other => Err(mismatch("labelKeys", &other)),
        }
    }

    /// Label values recorded under one key
    pub async fn label_values(
        &self,
        input: &LabelValueSearchOptions,
    ) -> Result<Arc<Vec<String>>, ApiError> {
        let key = QueryKey::LabelValues(input.clone());
        let fetched = self
            .cache
            .get_or_fetch(key, async {
                let values = self.api.label_values(input).await?;
                Ok::<_, ApiError>(CachedResult::Strings(Arc::new(values)))
            })
            .await?;

        match fetched {
            CachedResult::Strings(values) => Ok(values),
            other => Err(mismatch("labelValues", &other)),
        }
    }

    /// Labels attached to one user
    pub async fn user_labels(&self, user_id: &str) -> Result<Arc<Vec<Label>>, ApiError> {
        let key = QueryKey::UserLabels(user_id.to_string());
        let fetched = self
            .cache
            .get_or_fetch(key, async {
                let labels = self.api.user_labels(user_id).await?;
                Ok::<_, ApiError>(CachedResult::Labels(Arc::new(labels)))
            })
            .await?;

        match fetched {
            CachedResult::Labels(labels) => Ok(labels),
            other => Err(mismatch("userLabels", &other)),
        }
    }

    /// Run the `setLabel` mutation
    ///
    /// On success, every cached query containing one of
    /// `additional_typenames` (plus labels themselves) is evicted.
    ///
    /// # Errors
    /// Returns the API error unchanged; nothing is invalidated on failure.
    pub async fn set_label(
        &self,
        input: &SetLabelInput,
        additional_typenames: &[&str],
    ) -> Result<(), ApiError> {
        tracing::info!(key = %input.key, target = %input.target.id, delete = input.is_delete(), "setting label");

        if let Err(err) = self.api.set_label(input).await {
            tracing::warn!(key = %input.key, "set label failed: {err}");
            return Err(err);
        }

        let mut typenames = vec![crate::cache::LABEL_TYPENAME];
        typenames.extend_from_slice(additional_typenames);
        self.cache.invalidate_typenames(&typenames);
        Ok(())
    }
}

fn mismatch(operation: &str, found: &CachedResult) -> ApiError {
    ApiError::Unexpected(format!("cached {operation} result has wrong shape: {found:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDirectoryApi;
    use crate::cache::USER_TYPENAME;
    use crate::types::{PageInfo, Target};

    fn page(ids: &[&str]) -> Connection<UserSummary> {
        Connection::new(
            ids.iter()
                .map(|id| UserSummary {
                    id: (*id).to_string(),
                    name: format!("User {id}"),
                    email: format!("{id}@example.com"),
                    is_favorite: false,
                })
                .collect(),
            PageInfo::default(),
        )
    }

    #[tokio::test]
    async fn users_served_from_cache_second_time() {
        let mut api = MockDirectoryApi::new();
        api.expect_users().times(1).returning(|_| Ok(page(&["u1"])));
        let client = QueryClient::new(Arc::new(api));
        let input = UserSearchOptions::default();

        assert!(client.cached_users(&input).await.is_none());
        let first = client.users(&input).await.unwrap();
        let second = client.users(&input).await.unwrap();

        assert_eq!(first.nodes[0].id, "u1");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(client.cached_users(&input).await.is_some());
    }

    #[tokio::test]
    async fn failed_query_is_not_cached() {
        let mut api = MockDirectoryApi::new();
        let mut seq = mockall::Sequence::new();
        api.expect_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ApiError::Transport("timeout".to_string())));
        api.expect_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(page(&["u1"])));
        let client = QueryClient::new(Arc::new(api));
        let input = UserSearchOptions::default();

        assert!(client.users(&input).await.is_err());
        assert!(client.users(&input).await.is_ok());
    }

    #[tokio::test]
    async fn successful_mutation_invalidates_typenames() {
        let mut api = MockDirectoryApi::new();
        api.expect_users().times(2).returning(|_| Ok(page(&["u1"])));
        api.expect_set_label().times(1).returning(|_| Ok(()));
        let client = QueryClient::new(Arc::new(api));
        let input = UserSearchOptions::default();

        client.users(&input).await.unwrap();
        let mutation = SetLabelInput {
            key: "team/dept".to_string(),
            value: "ops".to_string(),
            target: Target::user("u1"),
        };
        client.set_label(&mutation, &[USER_TYPENAME]).await.unwrap();

        assert!(client.cached_users(&input).await.is_none());
        client.users(&input).await.unwrap();
    }

    #[tokio::test]
    async fn failed_mutation_keeps_cache() {
        let mut api = MockDirectoryApi::new();
        api.expect_users().times(1).returning(|_| Ok(page(&["u1"])));
        api.expect_set_label()
            .times(1)
            .returning(|_| Err(ApiError::field("key", "invalid key")));
        let client = QueryClient::new(Arc::new(api));
        let input = UserSearchOptions::default();

        client.users(&input).await.unwrap();
        let mutation = SetLabelInput {
            key: "bad".to_string(),
            value: "x".to_string(),
            target: Target::user("u1"),
        };
        let err = client.set_label(&mutation, &[USER_TYPENAME]).await.unwrap_err();

        assert_eq!(err.field_error("key"), Some("invalid key"));
        assert!(client.cached_users(&input).await.is_some());
    }

    #[tokio::test]
    async fn label_values_keyed_by_key() {
        let mut api = MockDirectoryApi::new();
        api.expect_label_values()
            .times(2)
            .returning(|input| Ok(vec![format!("{}-value", input.key)]));
        let client = QueryClient::new(Arc::new(api));

        let a = LabelValueSearchOptions {
            key: "a/b".to_string(),
            ..LabelValueSearchOptions::default()
        };
        let c = LabelValueSearchOptions {
            key: "c/d".to_string(),
            ..LabelValueSearchOptions::default()
        };

        assert_eq!(client.label_values(&a).await.unwrap()[0], "a/b-value");
        assert_eq!(client.label_values(&c).await.unwrap()[0], "c/d-value");
        assert_eq!(client.label_values(&a).await.unwrap()[0], "a/b-value");
    }
}
