//! Label key and value selects backed by directory lookups

use roster_query::{
    ApiError, DirectoryApi, LabelKeySearchOptions, LabelValueSearchOptions, QueryClient,
    TargetType,
};

/// One selectable option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    #[inline]
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self {
            label: text.to_string(),
            value: text.to_string(),
        }
    }
}

/// What a select can currently offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectState {
    /// Control is disabled; nothing was looked up
    Disabled,
    Options(Vec<SelectOption>),
}

impl SelectState {
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Offered options, empty while disabled
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        match self {
            Self::Disabled => &[],
            Self::Options(options) => options,
        }
    }
}

fn search_term(search: &str) -> Option<String> {
    let search = search.trim();
    (!search.is_empty()).then(|| search.to_string())
}

/// Select over user label keys
#[derive(Debug)]
pub struct LabelKeySelect<A: ?Sized> {
    client: QueryClient<A>,
}

impl<A: DirectoryApi + ?Sized> LabelKeySelect<A> {
    #[inline]
    #[must_use]
    pub fn new(client: QueryClient<A>) -> Self {
        Self { client }
    }

    /// Keys matching `search`
    ///
    /// # Errors
    /// Returns the lookup error.
    pub async fn options(&self, search: &str) -> Result<Vec<SelectOption>, ApiError> {
        let input = LabelKeySearchOptions {
            search: search_term(search),
            target_type: Some(TargetType::User),
        };
        let keys = self.client.label_keys(&input).await?;
        Ok(keys.iter().map(|k| SelectOption::plain(k)).collect())
    }
}

/// Select over the values recorded under one label key
#[derive(Debug)]
pub struct LabelValueSelect<A: ?Sized> {
    client: QueryClient<A>,
}

impl<A: DirectoryApi + ?Sized> LabelValueSelect<A> {
    #[inline]
    #[must_use]
    pub fn new(client: QueryClient<A>) -> Self {
        Self { client }
    }

    /// Values under `key` matching `search`
    ///
    /// Disabled without any lookup while `key` is empty.
    ///
    /// # Errors
    /// Returns the lookup error.
    pub async fn options(&self, key: &str, search: &str) -> Result<SelectState, ApiError> {
        if key.is_empty() {
            return Ok(SelectState::Disabled);
        }
        let input = LabelValueSearchOptions {
            key: key.to_string(),
            search: search_term(search),
            target_type: Some(TargetType::User),
        };
        let values = self.client.label_values(&input).await?;
        Ok(SelectState::Options(
            values.iter().map(|v| SelectOption::plain(v)).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roster_test_utils::{seeded_directory, MemoryDirectory, Request, UserRecord};
    use std::sync::Arc;

    fn directory() -> Arc<MemoryDirectory> {
        let dir = seeded_directory(3, 10);
        dir.insert(UserRecord::new("Zed", "zed@example.com").with_label("site/region", "eu"));
        Arc::new(dir)
    }

    #[tokio::test]
    async fn key_options_filtered_by_search() {
        let dir = directory();
        let select = LabelKeySelect::new(QueryClient::new(Arc::clone(&dir)));

        let all = select.options("").await.unwrap();
        assert_eq!(
            all,
            vec![SelectOption::plain("site/region"), SelectOption::plain("team/dept")]
        );

        let team = select.options("TEAM").await.unwrap();
        assert_eq!(team, vec![SelectOption::plain("team/dept")]);
    }

    #[tokio::test]
    async fn value_select_disabled_without_key() {
        let dir = directory();
        let select = LabelValueSelect::new(QueryClient::new(Arc::clone(&dir)));

        let state = select.options("", "").await.unwrap();

        assert!(state.is_disabled());
        assert!(state.options().is_empty());
        assert!(dir.requests().is_empty());
    }

    #[tokio::test]
    async fn value_options_scoped_to_key() {
        let dir = directory();
        let select = LabelValueSelect::new(QueryClient::new(Arc::clone(&dir)));

        let state = select.options("team/dept", "").await.unwrap();
        assert_eq!(
            state.options(),
            &[SelectOption::plain("dev"), SelectOption::plain("ops")]
        );
    }

    #[tokio::test]
    async fn repeated_lookup_served_from_cache() {
        let dir = directory();
        let select = LabelValueSelect::new(QueryClient::new(Arc::clone(&dir)));

        select.options("team/dept", "o").await.unwrap();
        select.options("team/dept", "o").await.unwrap();

        let lookups = dir
            .requests()
            .into_iter()
            .filter(|r| matches!(r, Request::LabelValues(_)))
            .count();
        assert_eq!(lookups, 1);
    }
}
