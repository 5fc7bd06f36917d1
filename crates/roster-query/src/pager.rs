//! Paginated user list controller
//!
//! Drives a forward-only, cursor-based page sequence over the users
//! collection, filtered by the encoded search string, with one page of
//! read-ahead.
//!
//! # Lanes
//!
//! ```text
//! primary  : (filter, cursor)      → displayed page, fetching/error state
//! prefetch : (filter, next_cursor) → cache only, paused while next_cursor is empty
//! ```
//!
//! Displayed state is always derived from the current `(filter, cursor)`
//! pair. A primary response for any other pair is discarded, whatever order
//! responses arrive in.

use crate::api::DirectoryApi;
use crate::client::QueryClient;
use crate::error::ApiError;
use crate::types::{Connection, UserSearchOptions, UserSummary};
use roster_filter::FilterState;
use std::sync::Arc;

/// Static list parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Order favorited users first
    pub favorites_first: bool,
    /// Page size, left to the server when unset
    pub page_size: Option<u32>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            favorites_first: true,
            page_size: None,
        }
    }
}

impl ListParams {
    /// Query input for `filter` positioned at `cursor`
    ///
    /// The label segment becomes `search` and the phone fragment `CMValue`.
    #[must_use]
    pub fn search_options(&self, filter: &FilterState, cursor: &str) -> UserSearchOptions {
        UserSearchOptions {
            favorites_first: self.favorites_first,
            search: filter.label_search(),
            cm_value: filter.phone_number.clone(),
            after: cursor.to_string(),
            first: self.page_size,
        }
    }
}

/// Identity of an issued primary request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryRequest {
    id: u64,
    input: UserSearchOptions,
}

impl PrimaryRequest {
    /// Query input this request was issued with
    #[inline]
    #[must_use]
    pub fn input(&self) -> &UserSearchOptions {
        &self.input
    }
}

/// Result of a primary refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page was already cached; no request issued
    CacheHit,
    /// Page fetched and displayed
    Fetched,
    /// Request failed; error is displayed
    Failed,
    /// Response belonged to an older `(filter, cursor)` pair and was dropped
    Superseded,
}

/// Result of a prefetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchOutcome {
    /// No next page known; nothing issued
    Paused,
    /// Next page is in the cache
    Warmed,
    /// Prefetch failed; ignored
    Failed,
}

/// Controller for the paginated user list
#[derive(Debug)]
pub struct UserListController<A: ?Sized> {
    client: QueryClient<A>,
    search: String,
    filter: FilterState,
    params: ListParams,
    cursor: String,
    /// Page for `data_input`, kept across refetches of the same input
    data: Option<Arc<Connection<UserSummary>>>,
    data_input: Option<UserSearchOptions>,
    error: Option<ApiError>,
    /// Latest issued primary request still awaiting completion
    in_flight: Option<u64>,
    next_request_id: u64,
}

impl<A: DirectoryApi + ?Sized> UserListController<A> {
    /// Create controller positioned at the first page of `search`
    #[must_use]
    pub fn new(client: QueryClient<A>, search: &str, params: ListParams) -> Self {
        Self {
            client,
            search: search.to_string(),
            filter: roster_filter::decode(search),
            params,
            cursor: String::new(),
            data: None,
            data_input: None,
            error: None,
            in_flight: None,
            next_request_id: 0,
        }
    }

    /// Query client used by this controller
    #[inline]
    #[must_use]
    pub fn client(&self) -> &QueryClient<A> {
        &self.client
    }

    /// Current encoded search string
    #[inline]
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Current decoded filter
    #[inline]
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Current static parameters
    #[inline]
    #[must_use]
    pub fn params(&self) -> &ListParams {
        &self.params
    }

    /// Cursor of the displayed page, empty for the first page
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Replace the encoded search; any change returns to the first page
    pub fn set_search(&mut self, search: &str) {
        if search == self.search {
            return;
        }
        tracing::debug!(from = %self.search, to = %search, "search changed, resetting cursor");
        self.search = search.to_string();
        self.filter = roster_filter::decode(search);
        self.reset_position();
    }

    /// Replace static parameters; any change returns to the first page
    pub fn set_params(&mut self, params: ListParams) {
        if params == self.params {
            return;
        }
        self.params = params;
        self.reset_position();
    }

    /// Move to another page
    pub fn on_cursor_change(&mut self, cursor: &str) {
        if cursor == self.cursor {
            return;
        }
        tracing::trace!(cursor, "cursor changed");
        self.cursor = cursor.to_string();
        self.clear_page();
    }

    fn reset_position(&mut self) {
        self.cursor.clear();
        self.clear_page();
    }

    fn clear_page(&mut self) {
        self.data = None;
        self.data_input = None;
        self.error = None;
        self.in_flight = None;
    }

    /// Query input for the displayed page
    #[must_use]
    pub fn primary_input(&self) -> UserSearchOptions {
        self.params.search_options(&self.filter, &self.cursor)
    }

    /// Cursor of the following page
    ///
    /// Empty unless the displayed page explicitly reports more pages.
    #[must_use]
    pub fn next_cursor(&self) -> &str {
        self.current_page()
            .map_or("", |page| page.page_info.next_cursor())
    }

    /// Query input for the read-ahead page, `None` while paused
    #[must_use]
    pub fn prefetch_input(&self) -> Option<UserSearchOptions> {
        let next = self.next_cursor();
        if next.is_empty() {
            None
        } else {
            Some(self.primary_input().at_cursor(next))
        }
    }

    /// Record a primary request as issued
    pub fn begin_primary(&mut self) -> PrimaryRequest {
        self.next_request_id += 1;
        let id = self.next_request_id;
        self.in_flight = Some(id);
        PrimaryRequest {
            id,
            input: self.primary_input(),
        }
    }

    /// Apply the response of an issued primary request
    ///
    /// Responses for a `(filter, cursor)` pair other than the current one
    /// are dropped.
    pub fn complete_primary(
        &mut self,
        request: PrimaryRequest,
        result: Result<Arc<Connection<UserSummary>>, ApiError>,
    ) -> FetchOutcome {
        if request.input != self.primary_input() {
            tracing::debug!(request = request.id, "dropping response for superseded request");
            return FetchOutcome::Superseded;
        }
        if self.in_flight == Some(request.id) {
            self.in_flight = None;
        }

        match result {
            Ok(page) => {
                self.data = Some(page);
                self.data_input = Some(request.input);
                self.error = None;
                FetchOutcome::Fetched
            }
            Err(err) => {
                tracing::warn!(search = %self.search, cursor = %self.cursor, "user list query failed: {err}");
                self.error = Some(err);
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch the displayed page, cache first
    pub async fn refresh(&mut self) -> FetchOutcome {
        let input = self.primary_input();
        if let Some(page) = self.client.cached_users(&input).await {
            tracing::debug!(cursor = %input.after, "primary page served from cache");
            self.data = Some(page);
            self.data_input = Some(input);
            self.error = None;
            return FetchOutcome::CacheHit;
        }

        let request = self.begin_primary();
        let result = self.client.users(request.input()).await;
        self.complete_primary(request, result)
    }

    /// Warm the cache with the following page
    ///
    /// Issues nothing while no next page is known. Failures never reach the
    /// displayed state.
    pub async fn prefetch(&self) -> PrefetchOutcome {
        let Some(input) = self.prefetch_input() else {
            tracing::trace!("prefetch paused, no next cursor");
            return PrefetchOutcome::Paused;
        };

        match self.client.users(&input).await {
            Ok(_) => PrefetchOutcome::Warmed,
            Err(err) => {
                tracing::debug!(cursor = %input.after, "prefetch failed: {err}");
                PrefetchOutcome::Failed
            }
        }
    }

    /// Refresh the displayed page, then prefetch the next one
    pub async fn sync(&mut self) -> (FetchOutcome, PrefetchOutcome) {
        let fetched = self.refresh().await;
        let prefetched = self.prefetch().await;
        (fetched, prefetched)
    }

    fn current_page(&self) -> Option<&Arc<Connection<UserSummary>>> {
        let current = self.primary_input();
        match (&self.data, &self.data_input) {
            (Some(page), Some(input)) if *input == current => Some(page),
            _ => None,
        }
    }

    /// Users on the displayed page
    #[must_use]
    pub fn items(&self) -> &[UserSummary] {
        self.current_page()
            .map(|page| page.nodes.as_slice())
            .unwrap_or_default()
    }

    /// A primary request for the current pair is in flight
    #[inline]
    #[must_use]
    pub fn fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Fetching with nothing to show yet
    ///
    /// Refetches of a page that is already displayed do not count.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.fetching() && self.current_page().is_none()
    }

    /// Error of the last primary request
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }
}
