//! User list page
//!
//! Binds the filter editor's events to the persisted search string and the
//! paginated list. The encoded search string is the single source of truth:
//! every filter event is encoded, written to the search parameter, and the
//! list is re-targeted from that string.

use crate::editor::FilterEvent;
use parking_lot::Mutex;
use roster_filter::{encode, FilterState};
use roster_query::{
    DirectoryApi, FetchOutcome, ListParams, PrefetchOutcome, QueryClient, UserListController,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Persisted search string (e.g. a URL query parameter)
pub trait SearchParam: Send + Sync {
    /// Current value, empty when unset
    fn get(&self) -> String;
    /// Replace the value
    fn set(&self, value: &str);
}

/// In-memory search parameter
#[derive(Debug, Default)]
pub struct MemorySearchParam {
    value: Mutex<String>,
}

impl MemorySearchParam {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: Mutex::new(value.to_string()),
        }
    }
}

impl SearchParam for MemorySearchParam {
    fn get(&self) -> String {
        self.value.lock().clone()
    }

    fn set(&self, value: &str) {
        *self.value.lock() = value.to_string();
    }
}

/// User list page state
#[derive(Debug)]
pub struct UserListPage<A: ?Sized, P> {
    param: P,
    list: UserListController<A>,
}

impl<A: DirectoryApi + ?Sized, P: SearchParam> UserListPage<A, P> {
    /// Mount the page, reading the initial filter from `param`
    #[must_use]
    pub fn new(client: QueryClient<A>, param: P, params: ListParams) -> Self {
        let search = param.get();
        tracing::debug!(search = %search, "mounting user list");
        Self {
            list: UserListController::new(client, &search, params),
            param,
        }
    }

    /// Filter shown in the editor
    #[inline]
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        self.list.filter()
    }

    #[inline]
    #[must_use]
    pub fn param(&self) -> &P {
        &self.param
    }

    #[inline]
    #[must_use]
    pub fn list(&self) -> &UserListController<A> {
        &self.list
    }

    #[inline]
    pub fn list_mut(&mut self) -> &mut UserListController<A> {
        &mut self.list
    }

    /// Apply one editor event
    pub fn apply(&mut self, event: FilterEvent) {
        let state = match event {
            FilterEvent::Change(state) => state,
            FilterEvent::Reset => FilterState::default(),
        };
        if let Err(reason) = state.check_round_trip() {
            tracing::warn!(%reason, "filter will not read back unchanged");
        }

        let search = encode(&state);
        self.param.set(&search);
        self.list.set_search(&search);
    }

    /// Apply every event already queued, returning how many were applied
    pub fn drain(&mut self, events: &mut UnboundedReceiver<FilterEvent>) -> usize {
        let mut applied = 0;
        while let Ok(event) = events.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Fetch the displayed page and warm the next one
    pub async fn sync(&mut self) -> (FetchOutcome, PrefetchOutcome) {
        self.list.sync().await
    }

    /// Advance to the prefetched page, if there is one
    pub fn next_page(&mut self) -> bool {
        let next = self.list.next_cursor().to_string();
        if next.is_empty() {
            return false;
        }
        self.list.on_cursor_change(&next);
        true
    }
}
