//! Roster Query
//!
//! Directory query plumbing for the user console:
//! - [`DirectoryApi`]: the remote request/response seam
//! - [`QueryCache`] / [`QueryClient`]: cache-first queries, typename invalidation
//! - [`UserListController`]: cursor pagination with one page of read-ahead
//!
//! # Example
//!
//! ```rust,ignore
//! use roster_query::{ListParams, QueryClient, UserListController};
//!
//! # async fn example(api: std::sync::Arc<impl roster_query::DirectoryApi>) {
//! let client = QueryClient::new(api);
//! let mut list = UserListController::new(client, "team=ops phone=555", ListParams::default());
//!
//! list.sync().await;
//! for user in list.items() {
//!     println!("{} <{}>", user.name, user.email);
//! }
//!
//! // next page was prefetched; this is served from cache
//! let next = list.next_cursor().to_string();
//! list.on_cursor_change(&next);
//! list.sync().await;
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod api;
pub mod cache;
pub mod client;
pub mod error;
pub mod pager;
pub mod types;

// Re-exports for convenience
pub use api::DirectoryApi;
pub use cache::{CacheStats, CachedResult, QueryCache, QueryKey, LABEL_TYPENAME, USER_TYPENAME};
pub use client::QueryClient;
pub use error::{ApiError, FieldError};
pub use pager::{FetchOutcome, ListParams, PrefetchOutcome, PrimaryRequest, UserListController};
pub use types::{
    Connection, Label, LabelKeySearchOptions, LabelValueSearchOptions, PageInfo, SetLabelInput,
    Target, TargetType, UserSearchOptions, UserSummary,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with directory queries
    pub use crate::{
        ApiError, DirectoryApi, ListParams, QueryClient, UserListController, UserSearchOptions,
        UserSummary,
    };
    pub use roster_filter::{decode, encode, FilterState};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
