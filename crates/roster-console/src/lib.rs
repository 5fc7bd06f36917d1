//! Roster Console
//!
//! State behind the user directory screens:
//! - [`FilterEditor`]: label selects and debounced phone input
//! - [`LabelKeySelect`] / [`LabelValueSelect`]: lookup-backed options
//! - [`UserListPage`]: search parameter, filter events and the paginated list
//! - [`LabelDialog`] / [`UserLabelList`]: label management for one user
//! - [`ConsoleConfig`]: delays, page size and cache sizing
//!
//! # Example
//!
//! ```rust,ignore
//! use roster_console::{ConsoleConfig, FilterEditor, MemorySearchParam, UserListPage};
//! use roster_query::QueryClient;
//!
//! let config = ConsoleConfig::default();
//! let client = QueryClient::with_cache(api, config.build_cache());
//! let mut page = UserListPage::new(client, MemorySearchParam::new(""), config.list_params());
//!
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut editor = FilterEditor::new(page.filter().clone(), config.debounce(), tx);
//! editor.input_phone("555");
//!
//! if let Some(event) = rx.recv().await {
//!     page.apply(event);
//!     page.sync().await;
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod editor;
pub mod labels;
pub mod selection;
pub mod users;

// Re-exports for convenience
pub use config::{ConfigError, ConsoleConfig};
pub use editor::{EditorError, FilterEditor, FilterEvent};
pub use labels::{sort_labels, DialogKind, DialogStatus, LabelDialog, UserLabelList, EMPTY_MESSAGE};
pub use selection::{LabelKeySelect, LabelValueSelect, SelectOption, SelectState};
pub use users::{MemorySearchParam, SearchParam, UserListPage};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for console state
    pub use crate::{
        ConsoleConfig, FilterEditor, FilterEvent, LabelDialog, MemorySearchParam, SearchParam,
        UserListPage,
    };
    pub use roster_filter::FilterState;
    pub use roster_query::{DirectoryApi, QueryClient};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
