//! Roster Filter Codec
//!
//! Serializes the independent user-search filter dimensions into one search
//! string and parses that string back into structured state.
//!
//! # Grammar
//!
//! ```text
//! search  := [label] [" " phone]
//! label   := key "!"* "=" value   (the first "=" delimits)
//! phone   := "phone=" fragment    (fragment runs to the next whitespace)
//! ```
//!
//! # Example
//!
//! ```rust
//! use roster_filter::{decode, encode, FilterState};
//!
//! let state = FilterState::new("team", "ops", "5551234");
//! let search = encode(&state);
//! assert_eq!(search, "team=ops phone=5551234");
//! assert_eq!(decode(&search), state);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod codec;
mod error;
mod state;

// Re-exports
pub use codec::{decode, encode, PHONE_PREFIX};
pub use error::UnsupportedInput;
pub use state::FilterState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
