//! Remote directory API seam
//!
//! The console never talks to a transport directly; everything goes through
//! [`DirectoryApi`], so the request/response client can be swapped for an
//! in-memory directory in tests.

use crate::error::ApiError;
use crate::types::{
    Connection, Label, LabelKeySearchOptions, LabelValueSearchOptions, SetLabelInput,
    UserSearchOptions, UserSummary,
};
use async_trait::async_trait;

/// Request/response capability of the remote directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// One page of users matching the search
    async fn users(&self, input: &UserSearchOptions) -> Result<Connection<UserSummary>, ApiError>;

    /// Distinct label keys, optionally narrowed by a search fragment
    async fn label_keys(&self, input: &LabelKeySearchOptions) -> Result<Vec<String>, ApiError>;

    /// Distinct values recorded under one label key
    async fn label_values(
        &self,
        input: &LabelValueSearchOptions,
    ) -> Result<Vec<String>, ApiError>;

    /// All labels attached to one user
    async fn user_labels(&self, user_id: &str) -> Result<Vec<Label>, ApiError>;

    /// Set, update or (with an empty value) delete a label
    async fn set_label(&self, input: &SetLabelInput) -> Result<(), ApiError>;
}
