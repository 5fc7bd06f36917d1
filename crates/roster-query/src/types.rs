//! Wire types for the directory API
//!
//! Only the fields the console consumes are modelled. Field names follow the
//! remote schema (`favoritesFirst`, `CMValue`, `hasNextPage`, ...).

use serde::{Deserialize, Serialize};

/// Input of the paginated `users` query
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchOptions {
    /// Order favorited users before the rest
    pub favorites_first: bool,
    /// Label search (`key=value`), empty for no label filter
    pub search: String,
    /// Contact-method value fragment (phone search)
    #[serde(rename = "CMValue")]
    pub cm_value: String,
    /// Cursor of the page to fetch, empty for the first page
    pub after: String,
    /// Page size, left to the server when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
}

impl UserSearchOptions {
    /// Same search positioned at another cursor
    #[inline]
    #[must_use]
    pub fn at_cursor(&self, after: impl Into<String>) -> Self {
        Self {
            after: after.into(),
            ..self.clone()
        }
    }

    /// Query variables in the `{ "input": { ... } }` envelope
    #[must_use]
    pub fn variables(&self) -> serde_json::Value {
        serde_json::json!({ "input": self })
    }
}

/// Pagination metadata reported with each page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// More records exist after this page
    pub has_next_page: bool,
    /// Cursor of the last record on this page
    pub end_cursor: String,
}

impl PageInfo {
    /// Cursor of the following page, empty when this is the last page
    #[inline]
    #[must_use]
    pub fn next_cursor(&self) -> &str {
        if self.has_next_page {
            &self.end_cursor
        } else {
            ""
        }
    }
}

/// One page of a cursor-paginated collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Create a page
    #[inline]
    #[must_use]
    pub fn new(nodes: Vec<T>, page_info: PageInfo) -> Self {
        Self { nodes, page_info }
    }
}

/// A user row as rendered in the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_favorite: bool,
}

/// Kind of record a label is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    User,
    Service,
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Service => f.write_str("service"),
        }
    }
}

/// Record a label is attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    #[serde(rename = "type")]
    pub kind: TargetType,
    pub id: String,
}

impl Target {
    /// Target a user record
    #[inline]
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: TargetType::User,
            id: id.into(),
        }
    }
}

/// A key/value label
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl Label {
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Input of the `setLabel` mutation
///
/// An empty `value` deletes the label from the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLabelInput {
    pub key: String,
    pub value: String,
    pub target: Target,
}

impl SetLabelInput {
    /// True when this input removes the label
    #[inline]
    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.value.is_empty()
    }
}

/// Input of the `labelKeys` lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelKeySearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,
}

/// Input of the `labelValues` lookup, scoped to one key
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelValueSearchOptions {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,
}
