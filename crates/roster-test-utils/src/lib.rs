//! Testing utilities for Roster workspace
//!
//! [`MemoryDirectory`] is an in-memory [`DirectoryApi`] with the label
//! semantics of the real directory (upsert, delete on empty value, key
//! format validation) plus request recording and fault injection.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use roster_query::{
    ApiError, Connection, DirectoryApi, Label, LabelKeySearchOptions, LabelValueSearchOptions,
    PageInfo, SetLabelInput, TargetType, UserSearchOptions, UserSummary,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

const CURSOR_PREFIX: &str = "cursor-";

/// A stored user
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_favorite: bool,
    pub phones: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

impl UserRecord {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            is_favorite: false,
            phones: Vec::new(),
            labels: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phones.push(phone.to_string());
        self
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            is_favorite: self.is_favorite,
        }
    }
}

/// A request received by the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Users(UserSearchOptions),
    LabelKeys(LabelKeySearchOptions),
    LabelValues(LabelValueSearchOptions),
    UserLabels(String),
    SetLabel(SetLabelInput),
}

/// In-memory directory
#[derive(Debug)]
pub struct MemoryDirectory {
    users: Mutex<Vec<UserRecord>>,
    requests: Mutex<Vec<Request>>,
    failing_cursors: Mutex<HashMap<String, ApiError>>,
    next_set_label_error: Mutex<Option<ApiError>>,
    page_size: usize,
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new(10)
    }
}

impl MemoryDirectory {
    pub fn new(page_size: usize) -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            failing_cursors: Mutex::new(HashMap::new()),
            next_set_label_error: Mutex::new(None),
            page_size: page_size.max(1),
        }
    }

    /// Store a user, returning its id
    pub fn insert(&self, user: UserRecord) -> String {
        let id = user.id.clone();
        self.users.lock().push(user);
        id
    }

    /// Current labels of a user, straight from storage
    pub fn labels_of(&self, user_id: &str) -> Option<BTreeMap<String, String>> {
        self.users
            .lock()
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.labels.clone())
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// `users` requests received so far
    pub fn user_requests(&self) -> Vec<UserSearchOptions> {
        self.requests
            .lock()
            .iter()
            .filter_map(|r| match r {
                Request::Users(input) => Some(input.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded requests
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    /// Fail every `users` request positioned at `cursor`
    pub fn fail_users_at(&self, cursor: &str, error: ApiError) {
        self.failing_cursors.lock().insert(cursor.to_string(), error);
    }

    /// Fail the next `setLabel` mutation
    pub fn fail_next_set_label(&self, error: ApiError) {
        *self.next_set_label_error.lock() = Some(error);
    }

    fn record(&self, request: Request) {
        self.requests.lock().push(request);
    }
}

/// Label clause of a user search (`key=value`, `key!=value`)
struct LabelClause {
    key: String,
    negate: bool,
    value: String,
}

impl LabelClause {
    fn parse(search: &str) -> Option<Self> {
        let eq = search.find('=')?;
        let (key, negate) = match search[..eq].strip_suffix('!') {
            Some(key) => (key, true),
            None => (&search[..eq], false),
        };
        Some(Self {
            key: key.to_string(),
            negate,
            value: search[eq + 1..].to_string(),
        })
    }

    fn matches(&self, user: &UserRecord) -> bool {
        let hit = match user.labels.get(&self.key) {
            Some(value) => self.value.is_empty() || self.value == "*" || *value == self.value,
            None => false,
        };
        hit != self.negate
    }
}

fn parse_cursor(after: &str) -> Result<usize, ApiError> {
    if after.is_empty() {
        return Ok(0);
    }
    after
        .strip_prefix(CURSOR_PREFIX)
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| ApiError::rejected(format!("invalid cursor: {after}")))
}

fn validate_key(key: &str) -> Result<(), ApiError> {
    let valid_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    let valid = match key.split_once('/') {
        Some((prefix, name)) => {
            !prefix.is_empty()
                && !name.is_empty()
                && prefix.chars().all(valid_char)
                && name.chars().all(|c| valid_char(c) || c == '/')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ApiError::field("key", "must be in the format prefix/name"))
    }
}

#[async_trait]
impl DirectoryApi for MemoryDirectory {
    async fn users(&self, input: &UserSearchOptions) -> Result<Connection<UserSummary>, ApiError> {
        self.record(Request::Users(input.clone()));
        if let Some(err) = self.failing_cursors.lock().get(&input.after) {
            return Err(err.clone());
        }

        let clause = if input.search.is_empty() {
            None
        } else {
            Some(
                LabelClause::parse(&input.search)
                    .ok_or_else(|| ApiError::field("search", "expected key=value"))?,
            )
        };

        let users = self.users.lock();
        let mut matched: Vec<&UserRecord> = users
            .iter()
            .filter(|u| clause.as_ref().map_or(true, |c| c.matches(u)))
            .filter(|u| {
                input.cm_value.is_empty() || u.phones.iter().any(|p| p.contains(&input.cm_value))
            })
            .collect();
        matched.sort_by(|a, b| {
            let favorites = if input.favorites_first {
                b.is_favorite.cmp(&a.is_favorite)
            } else {
                std::cmp::Ordering::Equal
            };
            favorites.then_with(|| a.name.cmp(&b.name))
        });

        let start = parse_cursor(&input.after)?.min(matched.len());
        let size = input
            .first
            .map_or(self.page_size, |n| usize::try_from(n).unwrap_or(usize::MAX))
            .max(1);
        let end = start.saturating_add(size).min(matched.len());

        Ok(Connection::new(
            matched[start..end].iter().map(|u| u.summary()).collect(),
            PageInfo {
                has_next_page: end < matched.len(),
                end_cursor: format!("{CURSOR_PREFIX}{end}"),
            },
        ))
    }

    async fn label_keys(&self, input: &LabelKeySearchOptions) -> Result<Vec<String>, ApiError> {
        self.record(Request::LabelKeys(input.clone()));
        if input.target_type == Some(TargetType::Service) {
            return Ok(Vec::new());
        }

        let needle = input.search.as_deref().unwrap_or("").to_lowercase();
        let keys: BTreeSet<String> = self
            .users
            .lock()
            .iter()
            .flat_map(|u| u.labels.keys().cloned())
            .filter(|k| k.to_lowercase().contains(&needle))
            .collect();
        Ok(keys.into_iter().collect())
    }

    async fn label_values(
        &self,
        input: &LabelValueSearchOptions,
    ) -> Result<Vec<String>, ApiError> {
        self.record(Request::LabelValues(input.clone()));
        if input.key.is_empty() {
            return Err(ApiError::field("key", "required"));
        }

        let needle = input.search.as_deref().unwrap_or("").to_lowercase();
        let values: BTreeSet<String> = self
            .users
            .lock()
            .iter()
            .filter_map(|u| u.labels.get(&input.key).cloned())
            .filter(|v| v.to_lowercase().contains(&needle))
            .collect();
        Ok(values.into_iter().collect())
    }

    async fn user_labels(&self, user_id: &str) -> Result<Vec<Label>, ApiError> {
        self.record(Request::UserLabels(user_id.to_string()));
        self.labels_of(user_id)
            .map(|labels| {
                labels
                    .into_iter()
                    .map(|(key, value)| Label { key, value })
                    .collect()
            })
            .ok_or_else(|| ApiError::NotFound(format!("user {user_id}")))
    }

    async fn set_label(&self, input: &SetLabelInput) -> Result<(), ApiError> {
        self.record(Request::SetLabel(input.clone()));
        if let Some(err) = self.next_set_label_error.lock().take() {
            return Err(err);
        }
        if input.target.kind != TargetType::User {
            return Err(ApiError::rejected(format!(
                "unsupported target type for label: {}",
                input.target.kind
            )));
        }
        validate_key(&input.key)?;

        let mut users = self.users.lock();
        let user = users
            .iter_mut()
            .find(|u| u.id == input.target.id)
            .ok_or_else(|| ApiError::NotFound(format!("user {}", input.target.id)))?;

        if input.is_delete() {
            user.labels.remove(&input.key);
        } else {
            user.labels.insert(input.key.clone(), input.value.clone());
        }
        Ok(())
    }
}

/// Directory of `count` users named `User 00`, `User 01`, ...
///
/// Even users carry `team/dept=ops`, odd users `team/dept=dev`; every user
/// has phone `+1555000NN`.
pub fn seeded_directory(count: usize, page_size: usize) -> MemoryDirectory {
    let directory = MemoryDirectory::new(page_size);
    for i in 0..count {
        let dept = if i % 2 == 0 { "ops" } else { "dev" };
        directory.insert(
            UserRecord::new(&format!("User {i:02}"), &format!("user{i}@example.com"))
                .with_id(&format!("u{i:02}"))
                .with_phone(&format!("+1555000{i:02}"))
                .with_label("team/dept", dept),
        );
    }
    directory
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_query::Target;

    #[tokio::test]
    async fn pages_through_matching_users() {
        let dir = seeded_directory(5, 2);
        let first = dir
            .users(&UserSearchOptions::default())
            .await
            .unwrap();
        assert_eq!(first.nodes.len(), 2);
        assert!(first.page_info.has_next_page);

        let last = dir
            .users(&UserSearchOptions {
                after: "cursor-4".to_string(),
                ..UserSearchOptions::default()
            })
            .await
            .unwrap();
        assert_eq!(last.nodes.len(), 1);
        assert!(!last.page_info.has_next_page);
    }

    #[tokio::test]
    async fn filters_by_label_and_phone() {
        let dir = seeded_directory(6, 10);
        let ops = dir
            .users(&UserSearchOptions {
                search: "team/dept=ops".to_string(),
                ..UserSearchOptions::default()
            })
            .await
            .unwrap();
        assert_eq!(ops.nodes.len(), 3);

        let not_ops = dir
            .users(&UserSearchOptions {
                search: "team/dept!=ops".to_string(),
                cm_value: "00001".to_string(),
                ..UserSearchOptions::default()
            })
            .await
            .unwrap();
        assert_eq!(not_ops.nodes.len(), 1);
        assert_eq!(not_ops.nodes[0].id, "u01");
    }

    #[tokio::test]
    async fn set_label_upserts_and_deletes() {
        let dir = seeded_directory(1, 10);
        let set = |value: &str| SetLabelInput {
            key: "org/team".to_string(),
            value: value.to_string(),
            target: Target::user("u00"),
        };

        dir.set_label(&set("backend")).await.unwrap();
        assert_eq!(
            dir.labels_of("u00").unwrap().get("org/team").map(String::as_str),
            Some("backend")
        );

        dir.set_label(&set("")).await.unwrap();
        assert!(!dir.labels_of("u00").unwrap().contains_key("org/team"));
    }

    #[tokio::test]
    async fn set_label_rejects_bad_key() {
        let dir = seeded_directory(1, 10);
        let err = dir
            .set_label(&SetLabelInput {
                key: "noprefix".to_string(),
                value: "x".to_string(),
                target: Target::user("u00"),
            })
            .await
            .unwrap_err();
        assert!(err.field_error("key").is_some());
    }
}
