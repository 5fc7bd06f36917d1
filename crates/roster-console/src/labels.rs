//! User label list and the create / edit / delete dialogs
//!
//! All three dialogs submit the `setLabel` mutation. On success the dialog
//! closes and every cached query holding users is invalidated; on failure it
//! stays open and exposes the errors for display.

use roster_query::{
    ApiError, DirectoryApi, Label, QueryClient, SetLabelInput, Target, USER_TYPENAME,
};
use std::cmp::Ordering;
use std::sync::Arc;

/// Shown when a user has no labels
pub const EMPTY_MESSAGE: &str = "No labels exist for this user.";

/// Order labels by key ignoring case, ties broken by exact key
pub fn sort_labels(labels: &mut [Label]) {
    labels.sort_by(|a, b| compare_keys(&a.key, &b.key));
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Which dialog is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    Create,
    Edit { key: String },
    Delete { key: String },
}

/// Dialog lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStatus {
    Open,
    Submitting,
    Closed,
}

/// Label dialog state
#[derive(Debug)]
pub struct LabelDialog<A: ?Sized> {
    client: QueryClient<A>,
    user_id: String,
    kind: DialogKind,
    form: Label,
    touched: bool,
    status: DialogStatus,
    error: Option<ApiError>,
}

impl<A: DirectoryApi + ?Sized> LabelDialog<A> {
    fn open(client: QueryClient<A>, user_id: &str, kind: DialogKind, form: Label) -> Self {
        Self {
            client,
            user_id: user_id.to_string(),
            kind,
            form,
            touched: false,
            status: DialogStatus::Open,
            error: None,
        }
    }

    /// Dialog setting a new label
    #[must_use]
    pub fn create(client: QueryClient<A>, user_id: &str) -> Self {
        Self::open(client, user_id, DialogKind::Create, Label::default())
    }

    /// Dialog changing the value of `key`
    #[must_use]
    pub fn edit(client: QueryClient<A>, user_id: &str, key: &str, current: &str) -> Self {
        let kind = DialogKind::Edit {
            key: key.to_string(),
        };
        Self::open(client, user_id, kind, Label::new(key, current))
    }

    /// Edit dialog prefilled from the user's current labels
    ///
    /// # Errors
    /// Returns the lookup error if the user's labels cannot be loaded.
    pub async fn edit_current(
        client: QueryClient<A>,
        user_id: &str,
        key: &str,
    ) -> Result<Self, ApiError> {
        let labels = client.user_labels(user_id).await?;
        let current = labels
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.value.clone())
            .unwrap_or_default();
        Ok(Self::edit(client, user_id, key, &current))
    }

    /// Confirmation dialog removing `key`
    #[must_use]
    pub fn delete(client: QueryClient<A>, user_id: &str, key: &str) -> Self {
        let kind = DialogKind::Delete {
            key: key.to_string(),
        };
        Self::open(client, user_id, kind, Label::new(key, ""))
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &DialogKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> DialogStatus {
        self.status
    }

    /// Form contents
    #[inline]
    #[must_use]
    pub fn form(&self) -> &Label {
        &self.form
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.kind {
            DialogKind::Create => "Set Label Value",
            DialogKind::Edit { .. } => "Update Label Value",
            DialogKind::Delete { .. } => "Are you sure?",
        }
    }

    #[must_use]
    pub fn subtitle(&self) -> Option<String> {
        match &self.kind {
            DialogKind::Delete { key } => Some(format!("This will delete the label: {key}")),
            _ => None,
        }
    }

    /// Edit the key; only a create dialog has an editable key
    pub fn set_key(&mut self, key: &str) {
        if self.kind == DialogKind::Create {
            self.form.key = key.to_string();
            self.touched = true;
        }
    }

    /// Edit the value; a delete dialog has no form
    pub fn set_value(&mut self, value: &str) {
        if !matches!(self.kind, DialogKind::Delete { .. }) {
            self.form.value = value.to_string();
            self.touched = true;
        }
    }

    /// Errors not tied to a form field
    #[must_use]
    pub fn non_field_errors(&self) -> Vec<String> {
        self.error
            .as_ref()
            .map(ApiError::non_field_errors)
            .unwrap_or_default()
    }

    /// Error for one form field; a delete dialog shows none
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        if matches!(self.kind, DialogKind::Delete { .. }) {
            return None;
        }
        self.error.as_ref().and_then(|err| err.field_error(field))
    }

    /// Close without submitting
    pub fn cancel(&mut self) {
        self.status = DialogStatus::Closed;
    }

    fn mutation(&self) -> SetLabelInput {
        let (key, value) = match &self.kind {
            DialogKind::Create => (self.form.key.clone(), self.form.value.clone()),
            DialogKind::Edit { key } => (key.clone(), self.form.value.clone()),
            DialogKind::Delete { key } => (key.clone(), String::new()),
        };
        SetLabelInput {
            key,
            value,
            target: Target::user(self.user_id.clone()),
        }
    }

    /// Submit the form
    ///
    /// An untouched edit dialog closes without a mutation.
    pub async fn submit(&mut self) -> DialogStatus {
        if self.status != DialogStatus::Open {
            return self.status;
        }
        if matches!(self.kind, DialogKind::Edit { .. }) && !self.touched {
            self.status = DialogStatus::Closed;
            return self.status;
        }

        let input = self.mutation();
        self.status = DialogStatus::Submitting;
        match self.client.set_label(&input, &[USER_TYPENAME]).await {
            Ok(()) => {
                self.error = None;
                self.status = DialogStatus::Closed;
            }
            Err(err) => {
                self.error = Some(err);
                self.status = DialogStatus::Open;
            }
        }
        self.status
    }
}

/// Labels of one user, sorted for display
#[derive(Debug)]
pub struct UserLabelList<A: ?Sized> {
    client: QueryClient<A>,
    user_id: String,
    labels: Vec<Label>,
}

impl<A: DirectoryApi + ?Sized> UserLabelList<A> {
    /// Fetch the user's labels
    ///
    /// # Errors
    /// Returns the lookup error.
    pub async fn load(client: QueryClient<A>, user_id: &str) -> Result<Self, ApiError> {
        let labels = Self::fetch(&client, user_id).await?;
        Ok(Self {
            client,
            user_id: user_id.to_string(),
            labels,
        })
    }

    async fn fetch(client: &QueryClient<A>, user_id: &str) -> Result<Vec<Label>, ApiError> {
        let fetched: Arc<Vec<Label>> = client.user_labels(user_id).await?;
        let mut labels = fetched.as_ref().clone();
        sort_labels(&mut labels);
        Ok(labels)
    }

    /// Fetch again, cache first
    ///
    /// # Errors
    /// Returns the lookup error; the shown labels are kept.
    pub async fn reload(&mut self) -> Result<(), ApiError> {
        self.labels = Self::fetch(&self.client, &self.user_id).await?;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Placeholder text when there is nothing to list
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.labels.is_empty().then_some(EMPTY_MESSAGE)
    }

    #[must_use]
    pub fn create_dialog(&self) -> LabelDialog<A> {
        LabelDialog::create(self.client.clone(), &self.user_id)
    }

    /// Edit dialog for a listed label
    #[must_use]
    pub fn edit_dialog(&self, key: &str) -> Option<LabelDialog<A>> {
        self.labels
            .iter()
            .find(|l| l.key == key)
            .map(|l| LabelDialog::edit(self.client.clone(), &self.user_id, key, &l.value))
    }

    /// Delete dialog for a listed label
    #[must_use]
    pub fn delete_dialog(&self, key: &str) -> Option<LabelDialog<A>> {
        self.labels
            .iter()
            .any(|l| l.key == key)
            .then(|| LabelDialog::delete(self.client.clone(), &self.user_id, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(labels: &[Label]) -> Vec<&str> {
        labels.iter().map(|l| l.key.as_str()).collect()
    }

    #[test]
    fn sort_ignores_case_then_breaks_ties() {
        let mut labels = vec![
            Label::new("b/x", "1"),
            Label::new("A/x", "2"),
            Label::new("a/x", "3"),
            Label::new("C/x", "4"),
        ];
        sort_labels(&mut labels);
        assert_eq!(keys(&labels), vec!["A/x", "a/x", "b/x", "C/x"]);
    }

    #[test]
    fn compare_is_total_on_equal_keys() {
        assert_eq!(compare_keys("a/b", "a/b"), Ordering::Equal);
    }
}
