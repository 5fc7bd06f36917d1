//! Debounced filter editor
//!
//! Label selections propagate immediately. Phone input is echoed locally and
//! propagated once typing pauses for the configured delay (trailing
//! debounce). At most one propagation is pending at any time.

use parking_lot::Mutex;
use roster_filter::FilterState;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Notification sent to the owner of the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// Filter replaced by the given state
    Change(FilterState),
    /// All filters cleared
    Reset,
}

/// Editor input errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("select a label key before choosing a value")]
    LabelKeyRequired,
}

/// Filter editor state
#[derive(Debug)]
pub struct FilterEditor {
    /// Last value known to the owner, updated on every emit and on `set_value`
    value: Arc<Mutex<FilterState>>,
    /// Phone text as typed
    phone_search: String,
    delay: Duration,
    events: UnboundedSender<FilterEvent>,
    pending: Option<JoinHandle<()>>,
}

fn emit(events: &UnboundedSender<FilterEvent>, event: FilterEvent) {
    if events.send(event).is_err() {
        tracing::debug!("filter event receiver closed, dropping event");
    }
}

impl FilterEditor {
    /// Create editor showing `value`
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn new(value: FilterState, delay: Duration, events: UnboundedSender<FilterEvent>) -> Self {
        Self {
            phone_search: value.phone_number.clone(),
            value: Arc::new(Mutex::new(value)),
            delay,
            events,
            pending: None,
        }
    }

    /// Phone text currently shown in the input
    #[inline]
    #[must_use]
    pub fn phone_search(&self) -> &str {
        &self.phone_search
    }

    /// Last value known to the owner
    #[must_use]
    pub fn value(&self) -> FilterState {
        self.value.lock().clone()
    }

    /// The value select is usable only once a key is chosen
    #[must_use]
    pub fn label_value_enabled(&self) -> bool {
        !self.value.lock().label_key.is_empty()
    }

    /// A phone propagation is scheduled and has not fired
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// Phone input keystroke
    ///
    /// Restarts the debounce timer. When it fires, the current label fields
    /// are merged with `text` and propagated.
    pub fn input_phone(&mut self, text: &str) {
        self.phone_search = text.to_string();
        self.cancel_pending();

        let value = Arc::clone(&self.value);
        let events = self.events.clone();
        let delay = self.delay;
        let phone = text.to_string();
        tracing::trace!(phone = %phone, delay = ?delay, "phone filter scheduled");

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let next = {
                let mut current = value.lock();
                current.phone_number = phone;
                current.clone()
            };
            emit(&events, FilterEvent::Change(next));
        }));
    }

    /// External value update
    ///
    /// A phone number that differs from the last one seen replaces the typed
    /// text and cancels any pending propagation.
    pub fn set_value(&mut self, value: FilterState) {
        let phone_changed = {
            let mut current = self.value.lock();
            let changed = current.phone_number != value.phone_number;
            *current = value;
            changed
        };
        if phone_changed {
            self.cancel_pending();
            self.phone_search = self.value.lock().phone_number.clone();
        }
    }

    /// Label key chosen or cleared
    pub fn select_label_key(&mut self, key: Option<String>) {
        let next = {
            let mut current = self.value.lock();
            current.label_key = key.unwrap_or_default();
            if current.label_key.is_empty() {
                current.label_value.clear();
            }
            current.clone()
        };
        emit(&self.events, FilterEvent::Change(next));
    }

    /// Label value chosen or cleared
    ///
    /// # Errors
    /// Returns [`EditorError::LabelKeyRequired`] while no key is selected.
    pub fn select_label_value(&mut self, value: Option<String>) -> Result<(), EditorError> {
        let next = {
            let mut current = self.value.lock();
            if current.label_key.is_empty() {
                return Err(EditorError::LabelKeyRequired);
            }
            current.label_value = value.unwrap_or_default();
            current.clone()
        };
        emit(&self.events, FilterEvent::Change(next));
        Ok(())
    }

    /// Clear every filter
    pub fn reset(&mut self) {
        self.cancel_pending();
        *self.value.lock() = FilterState::default();
        self.phone_search.clear();
        emit(&self.events, FilterEvent::Reset);
    }
}

impl Drop for FilterEditor {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
