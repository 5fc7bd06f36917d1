//! Structured filter state
//!
//! [`FilterState`] is the UI-facing shape of a user search: one label
//! key/value pair and one phone fragment.

use crate::codec::{self, PHONE_PREFIX};
use crate::error::UnsupportedInput;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Structured search filter
///
/// `label_value` only carries meaning while `label_key` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Selected label key, empty if unset
    pub label_key: String,
    /// Selected label value
    pub label_value: String,
    /// Free-text phone search fragment
    pub phone_number: String,
}

impl FilterState {
    /// Create state from all three fields
    #[inline]
    #[must_use]
    pub fn new(
        label_key: impl Into<String>,
        label_value: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            label_key: label_key.into(),
            label_value: label_value.into(),
            phone_number: phone_number.into(),
        }
    }

    /// State filtering on a label only
    #[inline]
    #[must_use]
    pub fn label(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, value, "")
    }

    /// State filtering on a phone fragment only
    #[inline]
    #[must_use]
    pub fn phone(phone_number: impl Into<String>) -> Self {
        Self::new("", "", phone_number)
    }

    /// True when no dimension is set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label_key.is_empty() && self.phone_number.is_empty()
    }

    /// True when a label key is selected
    #[inline]
    #[must_use]
    pub fn has_label(&self) -> bool {
        !self.label_key.is_empty()
    }

    /// Copy with the stray value of a keyless state cleared
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.label_key.is_empty() {
            self.label_value.clear();
        }
        self
    }

    /// The label segment alone (`key=value`), empty without a key
    #[must_use]
    pub fn label_search(&self) -> String {
        if self.label_key.is_empty() {
            String::new()
        } else {
            format!("{}={}", self.label_key, self.label_value)
        }
    }

    /// Check that this state reads back unchanged after encoding
    ///
    /// # Errors
    /// Returns the first [`UnsupportedInput`] found, checking the key, then
    /// the value, then the phone fragment.
    pub fn check_round_trip(&self) -> Result<(), UnsupportedInput> {
        let fields = [
            ("labelKey", self.label_key.as_str()),
            ("labelValue", self.label_value.as_str()),
            ("phoneNumber", self.phone_number.as_str()),
        ];
        for (field, text) in fields {
            if text.chars().any(char::is_whitespace) {
                return Err(UnsupportedInput::Whitespace { field });
            }
            if text.contains(PHONE_PREFIX) {
                return Err(UnsupportedInput::PhonePrefix { field });
            }
        }

        // "myphone" + "=" spells the prefix across the delimiter
        if self.label_search().contains(PHONE_PREFIX) {
            return Err(UnsupportedInput::PhonePrefix { field: "labelKey" });
        }
        if self.label_key.contains('=') {
            return Err(UnsupportedInput::KeyDelimiter);
        }
        if self.label_key.ends_with('!') {
            return Err(UnsupportedInput::KeyNegation);
        }
        if self.label_key.is_empty() && !self.label_value.is_empty() {
            return Err(UnsupportedInput::ValueWithoutKey);
        }

        Ok(())
    }
}

impl Display for FilterState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode(self))
    }
}

impl From<&str> for FilterState {
    fn from(search: &str) -> Self {
        codec::decode(search)
    }
}

impl FromStr for FilterState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(codec::decode(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let state = FilterState::default();
        assert!(state.is_empty());
        assert!(!state.has_label());
        assert_eq!(state.label_search(), "");
    }

    #[test]
    fn label_search_includes_empty_value() {
        let state = FilterState::label("team", "");
        assert_eq!(state.label_search(), "team=");
    }

    #[test]
    fn normalized_clears_keyless_value() {
        let state = FilterState::new("", "orphan", "555").normalized();
        assert_eq!(state, FilterState::phone("555"));

        let kept = FilterState::label("team", "ops").normalized();
        assert_eq!(kept.label_value, "ops");
    }

    #[test]
    fn check_round_trip_accepts_plain_state() {
        assert!(FilterState::new("team/dept", "a=b", "+1555").check_round_trip().is_ok());
        assert!(FilterState::default().check_round_trip().is_ok());
    }

    #[test]
    fn check_round_trip_reports_each_violation() {
        assert_eq!(
            FilterState::phone("555 1234").check_round_trip(),
            Err(UnsupportedInput::Whitespace {
                field: "phoneNumber"
            })
        );
        assert_eq!(
            FilterState::label("x", "phone=1").check_round_trip(),
            Err(UnsupportedInput::PhonePrefix {
                field: "labelValue"
            })
        );
        assert_eq!(
            FilterState::label("myphone", "1").check_round_trip(),
            Err(UnsupportedInput::PhonePrefix { field: "labelKey" })
        );
        assert_eq!(
            FilterState::label("a=b", "c").check_round_trip(),
            Err(UnsupportedInput::KeyDelimiter)
        );
        assert_eq!(
            FilterState::label("team!", "ops").check_round_trip(),
            Err(UnsupportedInput::KeyNegation)
        );
        assert_eq!(
            FilterState::label("", "ops").check_round_trip(),
            Err(UnsupportedInput::ValueWithoutKey)
        );
    }

    #[test]
    fn display_and_from_str_use_the_codec() {
        let state: FilterState = "team=ops phone=5551234".parse().unwrap();
        assert_eq!(state, FilterState::new("team", "ops", "5551234"));
        assert_eq!(state.to_string(), "team=ops phone=5551234");
        assert_eq!(FilterState::from("phone=1"), FilterState::phone("1"));
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_value(FilterState::new("k", "v", "1")).unwrap();
        assert_eq!(json["labelKey"], "k");
        assert_eq!(json["labelValue"], "v");
        assert_eq!(json["phoneNumber"], "1");
    }
}
