//! Encoding and decoding of the compound search string
//!
//! Decoding is total: malformed input degrades to empty fields or text
//! attributed to the wrong field, never to an error.

use crate::state::FilterState;

/// Literal prefix of the phone segment
pub const PHONE_PREFIX: &str = "phone=";

/// Serialize filter state into one search string
///
/// Emits the label segment when a key is set and the phone segment when a
/// phone fragment is set, label first, joined by a single space.
#[must_use]
pub fn encode(state: &FilterState) -> String {
    let label = state.label_search();
    let phone = if state.phone_number.is_empty() {
        String::new()
    } else {
        format!("{PHONE_PREFIX}{}", state.phone_number)
    };

    [label, phone]
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a search string back into filter state
///
/// The phone segment is extracted first, wherever it sits; whatever remains
/// is read as the label segment.
#[must_use]
pub fn decode(input: &str) -> FilterState {
    let (phone_number, remainder) = extract_phone(input);
    let (label_key, label_value) = split_label(remainder.trim()).unwrap_or_default();

    FilterState {
        label_key,
        label_value,
        phone_number,
    }
}

/// Pull the first `phone=<fragment>` out of `input`
///
/// Returns the fragment and the input with the matched text removed.
fn extract_phone(input: &str) -> (String, String) {
    let Some(start) = input.find(PHONE_PREFIX) else {
        return (String::new(), input.to_owned());
    };

    let fragment_start = start + PHONE_PREFIX.len();
    let fragment_end = input[fragment_start..]
        .find(char::is_whitespace)
        .map_or(input.len(), |offset| fragment_start + offset);

    let phone = input[fragment_start..fragment_end].to_owned();
    let remainder = format!("{}{}", &input[..start], &input[fragment_end..]);
    (phone, remainder)
}

/// Split a label segment at its first `=`, dropping any `!` run before it
fn split_label(segment: &str) -> Option<(String, String)> {
    if segment.contains(PHONE_PREFIX) {
        return None;
    }

    let delimiter = segment.find('=')?;
    let key = segment[..delimiter].trim_end_matches('!');
    if key.is_empty() {
        return None;
    }
    // "phone!=x" would re-encode as a phone segment
    if format!("{key}=").ends_with(PHONE_PREFIX) {
        return None;
    }
    Some((key.to_owned(), segment[delimiter + 1..].to_owned()))
}
