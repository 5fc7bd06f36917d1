//! Supported-input diagnostics for the filter codec

/// Why a [`FilterState`](crate::FilterState) falls outside the set of states
/// that survive `decode(encode(state))` unchanged.
///
/// Decoding never fails; these are reported so callers can refuse or warn
/// before persisting a search that would read back differently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedInput {
    /// A field contains whitespace, which splits segments
    #[error("{field} contains whitespace")]
    Whitespace { field: &'static str },

    /// A field contains the literal phone prefix
    #[error("{field} contains the reserved text 'phone='")]
    PhonePrefix { field: &'static str },

    /// The label key contains '=' and would be split early
    #[error("label key contains '='")]
    KeyDelimiter,

    /// The label key ends in '!' and would read back as a negated match
    #[error("label key ends with '!'")]
    KeyNegation,

    /// A label value was set without a label key
    #[error("label value set without a label key")]
    ValueWithoutKey,
}
