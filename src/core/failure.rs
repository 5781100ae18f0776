//! Purpose: Model client-caused field validation failures.
//! Exports: `FieldFailure`, `FailureKind`, shared reason strings.
//! Role: The only value a codec returns to reject input; mapped to 400 at the server edge.
//! Invariants: Reason text is sent to clients verbatim and must stay stable.
//! Invariants: Never used for I/O or other infrastructure faults (see `core::error`).

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

pub const REASON_EMPTY: &str = "must not be empty";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    InvalidType,
    EmptyValue,
    FormatMismatch,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldFailure {
    kind: FailureKind,
    reason: Cow<'static, str>,
    field: Option<String>,
}

impl FieldFailure {
    pub fn new(kind: FailureKind, reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            field: None,
        }
    }

    pub fn invalid_type(reason: &'static str) -> Self {
        Self::new(FailureKind::InvalidType, reason)
    }

    pub fn empty_value() -> Self {
        Self::new(FailureKind::EmptyValue, REASON_EMPTY)
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Name of the request field that failed, when the decode pipeline knows it.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl StdError for FieldFailure {}

#[cfg(test)]
mod tests {
    use super::{FailureKind, FieldFailure, REASON_EMPTY};

    #[test]
    fn empty_value_uses_shared_reason() {
        let failure = FieldFailure::empty_value();
        assert_eq!(failure.kind(), FailureKind::EmptyValue);
        assert_eq!(failure.reason(), REASON_EMPTY);
        assert_eq!(failure.field(), None);
    }

    #[test]
    fn field_name_is_kept_out_of_reason() {
        let failure = FieldFailure::invalid_type("not a valid string").with_field("time_at");
        assert_eq!(failure.reason(), "not a valid string");
        assert_eq!(failure.field(), Some("time_at"));
        assert_eq!(failure.to_string(), "time_at: not a valid string");
    }
}
