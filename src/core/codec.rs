//! Purpose: Define the field codec abstraction used to bind JSON values to typed scalars.
//! Exports: `FieldCodec`, `CodecSet`.
//! Role: Seam between raw JSON field values and the scalar types in `timestamp`/`list`.
//! Invariants: `decode` checks run in order: JSON string, non-empty, then `parse`.
//! Invariants: `parse(format(v)) == v` for every value a codec produced.

use serde_json::Value;

use crate::core::error::Error;
use crate::core::failure::FieldFailure;
use crate::core::list::ListCodec;
use crate::core::timestamp::TimestampCodec;

pub trait FieldCodec {
    type Value;

    /// Reason reported when the raw JSON value is not a string.
    fn type_reason(&self) -> &'static str;

    fn parse(&self, text: &str) -> Result<Self::Value, FieldFailure>;

    fn format(&self, value: &Self::Value) -> Result<String, Error>;

    fn validate<'a>(&self, raw: &'a Value) -> Result<&'a str, FieldFailure> {
        let Some(text) = raw.as_str() else {
            return Err(FieldFailure::invalid_type(self.type_reason()));
        };
        if text.is_empty() {
            return Err(FieldFailure::empty_value());
        }
        Ok(text)
    }

    fn decode(&self, raw: &Value) -> Result<Self::Value, FieldFailure> {
        let text = self.validate(raw)?;
        self.parse(text)
    }

    fn encode(&self, value: &Self::Value) -> Result<Value, Error> {
        self.format(value).map(Value::String)
    }
}

/// Process-wide codec descriptors, built once before serving and shared read-only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CodecSet {
    pub timestamp: TimestampCodec,
    pub list: ListCodec,
}

impl CodecSet {
    pub const fn new() -> Self {
        Self {
            timestamp: TimestampCodec::new(),
            list: ListCodec::new(','),
        }
    }
}

impl Default for CodecSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{CodecSet, FieldCodec};
    use crate::core::failure::FailureKind;
    use serde_json::json;

    #[test]
    fn validate_rejects_non_strings_before_emptiness() {
        let codecs = CodecSet::default();
        for raw in [json!(null), json!(1), json!(false), json!([]), json!({})] {
            let failure = codecs.list.validate(&raw).expect_err("non-string");
            assert_eq!(failure.kind(), FailureKind::InvalidType);
        }
    }

    #[test]
    fn encode_wraps_formatted_text_in_json_string() {
        let codecs = CodecSet::default();
        let value = codecs.list.decode(&json!("a,b")).expect("decode");
        assert_eq!(codecs.list.encode(&value).expect("encode"), json!("a,b"));
    }
}
