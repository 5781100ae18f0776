//! Purpose: Timestamp scalar and its RFC 3339 field codec.
//! Exports: `Timestamp`, `TimestampCodec`, `TIMESTAMP_LAYOUT`.
//! Role: Binds `YYYY-MM-DDTHH:mm:ssZ` strings to an `OffsetDateTime` and back.
//! Invariants: The parsed offset is kept; formatting reproduces it (UTC renders as `Z`).
//! Invariants: Fractional seconds are emitted only when the parsed value had them.
//! Invariants: Only uppercase `T`/`Z` and seconds `00..=59` are accepted; leap seconds are rejected.

use std::fmt;

use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::core::codec::FieldCodec;
use crate::core::error::{Error, ErrorKind};
use crate::core::failure::{FailureKind, FieldFailure};

/// Human-readable layout label used in format-mismatch reasons.
pub const TIMESTAMP_LAYOUT: &str = "YYYY-MM-DDTHH:mm:ssZ";

const REASON_NOT_STRING: &str = "not a valid string";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    pub fn datetime(&self) -> OffsetDateTime {
        self.0
    }

    pub fn offset(&self) -> UtcOffset {
        self.0.offset()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.format(&Rfc3339).map_err(|_| fmt::Error)?)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimestampCodec;

impl TimestampCodec {
    pub const fn new() -> Self {
        Self
    }

    pub fn layout(&self) -> &'static str {
        TIMESTAMP_LAYOUT
    }
}

impl FieldCodec for TimestampCodec {
    type Value = Timestamp;

    fn type_reason(&self) -> &'static str {
        REASON_NOT_STRING
    }

    fn parse(&self, text: &str) -> Result<Timestamp, FieldFailure> {
        let mismatch = || {
            FieldFailure::new(
                FailureKind::FormatMismatch,
                format!("format must be {}", self.layout()),
            )
        };
        if !matches_layout(text.as_bytes()) {
            return Err(mismatch());
        }
        OffsetDateTime::parse(text, &Rfc3339)
            .map(Timestamp)
            .map_err(|_| mismatch())
    }

    fn format(&self, value: &Timestamp) -> Result<String, Error> {
        value.0.format(&Rfc3339).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to format timestamp")
                .with_source(err)
        })
    }
}

// Shape check for `YYYY-MM-DDTHH:mm:ss[.f+](Z|±HH:MM)`; calendar ranges are left to `time`.
fn matches_layout(bytes: &[u8]) -> bool {
    let digits = |range: std::ops::Range<usize>| {
        bytes
            .get(range)
            .is_some_and(|part| part.iter().all(u8::is_ascii_digit))
    };
    let byte_at = |index: usize, expected: u8| bytes.get(index) == Some(&expected);

    let head = digits(0..4)
        && byte_at(4, b'-')
        && digits(5..7)
        && byte_at(7, b'-')
        && digits(8..10)
        && byte_at(10, b'T')
        && digits(11..13)
        && byte_at(13, b':')
        && digits(14..16)
        && byte_at(16, b':')
        && digits(17..19);
    if !head || bytes[17] > b'5' {
        return false;
    }

    let mut rest = &bytes[19..];
    if let Some((b'.', fraction)) = rest.split_first() {
        let len = fraction.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return false;
        }
        rest = &fraction[len..];
    }

    match rest {
        [b'Z'] => true,
        [b'+' | b'-', h1, h2, b':', m1, m2] => {
            [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{TIMESTAMP_LAYOUT, TimestampCodec};
    use crate::core::codec::FieldCodec;
    use crate::core::failure::FailureKind;
    use serde_json::json;
    use time::UtcOffset;

    #[test]
    fn decode_keeps_original_offset() {
        let codec = TimestampCodec::new();
        let value = codec
            .decode(&json!("2020-01-01T02:02:05+07:00"))
            .expect("valid timestamp");
        assert_eq!(
            value.offset(),
            UtcOffset::from_hms(7, 0, 0).expect("offset")
        );
        assert_eq!(
            codec.format(&value).expect("format"),
            "2020-01-01T02:02:05+07:00"
        );
        assert_eq!(value.to_string(), "2020-01-01T02:02:05+07:00");
    }

    #[test]
    fn round_trip_law_holds_for_conforming_inputs() {
        let codec = TimestampCodec::new();
        let inputs = [
            "2020-01-01T02:02:05+07:00",
            "2020-01-01T02:02:05Z",
            "1999-12-31T23:59:59-03:30",
            "2024-02-29T12:00:00.125+01:00",
            "0001-01-01T00:00:00Z",
        ];
        for input in inputs {
            let value = codec.parse(input).expect("parse");
            let text = codec.format(&value).expect("format");
            assert_eq!(text, input);
            assert_eq!(value.to_string(), text);
            let again = codec.parse(&text).expect("reparse");
            assert_eq!(again, value);
            assert_eq!(again.offset(), value.offset());
        }
    }

    #[test]
    fn zero_offset_renders_as_z() {
        let codec = TimestampCodec::new();
        let value = codec.parse("2020-01-01T02:02:05+00:00").expect("parse");
        assert_eq!(codec.format(&value).expect("format"), "2020-01-01T02:02:05Z");
    }

    #[test]
    fn non_string_values_are_invalid_type() {
        let codec = TimestampCodec::new();
        for raw in [
            json!(true),
            json!(false),
            json!(null),
            json!(1577844125),
            json!(1.5),
            json!(["2020-01-01T02:02:05Z"]),
            json!({"at": "2020-01-01T02:02:05Z"}),
        ] {
            let failure = codec.decode(&raw).expect_err("non-string");
            assert_eq!(failure.kind(), FailureKind::InvalidType);
            assert_eq!(failure.reason(), "not a valid string");
        }
    }

    #[test]
    fn empty_string_is_empty_value() {
        let failure = TimestampCodec::new()
            .decode(&json!(""))
            .expect_err("empty");
        assert_eq!(failure.kind(), FailureKind::EmptyValue);
        assert_eq!(failure.reason(), "must not be empty");
    }

    #[test]
    fn non_matching_strings_are_format_mismatch() {
        let codec = TimestampCodec::new();
        for input in [
            "wrong-format",
            "2020-01-01",
            "2020-01-01T02:02:05",
            "2020-02-30T00:00:00Z",
            "1577844125",
            " ",
            "2020-01-01t02:02:05Z",
            "2020-01-01T02:02:05z",
            "2020-01-01t02:02:05z",
            "2020-01-01 02:02:05Z",
            "2016-12-31T23:59:60Z",
            "2020-01-01T02:02:05.Z",
            "2020-01-01T02:02:05+0700",
            "2020-01-01T02:02:05+07:00 ",
        ] {
            let failure = codec.decode(&json!(input)).expect_err(input);
            assert_eq!(failure.kind(), FailureKind::FormatMismatch);
            assert_eq!(
                failure.reason(),
                format!("format must be {TIMESTAMP_LAYOUT}")
            );
        }
    }
}
