//! Purpose: Delimited string-list scalar and its field codec.
//! Exports: `DelimitedList`, `ListCodec`.
//! Role: Binds `a,b,c` strings to an ordered token list and back.
//! Invariants: Split/join is exact: no trimming, no dedup, empty tokens kept.
//! Invariants: A list always holds at least one token; textual form belongs to the codec.

use crate::core::codec::FieldCodec;
use crate::core::error::Error;
use crate::core::failure::FieldFailure;

const REASON_NOT_STRING: &str = "must be a valid string";

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DelimitedList(Vec<String>);

impl DelimitedList {
    pub fn items(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListCodec {
    separator: char,
}

impl ListCodec {
    pub const fn new(separator: char) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }
}

impl Default for ListCodec {
    fn default() -> Self {
        Self::new(',')
    }
}

impl FieldCodec for ListCodec {
    type Value = DelimitedList;

    fn type_reason(&self) -> &'static str {
        REASON_NOT_STRING
    }

    fn parse(&self, text: &str) -> Result<DelimitedList, FieldFailure> {
        Ok(DelimitedList(
            text.split(self.separator).map(str::to_string).collect(),
        ))
    }

    fn format(&self, value: &DelimitedList) -> Result<String, Error> {
        let mut buf = [0u8; 4];
        let separator: &str = self.separator.encode_utf8(&mut buf);
        Ok(value.0.join(separator))
    }
}

#[cfg(test)]
mod tests {
    use super::ListCodec;
    use crate::core::codec::FieldCodec;
    use crate::core::failure::FailureKind;
    use serde_json::json;

    #[test]
    fn splits_in_order() {
        let list = ListCodec::default().decode(&json!("1,2,3,4")).expect("list");
        assert_eq!(list.items(), ["1", "2", "3", "4"]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn keeps_empty_tokens_and_whitespace() {
        let codec = ListCodec::default();
        let list = codec.parse("1,,3").expect("list");
        assert_eq!(list.items(), ["1", "", "3"]);

        let list = codec.parse(",").expect("list");
        assert_eq!(list.items(), ["", ""]);

        let list = codec.parse(" a , b,a").expect("list");
        assert_eq!(list.into_inner(), vec![" a ", " b", "a"]);
    }

    #[test]
    fn round_trip_law_holds() {
        let codec = ListCodec::default();
        for input in ["1,2,3,4", "single", "1,,3", ",", ",,x,", "ünï,cödé"] {
            let list = codec.parse(input).expect("parse");
            let text = codec.format(&list).expect("format");
            assert_eq!(text, input);
            assert_eq!(codec.parse(&text).expect("reparse"), list);
        }
    }

    #[test]
    fn every_decoded_list_has_a_token_and_round_trips() {
        for codec in [ListCodec::default(), ListCodec::new(';')] {
            for input in ["x", ";", ",", "a;b,c"] {
                let list = codec.decode(&json!(input)).expect("list");
                assert!(!list.is_empty());
                let text = codec.format(&list).expect("format");
                assert_eq!(text, input);
                assert_eq!(codec.parse(&text).expect("reparse"), list);
            }
        }
    }

    #[test]
    fn custom_separator_is_used_both_ways() {
        let codec = ListCodec::new(';');
        let list = codec.parse("a;b,c").expect("list");
        assert_eq!(list.items(), ["a", "b,c"]);
        assert_eq!(codec.format(&list).expect("format"), "a;b,c");
    }

    #[test]
    fn rejects_non_strings_and_empty() {
        let codec = ListCodec::default();
        for raw in [json!(true), json!(null), json!(12), json!(["1", "2"])] {
            let failure = codec.decode(&raw).expect_err("non-string");
            assert_eq!(failure.kind(), FailureKind::InvalidType);
            assert_eq!(failure.reason(), "must be a valid string");
        }

        let failure = codec.decode(&json!("")).expect_err("empty");
        assert_eq!(failure.kind(), FailureKind::EmptyValue);
        assert_eq!(failure.reason(), "must not be empty");
    }
}
