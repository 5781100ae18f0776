//! Purpose: Provide the internal request-body JSON decode entrypoints.
//! Exports: `object_from_slice`, `ParseFailure`, `ParseFailureCategory`, category helpers.
//! Role: Parser boundary that centralizes serde_json usage for request bodies.
//! Invariants: Only a top-level JSON object is accepted as a request body.
//! Invariants: Failures carry a stable category label; no payload bytes are echoed.
//! Notes: Error mapping is done by callsites so domain context stays explicit.

use serde_json::error::Category;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    Eof,
    Data,
    Io,
    NotObject,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Io => "io",
            ParseFailureCategory::NotObject => "not-object",
        }
    }
}

#[derive(Debug)]
pub(crate) struct ParseFailure {
    pub(crate) category: ParseFailureCategory,
    pub(crate) source: Option<serde_json::Error>,
}

pub(crate) fn object_from_slice(input: &[u8]) -> Result<Map<String, Value>, ParseFailure> {
    match serde_json::from_slice::<Value>(input) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ParseFailure {
            category: ParseFailureCategory::NotObject,
            source: None,
        }),
        Err(err) => Err(ParseFailure {
            category: categorize_error(&err),
            source: Some(err),
        }),
    }
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Syntax => ParseFailureCategory::Syntax,
        Category::Eof => ParseFailureCategory::Eof,
        Category::Data => ParseFailureCategory::Data,
        Category::Io => ParseFailureCategory::Io,
    }
}

pub(crate) fn hint_for_failure(failure: &ParseFailure, context: &str) -> String {
    let mut hint = format!(
        "parse category: {}; context: {context}",
        failure.category.label()
    );
    if let Some(err) = &failure.source {
        hint.push_str(&format!("; line {}, column {}", err.line(), err.column()));
    }
    hint
}
