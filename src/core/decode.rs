//! Purpose: Bind a JSON request body to a declared request shape through field codecs.
//! Exports: `RequestShape`, `FieldReader`, `FieldWriter`, `DecodeError`, `decode_body`, `encode_body`.
//! Role: Decode pipeline between raw body bytes and typed request envelopes.
//! Invariants: Fields decode in declaration order; the first failure aborts (no aggregation).
//! Invariants: Malformed or non-object bodies are internal errors, never field failures.
//! Invariants: Keys outside `RequestShape::FIELDS` are ignored.

use std::error::Error as StdError;
use std::fmt;

use serde_json::{Map, Value};

use crate::core::codec::{CodecSet, FieldCodec};
use crate::core::error::{Error, ErrorKind};
use crate::core::failure::FieldFailure;
use crate::json::parse::{self, ParseFailureCategory};

static MISSING: Value = Value::Null;

/// A request body made of named fields, each bound to a codec.
pub trait RequestShape: Sized {
    /// Declared field names, in decode and encode order.
    const FIELDS: &'static [&'static str];

    fn decode(fields: &FieldReader<'_>, codecs: &CodecSet) -> Result<Self, FieldFailure>;

    fn encode(&self, fields: &mut FieldWriter, codecs: &CodecSet) -> Result<(), Error>;
}

pub struct FieldReader<'a> {
    body: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub fn new(body: &'a Map<String, Value>) -> Self {
        Self { body }
    }

    /// Decodes one field; an absent key is treated as JSON `null`.
    pub fn read<C: FieldCodec>(&self, name: &str, codec: &C) -> Result<C::Value, FieldFailure> {
        let raw = self.body.get(name).unwrap_or(&MISSING);
        codec.decode(raw).map_err(|failure| failure.with_field(name))
    }
}

#[derive(Debug, Default)]
pub struct FieldWriter {
    body: Map<String, Value>,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write<C: FieldCodec>(
        &mut self,
        name: &str,
        codec: &C,
        value: &C::Value,
    ) -> Result<(), Error> {
        let encoded = codec.encode(value)?;
        self.body.insert(name.to_string(), encoded);
        Ok(())
    }

    pub fn finish(self) -> Map<String, Value> {
        self.body
    }
}

#[derive(Debug)]
pub enum DecodeError {
    Invalid(FieldFailure),
    Internal(Error),
}

impl From<FieldFailure> for DecodeError {
    fn from(failure: FieldFailure) -> Self {
        DecodeError::Invalid(failure)
    }
}

impl From<Error> for DecodeError {
    fn from(err: Error) -> Self {
        DecodeError::Internal(err)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Invalid(failure) => write!(f, "invalid field: {failure}"),
            DecodeError::Internal(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for DecodeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DecodeError::Invalid(failure) => Some(failure),
            DecodeError::Internal(err) => Some(err),
        }
    }
}

pub fn decode_body<T: RequestShape>(body: &[u8], codecs: &CodecSet) -> Result<T, DecodeError> {
    let object = parse::object_from_slice(body).map_err(|failure| {
        let message = match failure.category {
            ParseFailureCategory::NotObject => "request body is not a JSON object",
            _ => "malformed request body",
        };
        let hint = parse::hint_for_failure(&failure, "request body");
        let err = Error::new(ErrorKind::Internal)
            .with_message(message)
            .with_hint(hint);
        match failure.source {
            Some(source) => err.with_source(source),
            None => err,
        }
    })?;

    let ignored: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|key| !T::FIELDS.iter().any(|field| field == key))
        .collect();
    if !ignored.is_empty() {
        tracing::debug!(?ignored, "ignoring undeclared request fields");
    }

    let request = T::decode(&FieldReader::new(&object), codecs)?;
    Ok(request)
}

pub fn encode_body<T: RequestShape>(request: &T, codecs: &CodecSet) -> Result<Value, Error> {
    let mut fields = FieldWriter::new();
    request.encode(&mut fields, codecs)?;
    Ok(Value::Object(fields.finish()))
}
