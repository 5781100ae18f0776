//! Purpose: Define the stable public Rust API boundary for fieldwire.
//! Exports: Codec, failure, decode, and envelope types used by the server and CLI.
//! Role: Public, additive-only surface; hides internal parsing modules.
//! Invariants: Callers bind request bodies through `decode_body` and `RequestShape`.
//! Invariants: Internal JSON parsing helpers are not re-exported.

mod envelope;

pub use crate::core::codec::{CodecSet, FieldCodec};
pub use crate::core::decode::{
    DecodeError, FieldReader, FieldWriter, RequestShape, decode_body, encode_body,
};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::failure::{FailureKind, FieldFailure};
pub use crate::core::list::{DelimitedList, ListCodec};
pub use crate::core::timestamp::{TIMESTAMP_LAYOUT, Timestamp, TimestampCodec};
pub use envelope::{DateTimeRequest, ListRequest};
