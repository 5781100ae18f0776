//! Purpose: Shared library crate used by the `fieldwire` binary and tests.
//! Exports: `api` (codecs, failures, decode pipeline, envelopes) and `serve` (HTTP boundary).
//! Role: Typed field codec layer plus the single boundary mapping failures to HTTP.
//! Invariants: Field validation reports through `FieldFailure` values, never panics.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
pub(crate) mod json;
pub mod serve;
