//! Purpose: Internal JSON parsing boundary for request bodies.
//! Exports: `parse` module with decode helpers used by the decode pipeline.
//! Role: Single seam for parser usage so callsites avoid ad hoc decode logic.
//! Invariants: Request bodies are decoded through this module only.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
