//! Shared helpers for artcat integration tests.
//!
//! - `ScriptedEngine`, an `OcrEngine` that answers from a script
//! - image fixtures encoded with the `image` crate
//! - PDF inspection on top of `lopdf`

pub mod fixtures;
pub mod pdf;

pub use fixtures::*;
pub use pdf::*;
