//! JSON helpers shared by the manifest loader

pub mod diagnostics;

pub use diagnostics::{JsonErrorKind, JsonSyntaxError};
