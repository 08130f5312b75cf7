//! sfdmu-export: Snowfakery CSV output to SFDMU import plan
//!
//! Reads the CSVW metadata Snowfakery writes next to its CSV files, renames
//! each file's `id` header to `Id` in place, and writes an `export.json`
//! listing one SFDMU insert object per file.

pub mod cli;
pub mod core;
pub mod json;
