//! Core module - manifest loading, normalization and export generation

pub mod config;
pub mod descriptor;
pub mod export;
pub mod manifest;
pub mod normalize;
pub mod pipeline;

pub use config::Config;
pub use descriptor::{object_name, ImportDescriptor};
pub use export::{write_export, ExportDocument, ExportError};
pub use manifest::{load_manifest, Manifest, ManifestError, TableEntry};
pub use normalize::{normalize_file, normalize_header, FileError, NormalizedFile};
pub use pipeline::{run, run_with, FileOutcome, ProcessedFile, RunError, RunReport};
