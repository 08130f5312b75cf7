//! Snowfakery CSVW metadata manifest
//!
//! Only the parts we consume are modelled: the ordered `tables` list and the
//! `url` of each table. Everything else in the document is ignored.

use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::json::JsonSyntaxError;

/// Top-level metadata document
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Tables in the order they should be imported (absent means none)
    #[serde(default)]
    pub tables: Vec<TableEntry>,
}

/// One table descriptor from the manifest
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TableEntry {
    /// CSV file name, relative to the manifest's folder
    pub url: String,
}

impl Manifest {
    /// Parse a manifest from its JSON text
    ///
    /// The document must be a JSON object; serde would otherwise also accept
    /// the struct written as an array. `filename` is only used to label
    /// diagnostics.
    pub fn from_json(source: &str, filename: &str) -> Result<Self, ManifestError> {
        let decode_error = |e: serde_json::Error| {
            ManifestError::Parse(JsonSyntaxError::from_serde_error(&e, source, filename))
        };

        let value: serde_json::Value = serde_json::from_str(source).map_err(decode_error)?;
        if !value.is_object() {
            return Err(ManifestError::Parse(JsonSyntaxError::unexpected_structure(
                format!("expected an object with a \"tables\" list, found {}", json_type(&value)),
                source,
                filename,
            )));
        }

        // Decode from the text again so structure errors keep their line/column
        serde_json::from_str(source).map_err(decode_error)
    }

    /// Data file names in manifest order
    pub fn table_urls(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.url.as_str()).collect()
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Load `<folder>/<metadata_file>`
pub fn load_manifest(folder: &Path, metadata_file: &str) -> Result<Manifest, ManifestError> {
    let path = folder.join(metadata_file);

    let source = std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ManifestError::NotFound {
                file: metadata_file.to_string(),
                folder: folder.to_path_buf(),
            }
        } else {
            ManifestError::Read {
                path: path.clone(),
                source: e,
            }
        }
    })?;

    Manifest::from_json(&source, metadata_file)
}

/// Errors that abort the whole run before any data file is touched
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("metadata file {file} not found in {}", folder.display())]
    #[diagnostic(
        code(sfdmu_export::manifest::not_found),
        help("Point sfdmu-export at a folder produced by `snowfakery --output-format csv`.")
    )]
    NotFound { file: String, folder: PathBuf },

    #[error("failed to read metadata file {}", path.display())]
    #[diagnostic(code(sfdmu_export::manifest::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] JsonSyntaxError),
}
