//! export.json writer

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::descriptor::ImportDescriptor;

/// The document SFDMU reads: `{"objects": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub objects: Vec<ImportDescriptor>,
}

impl ExportDocument {
    pub fn new(objects: Vec<ImportDescriptor>) -> Self {
        Self { objects }
    }

    /// Pretty JSON with 4-space indentation and no trailing newline
    pub fn to_json(&self) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Serialize `document` to `<folder>/<file>`, replacing any previous content
///
/// Returns the path written.
pub fn write_export(
    folder: &Path,
    file: &str,
    document: &ExportDocument,
) -> Result<PathBuf, ExportError> {
    let path = folder.join(file);
    let json = document.to_json()?;

    std::fs::write(&path, json).map_err(|e| ExportError::Write {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("error writing to {}", path.display())]
    #[diagnostic(code(sfdmu_export::export::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize export document")]
    #[diagnostic(code(sfdmu_export::export::serialize))]
    Serialize(#[from] serde_json::Error),
}
