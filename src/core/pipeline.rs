//! Folder-level run: manifest -> per-file normalization -> export.json

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config::Config;
use crate::core::descriptor::{object_name, ImportDescriptor};
use crate::core::export::{write_export, ExportDocument, ExportError};
use crate::core::manifest::{load_manifest, ManifestError};
use crate::core::normalize::{normalize_file, FileError, NormalizedFile};

/// Successful processing of one data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub normalized: NormalizedFile,
    pub descriptor: ImportDescriptor,
}

/// What happened to one manifest entry
#[derive(Debug)]
pub struct FileOutcome {
    pub file: String,
    pub result: Result<ProcessedFile, FileError>,
}

impl FileOutcome {
    pub fn object_name(&self) -> String {
        object_name(&self.file)
    }
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunReport {
    /// One entry per manifest table, in manifest order
    pub outcomes: Vec<FileOutcome>,
    /// Where export.json was written
    pub export_path: PathBuf,
}

impl RunReport {
    pub fn processed(&self) -> impl Iterator<Item = &ProcessedFile> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn processed_count(&self) -> usize {
        self.processed().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Fatal errors; a per-file failure is never one of these
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),
}

/// Normalize one data file and build its descriptor
pub fn process_file(folder: &Path, file: &str) -> Result<ProcessedFile, FileError> {
    let normalized = normalize_file(folder, file)?;
    let descriptor = ImportDescriptor::from_header(file, &normalized.header);
    Ok(ProcessedFile {
        normalized,
        descriptor,
    })
}

/// Process every file listed in the folder's manifest and write the export
///
/// `on_outcome` sees each file's outcome as soon as it is known, so callers
/// can report progress while the run continues.
pub fn run_with(
    folder: &Path,
    config: &Config,
    mut on_outcome: impl FnMut(&FileOutcome),
) -> Result<RunReport, RunError> {
    let manifest = load_manifest(folder, config.metadata_file())?;

    let mut outcomes = Vec::with_capacity(manifest.tables.len());
    for file in manifest.table_urls() {
        let outcome = FileOutcome {
            file: file.to_string(),
            result: process_file(folder, file),
        };
        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    let document = ExportDocument::new(
        outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|p| p.descriptor.clone())
            .collect(),
    );
    let export_path = write_export(folder, config.export_file(), &document)?;

    Ok(RunReport {
        outcomes,
        export_path,
    })
}

/// [`run_with`] without a progress callback
pub fn run(folder: &Path, config: &Config) -> Result<RunReport, RunError> {
    run_with(folder, config, |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_manifest(dir: &Path, urls: &[&str]) {
        let tables: Vec<_> = urls.iter().map(|u| serde_json::json!({ "url": u })).collect();
        fs::write(
            dir.join("csvw_metadata.json"),
            serde_json::json!({ "tables": tables }).to_string(),
        )
        .unwrap();
    }

    fn read_export(dir: &Path) -> ExportDocument {
        serde_json::from_str(&fs::read_to_string(dir.join("export.json")).unwrap()).unwrap()
    }

    #[test]
    fn test_run_skips_missing_file() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), &["Account.csv", "Contact.csv"]);
        fs::write(dir.path().join("Account.csv"), "Name,id,Amount\nAcme,1,10\n").unwrap();

        let report = run(dir.path(), &Config::default()).unwrap();
        assert_eq!(report.processed_count(), 1);
        assert_eq!(report.failure_count(), 1);
        assert!(matches!(
            report.outcomes[1].result,
            Err(FileError::NotFound { .. })
        ));

        let export = read_export(dir.path());
        assert_eq!(export.objects.len(), 1);
        assert_eq!(
            export.objects[0].query,
            "SELECT Id, Name, Id, Amount FROM Account"
        );
    }

    #[test]
    fn test_run_keeps_manifest_order() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), &["Contact.csv", "Empty.csv", "Account.csv"]);
        fs::write(dir.path().join("Contact.csv"), "id,LastName\n").unwrap();
        fs::write(dir.path().join("Empty.csv"), "").unwrap();
        fs::write(dir.path().join("Account.csv"), "id,Name\n").unwrap();

        let mut seen = Vec::new();
        let report = run_with(dir.path(), &Config::default(), |o| seen.push(o.file.clone())).unwrap();
        assert_eq!(seen, vec!["Contact.csv", "Empty.csv", "Account.csv"]);
        assert_eq!(report.outcomes[1].object_name(), "Empty");

        let queries: Vec<_> = read_export(dir.path())
            .objects
            .into_iter()
            .map(|o| o.query)
            .collect();
        assert_eq!(
            queries,
            vec![
                "SELECT Id, Id, LastName FROM Contact",
                "SELECT Id, Id, Name FROM Account"
            ]
        );
    }

    #[test]
    fn test_run_empty_tables() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), &[]);

        let report = run(dir.path(), &Config::default()).unwrap();
        assert!(report.outcomes.is_empty());
        assert_eq!(
            fs::read_to_string(&report.export_path).unwrap(),
            "{\n    \"objects\": []\n}"
        );
    }

    #[test]
    fn test_run_invalid_manifest_touches_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("csvw_metadata.json"), "{\"tables\": [").unwrap();
        fs::write(dir.path().join("Account.csv"), "id,Name\n").unwrap();

        let err = run(dir.path(), &Config::default()).unwrap_err();
        assert!(matches!(err, RunError::Manifest(ManifestError::Parse(_))));
        assert_eq!(
            fs::read_to_string(dir.path().join("Account.csv")).unwrap(),
            "id,Name\n"
        );
        assert!(!dir.path().join("export.json").exists());
    }

    #[test]
    fn test_run_array_manifest_touches_nothing() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("csvw_metadata.json"),
            r#"[[{"url": "Account.csv"}]]"#,
        )
        .unwrap();
        fs::write(dir.path().join("Account.csv"), "id,Name\n").unwrap();

        let err = run(dir.path(), &Config::default()).unwrap_err();
        assert!(matches!(err, RunError::Manifest(ManifestError::Parse(_))));
        assert_eq!(
            fs::read_to_string(dir.path().join("Account.csv")).unwrap(),
            "id,Name\n"
        );
        assert!(!dir.path().join("export.json").exists());
    }

    #[test]
    fn test_run_missing_manifest() {
        let dir = tempdir().unwrap();
        let err = run(dir.path(), &Config::default()).unwrap_err();
        assert!(matches!(err, RunError::Manifest(ManifestError::NotFound { .. })));
        assert!(!dir.path().join("export.json").exists());
    }

    #[test]
    fn test_run_uses_configured_file_names() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("meta.json"),
            r#"{"tables": [{"url": "Account.csv"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("Account.csv"), "ID\n").unwrap();

        let config = Config {
            metadata_file: Some("meta.json".to_string()),
            export_file: Some("plan.json".to_string()),
        };
        let report = run(dir.path(), &config).unwrap();
        assert_eq!(report.export_path, dir.path().join("plan.json"));
        assert!(!dir.path().join("export.json").exists());
    }
}
