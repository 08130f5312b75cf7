//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Metadata file Snowfakery writes next to its CSV output
pub const DEFAULT_METADATA_FILE: &str = "csvw_metadata.json";

/// Import plan SFDMU picks up from the same folder
pub const DEFAULT_EXPORT_FILE: &str = "export.json";

/// Per-folder override file, looked up inside the target folder
pub const FOLDER_CONFIG_FILE: &str = ".sfdmu-export.yaml";

pub const ENV_METADATA_FILE: &str = "SFDMU_EXPORT_METADATA_FILE";
pub const ENV_EXPORT_FILE: &str = "SFDMU_EXPORT_EXPORT_FILE";

/// sfdmu-export configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Name of the metadata manifest inside the target folder
    pub metadata_file: Option<String>,

    /// Name of the export document written into the target folder
    pub export_file: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(folder: &Path) -> Self {
        Self::load_with(
            Self::global_config_path().as_deref(),
            folder,
            |key| std::env::var(key).ok(),
        )
    }

    /// Same as [`Config::load`] with the global config path and environment
    /// lookup supplied by the caller
    pub fn load_with(
        global_path: Option<&Path>,
        folder: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (applied by the accessors)

        // 2. Global user config (~/.config/sfdmu-export/config.yaml)
        if let Some(global) = global_path.and_then(Self::read_file) {
            config.merge(global);
        }

        // 3. Folder config (<folder>/.sfdmu-export.yaml)
        if let Some(local) = Self::read_file(&folder.join(FOLDER_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. Environment variables
        if let Some(metadata_file) = env(ENV_METADATA_FILE).filter(|s| !s.is_empty()) {
            config.metadata_file = Some(metadata_file);
        }
        if let Some(export_file) = env(ENV_EXPORT_FILE).filter(|s| !s.is_empty()) {
            config.export_file = Some(export_file);
        }

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sfdmu-export")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Missing or malformed config files are ignored
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        serde_yml::from_str::<Config>(&contents).ok()
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.metadata_file.is_some() {
            self.metadata_file = other.metadata_file;
        }
        if other.export_file.is_some() {
            self.export_file = other.export_file;
        }
    }

    pub fn metadata_file(&self) -> &str {
        self.metadata_file.as_deref().unwrap_or(DEFAULT_METADATA_FILE)
    }

    pub fn export_file(&self) -> &str {
        self.export_file.as_deref().unwrap_or(DEFAULT_EXPORT_FILE)
    }
}
