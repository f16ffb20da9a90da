// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [storage]
/// database = "storage/job.json"
/// data_dir = "storage/data"
///
/// [run]
/// operation_timeout_secs = 30
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub run: RunSection,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub storage: StorageSection,
    pub run: RunSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(storage: StorageSection, run: RunSection) -> Self {
        Self { storage, run }
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.run.operation_timeout_secs)
    }

    /// Resolve relative storage paths against `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        if self.storage.database.is_relative() {
            self.storage.database = base.join(&self.storage.database);
        }
        if self.storage.data_dir.is_relative() {
            self.storage.data_dir = base.join(&self.storage.data_dir);
        }
        self
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(StorageSection::default(), RunSection::default())
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// Path of the JSON job document.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Storage root for tabular resources named by read/write tasks.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_database() -> PathBuf {
    PathBuf::from("storage/job.json")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("storage/data")
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            database: default_database(),
            data_dir: default_data_dir(),
        }
    }
}

/// `[run]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    /// Upper bound on how long a caller waits for one store operation or
    /// job run.
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,
}

fn default_operation_timeout_secs() -> u64 {
    30
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            operation_timeout_secs: default_operation_timeout_secs(),
        }
    }
}
