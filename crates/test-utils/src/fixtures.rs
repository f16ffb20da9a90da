#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jobdag::dag::{PetgraphSort, RunReport};
use jobdag::errors::Result;
use jobdag::job::{JobBody, JobValidator, StructuralValidator, Validation};
use jobdag::service::run_job;
use jobdag::store::RecordStore;
use jobdag::table::{Table, read_table};
use jobdag::types::JobId;
use tempfile::TempDir;

/// Validator returning a fixed verdict and counting how often it was asked.
pub struct StaticValidator {
    verdict: Validation,
    calls: Arc<AtomicUsize>,
}

impl StaticValidator {
    pub fn accept() -> Self {
        Self::with(Validation::valid())
    }

    pub fn reject(reason: &str) -> Self {
        Self::with(Validation::invalid(reason))
    }

    pub fn with(verdict: Validation) -> Self {
        Self {
            verdict,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl JobValidator for StaticValidator {
    fn validate(&self, _body: &JobBody) -> Validation {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict.clone()
    }
}

/// A store and data directory living in a temp dir, removed on drop.
pub struct TestEnv {
    pub dir: TempDir,
    pub store: RecordStore,
}

impl TestEnv {
    /// Store using the crate's default validator.
    pub fn new() -> Self {
        Self::with_validator(Box::new(StructuralValidator))
    }

    pub fn with_validator(validator: Box<dyn JobValidator>) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = RecordStore::open(
            dir.path().join("job.json"),
            dir.path().join("data"),
            validator,
        )
        .expect("open record store");
        Self { dir, store }
    }

    pub fn database(&self) -> PathBuf {
        self.store.database_path().to_path_buf()
    }

    pub fn data_dir(&self) -> &Path {
        self.store.data_dir()
    }

    pub fn data_path(&self, filename: &str) -> PathBuf {
        self.data_dir().join(filename)
    }

    /// Write raw file contents into the data dir.
    pub fn put_file(&self, filename: &str, contents: &str) {
        fs::write(self.data_path(filename), contents).expect("write data file");
    }

    pub fn read_file(&self, filename: &str) -> String {
        fs::read_to_string(self.data_path(filename)).expect("read data file")
    }

    pub fn load_table(&self, filename: &str, sep: &str) -> Table {
        read_table(&self.data_path(filename), sep).expect("read table")
    }

    pub fn run(&self, job_id: JobId) -> Result<RunReport> {
        run_job(&self.store, Arc::new(PetgraphSort), job_id)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a table from string literals; `""` becomes a missing cell.
pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    Table::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                    .collect()
            })
            .collect(),
    )
}
