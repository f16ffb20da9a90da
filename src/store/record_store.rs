// src/store/record_store.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::errors::{JobError, Result};
use crate::job::{JobBody, JobRecord, JobValidator, Validation};
use crate::store::document::StoreDocument;
use crate::types::JobId;

/// Persistent collection of job records.
///
/// Every operation holds one store-wide mutex across the whole
/// read → mutate → persist cycle, so operations never interleave. Job runs
/// take the same mutex through [`RecordStore::lock`] or
/// [`RecordStore::exclusive`].
pub struct RecordStore {
    database: PathBuf,
    data_dir: PathBuf,
    validator: Box<dyn JobValidator>,
    mutex: Mutex<()>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("database", &self.database)
            .field("data_dir", &self.data_dir)
            .finish_non_exhaustive()
    }
}

/// Exclusive access to a [`RecordStore`].
///
/// Operations called through a guard run under the mutex it already holds,
/// so several of them (say, loading a record and running it) form one
/// critical section.
pub struct StoreGuard<'a> {
    store: &'a RecordStore,
    _lock: MutexGuard<'a, ()>,
}

impl RecordStore {
    /// Open (or initialise) a store backed by the document at `database`.
    ///
    /// Creates the data directory and an empty document if they are missing.
    pub fn open(
        database: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
        validator: Box<dyn JobValidator>,
    ) -> Result<Self> {
        let database = database.into();
        let data_dir = data_dir.into();

        fs::create_dir_all(&data_dir).map_err(|e| JobError::storage(&data_dir, e))?;
        if !database.exists() {
            StoreDocument::default().save(&database)?;
            info!(path = ?database, "initialised empty job store");
        }

        Ok(Self {
            database,
            data_dir,
            validator,
            mutex: Mutex::new(()),
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Block until the store mutex is free and take it.
    pub fn lock(&self) -> StoreGuard<'_> {
        // The mutex guards no data of its own, so a poisoned lock is still usable.
        let lock = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        StoreGuard { store: self, _lock: lock }
    }

    /// Run `f` while holding the store mutex.
    pub fn exclusive<T>(&self, f: impl FnOnce(&StoreGuard<'_>) -> T) -> T {
        let guard = self.lock();
        f(&guard)
    }

    /// Validate `body`, assign it the next id, append and persist it.
    pub fn create(&self, body: JobBody) -> Result<JobId> {
        self.lock().create(body)
    }

    pub fn get_item(&self, job_id: JobId) -> Result<JobRecord> {
        self.lock().get_item(job_id)
    }

    /// All records in insertion order.
    pub fn list(&self) -> Result<Vec<JobRecord>> {
        self.lock().list()
    }

    /// Replace the record `job_id` with `body`, keeping its id.
    ///
    /// Returns `Ok(false)` without touching the store if the validator
    /// rejects `body`.
    pub fn update(&self, job_id: JobId, body: JobBody) -> Result<bool> {
        self.lock().update(job_id, body)
    }

    /// Remove the record `job_id`. Returns `false` if there was none.
    pub fn delete(&self, job_id: JobId) -> Result<bool> {
        self.lock().delete(job_id)
    }

    /// Drop every record and every file in the data directory.
    #[cfg(feature = "test-support")]
    pub fn reset(&self) -> Result<()> {
        self.lock().reset()
    }
}

impl StoreGuard<'_> {
    pub fn data_dir(&self) -> &Path {
        &self.store.data_dir
    }

    fn load(&self) -> Result<StoreDocument> {
        StoreDocument::load(&self.store.database)
    }

    fn save(&self, doc: &StoreDocument) -> Result<()> {
        doc.save(&self.store.database)
    }

    pub fn create(&self, body: JobBody) -> Result<JobId> {
        let verdict = self.store.validator.validate(&body);
        if let Some(reason) = rejection(&verdict) {
            return Err(JobError::Validation(reason));
        }

        let mut doc = self.load()?;
        let job_id = doc.next_id();
        doc.jobs.push(JobRecord::new(job_id, body));
        doc.last_job_id = Some(job_id);
        self.save(&doc)?;

        info!(job_id, "created job");
        Ok(job_id)
    }

    pub fn get_item(&self, job_id: JobId) -> Result<JobRecord> {
        let doc = self.load()?;
        doc.position(job_id)
            .map(|idx| doc.jobs[idx].clone())
            .ok_or(JobError::NotFound(job_id))
    }

    pub fn list(&self) -> Result<Vec<JobRecord>> {
        Ok(self.load()?.jobs)
    }

    pub fn update(&self, job_id: JobId, body: JobBody) -> Result<bool> {
        let mut doc = self.load()?;
        let idx = doc.position(job_id).ok_or(JobError::NotFound(job_id))?;

        let verdict = self.store.validator.validate(&body);
        if !verdict.is_valid {
            debug!(job_id, reason = ?verdict.error, "update rejected by validator");
            return Ok(false);
        }
        if let Some(reason) = verdict.error {
            return Err(JobError::Validation(reason));
        }

        doc.jobs[idx] = JobRecord::new(job_id, body);
        self.save(&doc)?;

        info!(job_id, "updated job");
        Ok(true)
    }

    pub fn delete(&self, job_id: JobId) -> Result<bool> {
        let mut doc = self.load()?;

        let Some(idx) = doc.position(job_id) else {
            debug!(job_id, "delete of unknown job ignored");
            return Ok(false);
        };

        doc.jobs.remove(idx);
        self.save(&doc)?;

        info!(job_id, "deleted job");
        Ok(true)
    }

    #[cfg(feature = "test-support")]
    pub fn reset(&self) -> Result<()> {
        self.save(&StoreDocument::default())?;

        let data_dir = self.data_dir();
        let entries = fs::read_dir(data_dir).map_err(|e| JobError::storage(data_dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| JobError::storage(data_dir, e))?.path();
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|e| JobError::storage(&path, e))?;
        }

        info!("reset job store");
        Ok(())
    }
}

fn rejection(verdict: &Validation) -> Option<String> {
    match (verdict.is_valid, &verdict.error) {
        (true, None) => None,
        (_, Some(reason)) => Some(reason.clone()),
        (false, None) => Some("validation failed".to_string()),
    }
}
