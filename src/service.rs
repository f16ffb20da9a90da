// src/service.rs

//! Thin async facade over the record store and the executor.
//!
//! Store calls block, so each one runs on tokio's blocking pool. The
//! configured timeout bounds how long a call waits for the store mutex: a
//! call that has not taken the lock when the deadline passes is abandoned and
//! returns [`JobError::Timeout`] without touching the store. A call that
//! already holds the lock runs to completion and reports its real outcome.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::dag::{PetgraphSort, RunReport, TaskGraphExecutor, TopologicalSort};
use crate::errors::{JobError, Result};
use crate::job::{JobBody, JobRecord, StructuralValidator};
use crate::store::{RecordStore, StoreGuard};
use crate::types::JobId;

#[derive(Clone)]
pub struct JobService {
    store: Arc<RecordStore>,
    sorter: Arc<dyn TopologicalSort>,
    timeout: Duration,
}

impl JobService {
    pub fn new(store: Arc<RecordStore>, sorter: Arc<dyn TopologicalSort>, timeout: Duration) -> Self {
        Self {
            store,
            sorter,
            timeout,
        }
    }

    /// Open the store described by `cfg` with the default validator and sort.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let store = RecordStore::open(
            &cfg.storage.database,
            &cfg.storage.data_dir,
            Box::new(StructuralValidator),
        )?;
        Ok(Self::new(
            Arc::new(store),
            Arc::new(PetgraphSort),
            cfg.operation_timeout(),
        ))
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub async fn create(&self, body: JobBody) -> Result<JobId> {
        self.blocking(move |store, _| store.create(body)).await
    }

    pub async fn read(&self, job_id: JobId) -> Result<JobRecord> {
        self.blocking(move |store, _| store.get_item(job_id)).await
    }

    pub async fn update(&self, job_id: JobId, body: JobBody) -> Result<bool> {
        self.blocking(move |store, _| store.update(job_id, body)).await
    }

    pub async fn delete(&self, job_id: JobId) -> Result<bool> {
        self.blocking(move |store, _| store.delete(job_id)).await
    }

    pub async fn list(&self) -> Result<Vec<JobRecord>> {
        self.blocking(|store, _| store.list()).await
    }

    pub async fn run(&self, job_id: JobId) -> Result<RunReport> {
        self.blocking(move |store, sorter| run_locked(store, sorter, job_id))
            .await
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StoreGuard<'_>, Arc<dyn TopologicalSort>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let sorter = Arc::clone(&self.sorter);
        let phase = Arc::new(AtomicU8::new(WAITING));
        let worker_phase = Arc::clone(&phase);
        let timeout = self.timeout;

        let mut handle = tokio::task::spawn_blocking(move || {
            let guard = store.lock();
            if worker_phase
                .compare_exchange(WAITING, STARTED, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                debug!("caller stopped waiting for the store; operation skipped");
                return Err(JobError::Timeout(timeout));
            }
            f(&guard, sorter)
        });

        let waited = tokio::time::timeout(self.timeout, &mut handle).await;
        match waited {
            Ok(joined) => flatten(joined),
            Err(_elapsed) => {
                let abandoned = phase
                    .compare_exchange(WAITING, ABANDONED, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok();
                if abandoned {
                    return Err(JobError::Timeout(self.timeout));
                }
                // The operation holds the lock already; its result stands.
                flatten(handle.await)
            }
        }
    }
}

// Handshake between a waiting caller and its blocking worker.
const WAITING: u8 = 0;
const STARTED: u8 = 1;
const ABANDONED: u8 = 2;

fn flatten<T>(joined: std::result::Result<Result<T>, tokio::task::JoinError>) -> Result<T> {
    joined.unwrap_or_else(|join_err| Err(JobError::Other(anyhow::Error::from(join_err))))
}

/// Load job `job_id` and execute it while holding the store mutex.
pub fn run_job(
    store: &RecordStore,
    sorter: Arc<dyn TopologicalSort>,
    job_id: JobId,
) -> Result<RunReport> {
    run_locked(&store.lock(), sorter, job_id)
}

/// Like [`run_job`], for a caller that already holds the store.
///
/// The record is loaded under the same lock the run holds, so no update can
/// land between loading and executing it.
pub fn run_locked(
    guard: &StoreGuard<'_>,
    sorter: Arc<dyn TopologicalSort>,
    job_id: JobId,
) -> Result<RunReport> {
    let record = guard.get_item(job_id)?;
    let mut executor = TaskGraphExecutor::new(guard.data_dir(), sorter);

    let report = executor.run(&record)?;
    info!(job_id, tasks = report.order.len(), "job completed");
    Ok(report)
}
