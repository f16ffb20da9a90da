// src/store/document.rs

//! On-disk shape of the record store.
//!
//! ```json
//! {
//!     "jobs": [
//!         { "job_id": 1, "task_list": { ... }, "property": { ... } }
//!     ],
//!     "last_job_id": 1
//! }
//! ```
//!
//! `last_job_id` is the id high-water mark. Documents written without it
//! fall back to the largest stored id. The file is created by
//! `RecordStore::open` and must exist afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{JobError, Result};
use crate::job::JobRecord;
use crate::types::JobId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub jobs: Vec<JobRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_job_id: Option<JobId>,
}

impl StoreDocument {
    /// Read the whole document. A blank file is an empty store; a missing
    /// one is a storage error, since only [`RecordStore::open`] creates it.
    ///
    /// [`RecordStore::open`]: crate::store::RecordStore::open
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| JobError::storage(path, e))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&contents).map_err(|source| JobError::CorruptStore {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rewrite the whole document.
    ///
    /// Written to a sibling temp file first and renamed over the target, so a
    /// failed write leaves the previous document intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_document(self, path)
    }

    /// Id for the next created job: one past every id ever handed out.
    pub fn next_id(&self) -> JobId {
        let max_stored = self.jobs.iter().map(|j| j.job_id).max().unwrap_or(0);
        max_stored.max(self.last_job_id.unwrap_or(0)) + 1
    }

    pub fn position(&self, job_id: JobId) -> Option<usize> {
        self.jobs.iter().position(|j| j.job_id == job_id)
    }
}

/// Serialise `value` as 4-space indented JSON and replace `path` with it.
///
/// Encoding and I/O failures are both storage errors at `path`; nothing is
/// written unless encoding succeeded.
pub fn write_document<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| JobError::storage(path, std::io::Error::from(e)))?;
    buf.push(b'\n');

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| JobError::storage(parent, e))?;
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, &buf).map_err(|e| JobError::storage(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| JobError::storage(path, e))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
