// src/errors.rs

//! Crate-wide error type.
//!
//! Every error a caller can observe maps onto one [`ErrorKind`], so a front end
//! can turn kinds into distinct responses without inspecting payloads.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::JobId;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Cycle detected in task graph: {0}")]
    CyclicGraph(String),

    #[error("Write target already exists: {0:?}")]
    WriteConflict(PathBuf),

    #[error("Storage error at {path:?}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record file {path:?} is not a valid job document: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Tabular resource error at {path:?}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of [`JobError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    CyclicGraph,
    WriteConflict,
    Storage,
    Resource,
    Unsupported,
    Timeout,
    Config,
    Internal,
}

impl JobError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JobError::Validation(_) => ErrorKind::Validation,
            JobError::NotFound(_) => ErrorKind::NotFound,
            JobError::CyclicGraph(_) => ErrorKind::CyclicGraph,
            JobError::WriteConflict(_) => ErrorKind::WriteConflict,
            JobError::Storage { .. } | JobError::CorruptStore { .. } => ErrorKind::Storage,
            JobError::Resource { .. } => ErrorKind::Resource,
            JobError::Unsupported(_) => ErrorKind::Unsupported,
            JobError::Timeout(_) => ErrorKind::Timeout,
            JobError::ConfigError(_) | JobError::TomlError(_) => ErrorKind::Config,
            JobError::Other(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JobError::Storage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JobError::Resource {
            path: path.into(),
            source,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, JobError>;
