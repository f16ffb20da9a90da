// src/task/log.rs

//! Provenance records written while a job runs.
//!
//! Each executed task gets one [`TaskLog`] with enough data to describe the
//! state before the task ran: the buffered inputs it consumed, how they were
//! merged and the values it removed. A logged write always created its
//! target, so undoing it means removing that file.
//! Nothing reads these back yet; they are kept in the run report for
//! inspection.

use std::fmt;

use crate::task::buffer::BufferEntry;
use crate::types::{Cell, TaskName};

/// One fold of the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStep {
    pub source: TaskName,
    pub common_columns: Vec<String>,
}

impl fmt::Display for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Merge with {} - {:?}", self.source, self.common_columns)
    }
}

/// What the task itself did after merging its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    Read {
        filename: String,
        sep: String,
        common_columns: Vec<String>,
    },
    /// The resource could not be loaded; output is the merged input.
    ReadSkipped { filename: String, reason: String },
    /// Only logged for a write that created its target; an existing target
    /// aborts the run instead.
    Write { filename: String, sep: String },
    DropColumn {
        column_name: String,
        removed: Vec<Cell>,
    },
    /// The column was absent; output is the merged input.
    DropSkipped { column_name: String },
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskAction::Read {
                filename,
                common_columns,
                ..
            } => write!(f, "Read from {filename} - {common_columns:?}"),
            TaskAction::ReadSkipped { filename, reason } => {
                write!(f, "Read skipped for {filename} - {reason}")
            }
            TaskAction::Write { filename, sep } => write!(f, "Write to {filename} - {sep}"),
            TaskAction::DropColumn {
                column_name,
                removed,
            } => write!(f, "Remove Column : {column_name} - {removed:?}"),
            TaskAction::DropSkipped { column_name } => {
                write!(f, "Remove Column skipped : {column_name} not present")
            }
        }
    }
}

/// Provenance for one executed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLog {
    pub task: TaskName,
    pub consumed: Vec<BufferEntry>,
    pub merges: Vec<MergeStep>,
    pub action: TaskAction,
}

impl TaskLog {
    /// Summary lines in the order the work happened.
    pub fn lines(&self) -> Vec<String> {
        self.merges
            .iter()
            .map(ToString::to_string)
            .chain(std::iter::once(self.action.to_string()))
            .collect()
    }
}
