// src/job/model.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{JobId, TaskList, TaskName};

/// Per-task parameters, tagged by kind.
///
/// The wire form matches the persisted job document:
///
/// ```json
/// { "task_name": "read",  "filename": "a.csv", "sep": "," }
/// { "task_name": "write", "filename": "b.csv", "sep": ";" }
/// { "task_name": "drop",  "column_name": "col0" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task_name", rename_all = "snake_case")]
pub enum TaskDescriptor {
    Read { filename: String, sep: String },
    Write { filename: String, sep: String },
    #[serde(rename = "drop", alias = "drop_column")]
    DropColumn { column_name: String },
}

impl TaskDescriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            TaskDescriptor::Read { .. } => "read",
            TaskDescriptor::Write { .. } => "write",
            TaskDescriptor::DropColumn { .. } => "drop",
        }
    }
}

/// A job as submitted by a client: the DAG plus one descriptor per task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobBody {
    /// Edges point from a task to the tasks consuming its output.
    #[serde(default)]
    pub task_list: TaskList,

    #[serde(default)]
    pub property: BTreeMap<TaskName, TaskDescriptor>,
}

/// A stored job: the body with its store-assigned id attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,

    #[serde(flatten)]
    pub body: JobBody,
}

impl JobRecord {
    pub fn new(job_id: JobId, body: JobBody) -> Self {
        Self { job_id, body }
    }

    pub fn task_list(&self) -> &TaskList {
        &self.body.task_list
    }

    pub fn property(&self) -> &BTreeMap<TaskName, TaskDescriptor> {
        &self.body.property
    }
}
