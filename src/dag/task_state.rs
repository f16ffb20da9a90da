// src/dag/task_state.rs

//! Per-run task state.

use crate::task::{TaskBuffer, TaskUnit};
use crate::types::TaskName;

/// Lifecycle of a task within one job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Input buffer not yet consumed.
    Pending,
    /// Merge and run in progress. A task stays here if its run failed.
    Executing,
    Done,
}

/// A task participating in the current run.
#[derive(Debug, Clone)]
pub(crate) struct TaskSlot {
    pub name: TaskName,
    pub unit: TaskUnit,
    pub buffer: TaskBuffer,
    pub state: TaskState,
}

impl TaskSlot {
    pub fn new(name: TaskName, unit: TaskUnit) -> Self {
        Self {
            name,
            unit,
            buffer: TaskBuffer::new(),
            state: TaskState::Pending,
        }
    }
}
