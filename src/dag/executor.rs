// src/dag/executor.rs

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::dag::graph::{JobGraph, TopologicalSort};
use crate::dag::task_state::{TaskSlot, TaskState};
use crate::errors::{JobError, Result};
use crate::job::JobRecord;
use crate::table::Table;
use crate::task::{TaskLog, TaskUnit};
use crate::types::{JobId, TaskName};

/// What one job run produced. Kept for inspection only; nothing is persisted.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub job_id: JobId,
    /// Execution order.
    pub order: Vec<TaskName>,
    /// One entry per executed task, in execution order.
    pub logs: Vec<TaskLog>,
    /// Output table of every executed task.
    pub outputs: BTreeMap<TaskName, Table>,
}

impl RunReport {
    pub fn log_of(&self, task: &str) -> Option<&TaskLog> {
        self.logs.iter().find(|log| log.task == task)
    }
}

/// Runs a job's tasks one at a time in topological order, handing each
/// task's output to the input buffers of its downstream tasks.
pub struct TaskGraphExecutor {
    data_dir: PathBuf,
    sorter: Arc<dyn TopologicalSort>,
    slots: HashMap<TaskName, TaskSlot>,
}

impl TaskGraphExecutor {
    pub fn new(data_dir: impl Into<PathBuf>, sorter: Arc<dyn TopologicalSort>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sorter,
            slots: HashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// State of `task` in the most recent run, or `None` if it took no part.
    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        self.slots.get(task).map(|slot| slot.state)
    }

    /// Execute every task of `record`.
    ///
    /// Fails before any task runs if the graph is cyclic or a task has no
    /// descriptor. A failing task aborts the run; side effects of tasks that
    /// already ran are kept.
    pub fn run(&mut self, record: &JobRecord) -> Result<RunReport> {
        self.slots.clear();

        let order = self.sorter.order(record.task_list()).map_err(|cycle| {
            JobError::CyclicGraph(format!(
                "job {} has a cycle involving task '{}'",
                record.job_id, cycle.task
            ))
        })?;

        for name in &order {
            let descriptor = record.property().get(name).ok_or_else(|| {
                JobError::Validation(format!(
                    "job {} task '{}' has no entry in `property`",
                    record.job_id, name
                ))
            })?;
            self.slots
                .insert(name.clone(), TaskSlot::new(name.clone(), TaskUnit::from(descriptor)));
        }

        let graph = JobGraph::from_task_list(record.task_list());
        info!(job_id = record.job_id, ?order, "starting job run");

        let mut logs = Vec::with_capacity(order.len());
        let mut outputs = BTreeMap::new();

        for name in &order {
            let (output, log) = self.execute(name)?;

            for next in graph.downstream_of(name) {
                if let Some(slot) = self.slots.get_mut(next) {
                    slot.buffer.push(name.clone(), output.clone());
                }
            }

            for line in log.lines() {
                debug!(task = %name, "{line}");
            }
            logs.push(log);
            outputs.insert(name.clone(), output);
        }

        info!(job_id = record.job_id, tasks = order.len(), "job run finished");

        Ok(RunReport {
            job_id: record.job_id,
            order,
            logs,
            outputs,
        })
    }

    fn execute(&mut self, name: &str) -> Result<(Table, TaskLog)> {
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| JobError::Other(anyhow::anyhow!("task '{name}' is not scheduled")))?;

        slot.state = TaskState::Executing;
        debug!(task = %name, kind = slot.unit.kind(), inputs = slot.buffer.len(), "executing task");

        let merged = slot.buffer.drain_merged();
        let (output, action) = slot.unit.run(merged.table, &self.data_dir)?;
        slot.state = TaskState::Done;

        let log = TaskLog {
            task: slot.name.clone(),
            consumed: merged.consumed,
            merges: merged.steps,
            action,
        };
        Ok((output, log))
    }
}
