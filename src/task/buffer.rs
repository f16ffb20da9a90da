// src/task/buffer.rs

use tracing::debug;

use crate::table::{Table, merge};
use crate::task::log::MergeStep;
use crate::types::TaskName;

/// An immutable copy of one upstream task's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferEntry {
    pub source: TaskName,
    pub table: Table,
}

/// Per-task input queue of upstream outputs.
#[derive(Debug, Clone, Default)]
pub struct TaskBuffer {
    entries: Vec<BufferEntry>,
}

/// Result of draining a [`TaskBuffer`].
#[derive(Debug, Clone)]
pub struct MergedInput {
    pub table: Table,
    pub steps: Vec<MergeStep>,
    /// The entries that were consumed, in queue order.
    pub consumed: Vec<BufferEntry>,
}

impl TaskBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl Into<TaskName>, table: Table) {
        self.entries.push(BufferEntry {
            source: source.into(),
            table,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop every queued entry and fold it into a single table.
    ///
    /// Entries are taken most-recent first; the running result starts empty
    /// and is merged with each entry in turn. One [`MergeStep`] is recorded
    /// per fold.
    pub fn drain_merged(&mut self) -> MergedInput {
        let consumed = std::mem::take(&mut self.entries);
        let mut table = Table::empty();
        let mut steps = Vec::with_capacity(consumed.len());

        for entry in consumed.iter().rev() {
            let (merged, common_columns) = merge(&table, &entry.table);
            debug!(
                source = %entry.source,
                common = ?common_columns,
                rows = merged.height(),
                "merged buffered input"
            );
            steps.push(MergeStep {
                source: entry.source.clone(),
                common_columns,
            });
            table = merged;
        }

        MergedInput {
            table,
            steps,
            consumed,
        }
    }
}
