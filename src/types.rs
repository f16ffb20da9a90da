use std::collections::BTreeMap;

/// Store-assigned job identifier. Starts at 1 and is never reused.
pub type JobId = u64;

/// Name of one node in a job's DAG.
pub type TaskName = String;

/// DAG adjacency: each task maps to the tasks it produces input for.
pub type TaskList = BTreeMap<TaskName, Vec<TaskName>>;

/// One tabular field. `None` is the explicit "missing" marker.
pub type Cell = Option<String>;
