// src/dag/mod.rs

//! Job graph ordering and execution.
//!
//! - [`graph`] holds the topological-sort seam and an adjacency view of a job.
//! - [`executor`] runs a job's tasks in order and hands outputs downstream.
//! - [`task_state`] is the per-run state of each task.

pub mod executor;
pub mod graph;
pub mod task_state;

pub use executor::{RunReport, TaskGraphExecutor};
pub use graph::{CycleDetected, JobGraph, PetgraphSort, TopologicalSort};
pub use task_state::TaskState;
