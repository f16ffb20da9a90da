// src/task/mod.rs

//! Single-step transforms and the plumbing around them.
//!
//! - [`unit`] holds the task kinds (read, write, drop column).
//! - [`buffer`] queues upstream outputs and merges them before a task runs.
//! - [`log`] records how each task's output was produced.

pub mod buffer;
pub mod log;
pub mod unit;

pub use buffer::{BufferEntry, MergedInput, TaskBuffer};
pub use log::{MergeStep, TaskAction, TaskLog};
pub use unit::TaskUnit;
