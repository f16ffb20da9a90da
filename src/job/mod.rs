// src/job/mod.rs

//! Job definitions.
//!
//! - [`model`] is the serde data model shared by the store and the executor.
//! - [`validate`] is the gate every candidate body passes before it is stored.

pub mod model;
pub mod validate;

pub use model::{JobBody, JobRecord, TaskDescriptor};
pub use validate::{JobValidator, StructuralValidator, Validation};
