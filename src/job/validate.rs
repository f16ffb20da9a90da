// src/job/validate.rs

//! Validation gate for candidate job bodies.
//!
//! The store treats the validator as an opaque predicate; [`StructuralValidator`]
//! is the rule set shipped with the crate.

use std::path::{Component, Path};

use crate::dag::graph::{PetgraphSort, TopologicalSort};
use crate::job::model::{JobBody, TaskDescriptor};

/// Outcome of validating a candidate body.
///
/// `error` may carry a reason even when `is_valid` is `true`; the store
/// surfaces such a reason as a validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl Validation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(reason.into()),
        }
    }
}

/// Predicate deciding whether a candidate job body may be stored.
pub trait JobValidator: Send + Sync {
    fn validate(&self, body: &JobBody) -> Validation;
}

/// Default rules:
/// - at least one task
/// - `task_list` and `property` name the same tasks
/// - every edge target is a known task, and no task feeds itself
/// - the graph is acyclic
/// - descriptor fields are non-empty; filenames stay inside the data dir
#[derive(Debug, Clone, Default)]
pub struct StructuralValidator;

impl JobValidator for StructuralValidator {
    fn validate(&self, body: &JobBody) -> Validation {
        match check_body(body) {
            Ok(()) => Validation::valid(),
            Err(reason) => Validation::invalid(reason),
        }
    }
}

fn check_body(body: &JobBody) -> Result<(), String> {
    ensure_has_tasks(body)?;
    validate_key_sets(body)?;
    validate_edges(body)?;
    validate_descriptors(body)?;
    validate_dag(body)?;
    Ok(())
}

fn ensure_has_tasks(body: &JobBody) -> Result<(), String> {
    if body.task_list.is_empty() {
        return Err("job must contain at least one task".to_string());
    }
    Ok(())
}

fn validate_key_sets(body: &JobBody) -> Result<(), String> {
    if let Some(name) = body
        .task_list
        .keys()
        .find(|name| !body.property.contains_key(*name))
    {
        return Err(format!("task '{name}' has no entry in `property`"));
    }
    if let Some(name) = body
        .property
        .keys()
        .find(|name| !body.task_list.contains_key(*name))
    {
        return Err(format!("property '{name}' has no entry in `task_list`"));
    }
    Ok(())
}

fn validate_edges(body: &JobBody) -> Result<(), String> {
    for (name, next) in body.task_list.iter() {
        for target in next {
            if !body.task_list.contains_key(target) {
                return Err(format!(
                    "task '{name}' feeds unknown task '{target}' in `task_list`"
                ));
            }
            if target == name {
                return Err(format!("task '{name}' cannot feed itself"));
            }
        }
    }
    Ok(())
}

fn validate_descriptors(body: &JobBody) -> Result<(), String> {
    for (name, descriptor) in body.property.iter() {
        match descriptor {
            TaskDescriptor::Read { filename, sep } | TaskDescriptor::Write { filename, sep } => {
                if sep.is_empty() {
                    return Err(format!("task '{name}' has an empty `sep`"));
                }
                validate_filename(name, filename)?;
            }
            TaskDescriptor::DropColumn { column_name } => {
                if column_name.is_empty() {
                    return Err(format!("task '{name}' has an empty `column_name`"));
                }
            }
        }
    }
    Ok(())
}

fn validate_filename(task: &str, filename: &str) -> Result<(), String> {
    if filename.is_empty() {
        return Err(format!("task '{task}' has an empty `filename`"));
    }
    let escapes = Path::new(filename)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(format!(
            "task '{task}' filename '{filename}' must be a relative path inside the data directory"
        ));
    }
    Ok(())
}

fn validate_dag(body: &JobBody) -> Result<(), String> {
    PetgraphSort
        .order(&body.task_list)
        .map(|_| ())
        .map_err(|cycle| format!("cycle detected in task DAG involving task '{}'", cycle.task))
}
