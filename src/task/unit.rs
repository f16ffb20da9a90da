// src/task/unit.rs

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::errors::{JobError, Result};
use crate::job::TaskDescriptor;
use crate::table::{Table, merge, read_table, write_table};
use crate::task::log::TaskAction;

/// Executable form of a [`TaskDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUnit {
    Read { filename: String, sep: String },
    Write { filename: String, sep: String },
    DropColumn { column_name: String },
}

impl From<&TaskDescriptor> for TaskUnit {
    fn from(descriptor: &TaskDescriptor) -> Self {
        match descriptor {
            TaskDescriptor::Read { filename, sep } => TaskUnit::Read {
                filename: filename.clone(),
                sep: sep.clone(),
            },
            TaskDescriptor::Write { filename, sep } => TaskUnit::Write {
                filename: filename.clone(),
                sep: sep.clone(),
            },
            TaskDescriptor::DropColumn { column_name } => TaskUnit::DropColumn {
                column_name: column_name.clone(),
            },
        }
    }
}

impl TaskUnit {
    /// Transform the already-merged input into this task's output.
    ///
    /// Tabular resources are resolved relative to `data_dir`. Only `Write`
    /// can fail; read and drop failures fall back to the input unchanged.
    pub fn run(&self, input: Table, data_dir: &Path) -> Result<(Table, TaskAction)> {
        match self {
            TaskUnit::Read { filename, sep } => Ok(run_read(input, data_dir, filename, sep)),
            TaskUnit::Write { filename, sep } => run_write(input, data_dir, filename, sep),
            TaskUnit::DropColumn { column_name } => Ok(run_drop(input, column_name)),
        }
    }

    /// Undo this task's effects.
    ///
    /// There is no compensating logic yet for any kind, so this always fails.
    pub fn rollback(&self) -> Result<()> {
        Err(JobError::Unsupported(format!(
            "rollback of a {} task",
            self.kind()
        )))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TaskUnit::Read { .. } => "read",
            TaskUnit::Write { .. } => "write",
            TaskUnit::DropColumn { .. } => "drop",
        }
    }
}

fn run_read(input: Table, data_dir: &Path, filename: &str, sep: &str) -> (Table, TaskAction) {
    let path = data_dir.join(filename);
    match read_table(&path, sep) {
        Ok(loaded) => {
            let (output, common_columns) = merge(&input, &loaded);
            debug!(
                file = %filename,
                rows = loaded.height(),
                common = ?common_columns,
                "read tabular resource"
            );
            let action = TaskAction::Read {
                filename: filename.to_string(),
                sep: sep.to_string(),
                common_columns,
            };
            (output, action)
        }
        Err(e) => {
            // Absorbed: the task reports success with its input passed through.
            warn!(file = %filename, error = %e, "read failed; passing input through");
            let action = TaskAction::ReadSkipped {
                filename: filename.to_string(),
                reason: e.to_string(),
            };
            (input, action)
        }
    }
}

fn run_write(input: Table, data_dir: &Path, filename: &str, sep: &str) -> Result<(Table, TaskAction)> {
    let path = data_dir.join(filename);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| JobError::resource(parent, e))?;
    }

    // `create_new` refuses to open an existing file, so the check and the
    // create cannot race with another writer.
    let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(JobError::WriteConflict(path));
        }
        Err(e) => return Err(JobError::resource(&path, e)),
    };

    if let Err(e) = write_table(BufWriter::new(file), &input, sep) {
        // Remove the partial file so the target stays free.
        let _ = fs::remove_file(&path);
        return Err(JobError::resource(&path, e));
    }

    info!(file = %filename, rows = input.height(), "wrote tabular resource");
    let action = TaskAction::Write {
        filename: filename.to_string(),
        sep: sep.to_string(),
    };
    Ok((input, action))
}

fn run_drop(mut input: Table, column_name: &str) -> (Table, TaskAction) {
    match input.drop_column(column_name) {
        Some(removed) => {
            debug!(column = %column_name, values = removed.len(), "dropped column");
            let action = TaskAction::DropColumn {
                column_name: column_name.to_string(),
                removed,
            };
            (input, action)
        }
        None => {
            warn!(column = %column_name, "column not present; passing input through");
            let action = TaskAction::DropSkipped {
                column_name: column_name.to_string(),
            };
            (input, action)
        }
    }
}
