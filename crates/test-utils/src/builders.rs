#![allow(dead_code)]

use jobdag::job::{JobBody, TaskDescriptor};

/// Builder for `JobBody` to simplify test setup.
///
/// Edges are declared with [`JobBodyBuilder::edge`]; every task added with a
/// descriptor also gets a (possibly empty) `task_list` entry.
pub struct JobBodyBuilder {
    body: JobBody,
}

impl JobBodyBuilder {
    pub fn new() -> Self {
        Self {
            body: JobBody::default(),
        }
    }

    pub fn read(self, name: &str, filename: &str, sep: &str) -> Self {
        self.with_task(
            name,
            TaskDescriptor::Read {
                filename: filename.to_string(),
                sep: sep.to_string(),
            },
        )
    }

    pub fn write(self, name: &str, filename: &str, sep: &str) -> Self {
        self.with_task(
            name,
            TaskDescriptor::Write {
                filename: filename.to_string(),
                sep: sep.to_string(),
            },
        )
    }

    pub fn drop_column(self, name: &str, column_name: &str) -> Self {
        self.with_task(
            name,
            TaskDescriptor::DropColumn {
                column_name: column_name.to_string(),
            },
        )
    }

    pub fn with_task(mut self, name: &str, descriptor: TaskDescriptor) -> Self {
        self.body.task_list.entry(name.to_string()).or_default();
        self.body.property.insert(name.to_string(), descriptor);
        self
    }

    /// `from` produces input for `to`.
    pub fn edge(mut self, from: &str, to: &str) -> Self {
        self.body
            .task_list
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
        self
    }

    /// Chain edges along `names`: `a -> b -> c`.
    pub fn chain(self, names: &[&str]) -> Self {
        names
            .windows(2)
            .fold(self, |builder, pair| builder.edge(pair[0], pair[1]))
    }

    pub fn build(self) -> JobBody {
        self.body
    }
}

impl Default for JobBodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `A -> B -> C`: read `input`, drop `column`, write `output`.
pub fn read_drop_write(input: &str, column: &str, output: &str) -> JobBody {
    JobBodyBuilder::new()
        .read("A", input, ",")
        .drop_column("B", column)
        .write("C", output, ",")
        .chain(&["A", "B", "C"])
        .build()
}
