// src/table/mod.rs

//! In-memory tabular data exchanged between tasks.
//!
//! - [`merge`] combines two tables (join on shared columns, or juxtaposition).
//! - [`delimited`] reads and writes separator-delimited text files.

pub mod delimited;
pub mod merge;

pub use delimited::{read_table, write_table};
pub use merge::merge;

use crate::types::Cell;

/// A column-named, row-major table of optional string cells.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, padding short rows with missing cells and truncating
    /// long ones so the width invariant holds.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// A table without columns carries no data, whatever its row count.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    /// Remove the named column and return its values, or `None` if absent.
    pub fn drop_column(&mut self, name: &str) -> Option<Vec<Cell>> {
        let idx = self.column_index(name)?;
        self.columns.remove(idx);
        Some(self.rows.iter_mut().map(|row| row.remove(idx)).collect())
    }
}
