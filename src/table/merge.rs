// src/table/merge.rs

use std::collections::{HashMap, HashSet};

use crate::table::Table;
use crate::types::Cell;

/// Combine two tables into one.
///
/// - No shared column names: the tables are juxtaposed column-wise, rows
///   aligned by position. The shorter side is padded with missing cells.
/// - Shared column names: full outer join keyed on every shared column.
///
/// Returns the merged table and the shared column names (in `left` column
/// order; empty for juxtaposition).
pub fn merge(left: &Table, right: &Table) -> (Table, Vec<String>) {
    let right_names: HashSet<&str> = right.columns.iter().map(|c| c.as_str()).collect();
    let common: Vec<String> = left
        .columns
        .iter()
        .filter(|c| right_names.contains(c.as_str()))
        .cloned()
        .collect();

    if common.is_empty() {
        (juxtapose(left, right), common)
    } else {
        (outer_join(left, right, &common), common)
    }
}

fn juxtapose(left: &Table, right: &Table) -> Table {
    let height = left.height().max(right.height());
    let mut columns = left.columns.clone();
    columns.extend(right.columns.iter().cloned());

    let rows = (0..height)
        .map(|i| {
            let mut row = row_or_missing(left, i);
            row.extend(row_or_missing(right, i));
            row
        })
        .collect();

    Table { columns, rows }
}

fn row_or_missing(table: &Table, i: usize) -> Vec<Cell> {
    table
        .rows
        .get(i)
        .cloned()
        .unwrap_or_else(|| vec![None; table.width()])
}

fn outer_join(left: &Table, right: &Table, keys: &[String]) -> Table {
    // Both lookups succeed: `keys` is the intersection of the column sets.
    let left_keys: Vec<usize> = keys.iter().filter_map(|k| left.column_index(k)).collect();
    let right_keys: Vec<usize> = keys.iter().filter_map(|k| right.column_index(k)).collect();
    let right_rest: Vec<usize> = (0..right.width())
        .filter(|i| !right_keys.contains(i))
        .collect();

    let mut columns = left.columns.clone();
    columns.extend(right_rest.iter().map(|&i| right.columns[i].clone()));

    let mut index: HashMap<Vec<Cell>, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        index.entry(project(row, &right_keys)).or_default().push(i);
    }

    let mut matched = vec![false; right.height()];
    let mut rows = Vec::with_capacity(left.height().max(right.height()));

    for lrow in &left.rows {
        match index.get(&project(lrow, &left_keys)) {
            Some(hits) => {
                for &ri in hits {
                    matched[ri] = true;
                    let mut row = lrow.clone();
                    row.extend(project(&right.rows[ri], &right_rest));
                    rows.push(row);
                }
            }
            None => {
                let mut row = lrow.clone();
                row.extend(std::iter::repeat_n(None, right_rest.len()));
                rows.push(row);
            }
        }
    }

    for (ri, rrow) in right.rows.iter().enumerate() {
        if matched[ri] {
            continue;
        }
        let mut row: Vec<Cell> = vec![None; left.width()];
        for (&li, &rk) in left_keys.iter().zip(right_keys.iter()) {
            row[li] = rrow[rk].clone();
        }
        row.extend(project(rrow, &right_rest));
        rows.push(row);
    }

    Table { columns, rows }
}

fn project(row: &[Cell], indices: &[usize]) -> Vec<Cell> {
    indices.iter().map(|&i| row[i].clone()).collect()
}
