// src/table/delimited.rs

//! Separator-delimited text files.
//!
//! Format: a header record, then one record per row. No index column is
//! written. Empty fields are read back as missing cells. Fields that contain
//! the separator, a double quote or a line break are double-quoted, with
//! embedded quotes doubled; such a record may span several lines.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::table::Table;
use crate::types::Cell;

/// Load a table from `path`, splitting fields on `sep`.
///
/// Quoted fields may span several lines. Blank lines between records are
/// skipped.
pub fn read_table(path: &Path, sep: &str) -> io::Result<Table> {
    if sep.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "separator must not be empty",
        ));
    }

    let text = fs::read_to_string(path)?;
    let mut records = Records { rest: &text, sep };

    let Some(header) = records.next() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{path:?} has no header line"),
        ));
    };
    let columns = header.into_iter().map(Option::unwrap_or_default).collect();

    Ok(Table::new(columns, records.collect()))
}

/// Write `table` to `writer` using `sep` between fields.
pub fn write_table<W: Write>(mut writer: W, table: &Table, sep: &str) -> io::Result<()> {
    let header: Vec<String> = table.columns.iter().map(|c| quote(c, sep)).collect();
    writeln!(writer, "{}", header.join(sep))?;

    for row in &table.rows {
        let fields: Vec<String> = row
            .iter()
            .map(|cell| cell.as_deref().map(|v| quote(v, sep)).unwrap_or_default())
            .collect();
        writeln!(writer, "{}", fields.join(sep))?;
    }

    writer.flush()
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn quote(value: &str, sep: &str) -> String {
    if value.contains(sep) || value.contains(['"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Iterator over the records of a delimited text.
struct Records<'a> {
    rest: &'a str,
    sep: &'a str,
}

/// Where parsing continues after a field.
enum Next<'a> {
    /// Another field of the same record follows.
    Field(&'a str),
    /// The record ended; the next one starts here.
    Record(&'a str),
}

impl Iterator for Records<'_> {
    type Item = Vec<Cell>;

    fn next(&mut self) -> Option<Vec<Cell>> {
        self.rest = self.rest.trim_start_matches(['\r', '\n']);
        if self.rest.is_empty() {
            return None;
        }

        let mut fields = Vec::new();
        loop {
            let (value, next) = match self.rest.strip_prefix('"') {
                Some(quoted) => take_quoted(quoted, self.sep),
                None => take_plain(self.rest, self.sep),
            };
            fields.push(if value.is_empty() { None } else { Some(value) });

            match next {
                Next::Field(rest) => self.rest = rest,
                Next::Record(rest) => {
                    self.rest = rest;
                    return Some(fields);
                }
            }
        }
    }
}

/// Take an unquoted field: everything up to the next separator on the
/// current line, or to the end of the line.
fn take_plain<'a>(input: &'a str, sep: &str) -> (String, Next<'a>) {
    let line_end = input.find('\n');
    let line = &input[..line_end.unwrap_or(input.len())];

    if let Some(pos) = line.find(sep) {
        return (line[..pos].to_string(), Next::Field(&input[pos + sep.len()..]));
    }
    let rest = line_end.map_or("", |n| &input[n + 1..]);
    (strip_cr(line).to_string(), Next::Record(rest))
}

/// Take a quoted field whose opening quote was already consumed.
///
/// Separators and line breaks inside the quotes belong to the value.
fn take_quoted<'a>(input: &'a str, sep: &str) -> (String, Next<'a>) {
    let mut value = String::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '"' {
            value.push(c);
            continue;
        }
        if let Some(&(_, '"')) = chars.peek() {
            value.push('"');
            chars.next();
            continue;
        }

        // Closing quote: anything up to the field's end is kept verbatim.
        let (tail, next) = take_plain(&input[i + 1..], sep);
        value.push_str(&tail);
        return (value, next);
    }

    // Unterminated quote: the rest of the input is the value.
    (value, Next::Record(""))
}
