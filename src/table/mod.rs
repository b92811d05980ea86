//! In-memory tabular dataset with a CSV codec
//!
//! A [`Table`] is an ordered sequence of rows under a named header. Cells are
//! `Option<String>`: `None` is an absent/null value, which the join layer
//! treats as never equal to anything, including another null. An empty CSV
//! field reads back as null and a null serializes as an empty field.

use crate::error::{Result, csv_encode_failed, csv_parse_failed};

/// A single cell value; `None` means absent/null.
pub type Value = Option<String>;

/// An in-memory tabular dataset parsed from delimited text.
///
/// Column order is insertion order from the source file; it matters only for
/// output reproducibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Parse CSV bytes with a header row into a table.
    ///
    /// `key` names the source object and only appears in error messages.
    /// Ragged rows are a schema error.
    pub fn from_csv(key: &str, bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().from_reader(bytes);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| csv_parse_failed(key, e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_parse_failed(key, e.to_string()))?;
            let row = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Serialize to CSV bytes: header first, nulls as empty fields, `\n`
    /// record terminators. Deterministic for a fixed table.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(&self.columns)
            .map_err(|e| csv_encode_failed(e.to_string()))?;
        for row in &self.rows {
            let record = row.iter().map(|v| v.as_deref().unwrap_or(""));
            writer
                .write_record(record)
                .map_err(|e| csv_encode_failed(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| csv_encode_failed(e.to_string()))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row. The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Trim leading/trailing whitespace from every column name. Idempotent.
    pub(crate) fn trim_column_names(&mut self) {
        for column in &mut self.columns {
            let trimmed = column.trim();
            if trimmed.len() != column.len() {
                *column = trimmed.to_string();
            }
        }
    }

    /// Rename a column if present. Returns whether a rename happened.
    pub(crate) fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Append a column whose value is null in every row, returning its index.
    pub(crate) fn push_null_column(&mut self, name: &str) -> usize {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.columns.len() - 1
    }
}
