//! Row cursors and column descriptions.

use crate::error::Result;
use crate::value::Value;
use std::collections::VecDeque;

/// Declared type name that marks a geometry column.
pub const GEOMETRY_TYPE_NAME: &str = "geometry";

/// One column of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name as reported by the backend.
    pub name: String,
    /// Declared logical type name (e.g. "INTEGER", "GEOMETRY").
    pub type_name: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Geometry-typed column.
    pub fn geometry(name: impl Into<String>) -> Self {
        Self::new(name, "GEOMETRY")
    }

    /// True when the declared type is `geometry` (any case).
    pub fn is_geometry(&self) -> bool {
        self.type_name.eq_ignore_ascii_case(GEOMETRY_TYPE_NAME)
    }
}

/// A forward-only row cursor.
///
/// Dropping the cursor releases it; callers never need an explicit close.
pub trait Rows {
    /// Columns of every row, in order.
    fn columns(&self) -> &[ColumnInfo];

    /// Advance to the next row. `Ok(None)` once exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<Value>>>;

    /// Index of the column named `name`, compared case-insensitively.
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns()
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}

impl<R: Rows + ?Sized> Rows for Box<R> {
    fn columns(&self) -> &[ColumnInfo] {
        (**self).columns()
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        (**self).next_row()
    }
}

/// Fully materialized rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    columns: Vec<ColumnInfo>,
    rows: VecDeque<Vec<Value>>,
}

impl MemoryRows {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self {
            columns,
            rows: VecDeque::new(),
        }
    }

    /// Append a row. Short rows are padded with nulls.
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.push(row);
        self
    }

    pub fn push(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push_back(row);
    }

    /// Number of rows not yet pulled.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Rows for MemoryRows {
    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        Ok(self.rows.pop_front())
    }
}
