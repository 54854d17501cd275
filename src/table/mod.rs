//! Rectangular tables of named, typed, nullable columns.
//!
//! This is the interchange format of the crate: every reshaper returns a
//! [`Table`], and the wide reshaper reads one. Row labels are optional; a
//! table without them is indexed `1..=row_count()`.

mod column;

pub use column::{Column, Value};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ReshapeError, Result};

/// A collection of equally long named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    row_names: Option<Vec<String>>,
}

impl Table {
    /// Build a table, checking lengths and name uniqueness.
    pub fn new<S: Into<String>>(names: Vec<S>, columns: Vec<Column>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != columns.len() {
            return Err(ReshapeError::shape(format!(
                "{} column names given for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let n_rows = columns.first().map_or(0, Column::len);
        let mut table = Self {
            names: Vec::with_capacity(names.len()),
            columns: Vec::with_capacity(columns.len()),
            n_rows,
            row_names: None,
        };
        for (name, column) in names.into_iter().zip(columns) {
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    /// Table with `n_rows` rows and no columns yet.
    pub fn with_rows(n_rows: usize) -> Self {
        Self {
            n_rows,
            ..Self::default()
        }
    }

    /// Attach row labels.
    pub fn with_row_names<S: Into<String>>(mut self, row_names: Vec<S>) -> Result<Self> {
        let row_names: Vec<String> = row_names.into_iter().map(Into::into).collect();
        if row_names.len() != self.n_rows {
            return Err(ReshapeError::shape(format!(
                "{} row names given for {} rows",
                row_names.len(),
                self.n_rows
            )));
        }
        self.row_names = Some(row_names);
        Ok(self)
    }

    /// Drop row labels so rows are indexed `1..=row_count()` again.
    pub fn reset_row_names(mut self) -> Self {
        self.row_names = None;
        self
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names, in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Columns, in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Row names, if set.
    pub fn row_names(&self) -> Option<&[String]> {
        self.row_names.as_deref()
    }

    /// Position of a column by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// Cell by row position and column name.
    pub fn get(&self, row: usize, name: &str) -> Option<Value> {
        self.column(name).map(|c| c.get(row))
    }

    /// Append a column. The first column of a table created empty fixes its
    /// row count.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(ReshapeError::shape(format!("duplicate column name {name:?}")));
        }
        if self.columns.is_empty() && self.row_names.is_none() && self.n_rows == 0 {
            self.n_rows = column.len();
        }
        if column.len() != self.n_rows {
            return Err(ReshapeError::shape(format!(
                "column {name:?} has {} rows, table has {}",
                column.len(),
                self.n_rows
            )));
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Keep only the named columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let mut out = Table::with_rows(self.n_rows);
        out.row_names = self.row_names.clone();
        for name in names {
            let name = name.as_ref();
            let column = self
                .column(name)
                .ok_or_else(|| ReshapeError::shape(format!("undefined column {name:?} selected")))?;
            out.push_column(name, column.clone())?;
        }
        Ok(out)
    }

    /// Gather rows by position, carrying row labels along.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
            n_rows: rows.len(),
            row_names: self
                .row_names
                .as_ref()
                .map(|rn| rows.iter().map(|&i| rn[i].clone()).collect()),
        }
    }

    /// Rename every column to `<name><suffix>`.
    pub fn with_suffix(mut self, suffix: &str) -> Table {
        for name in &mut self.names {
            name.push_str(suffix);
        }
        self
    }

    /// Bind tables side by side. Row labels of the first table are kept.
    pub fn hstack(tables: &[Table]) -> Result<Table> {
        let Some(first) = tables.first() else {
            return Ok(Table::default());
        };
        let mut out = Table::with_rows(first.n_rows);
        out.row_names = first.row_names.clone();
        for table in tables {
            if table.n_rows != first.n_rows {
                return Err(ReshapeError::shape(format!(
                    "cannot bind tables of {} and {} rows",
                    first.n_rows, table.n_rows
                )));
            }
            for (name, column) in table.names.iter().zip(&table.columns) {
                out.push_column(name.clone(), column.clone())?;
            }
        }
        Ok(out)
    }

    /// Stack tables vertically over the union of their column names.
    ///
    /// Columns appear in first-seen order; a table lacking a column
    /// contributes NA cells. Row labels are dropped.
    pub fn vstack(tables: &[Table]) -> Table {
        let mut seen = HashSet::new();
        let names: Vec<&String> = tables
            .iter()
            .flat_map(|t| t.names.iter())
            .filter(|n| seen.insert(n.as_str()))
            .collect();
        let n_rows = tables.iter().map(|t| t.n_rows).sum();

        let columns = names
            .iter()
            .map(|name| {
                let parts: Vec<Column> = tables
                    .iter()
                    .map(|t| {
                        t.column(name)
                            .cloned()
                            .unwrap_or_else(|| Column::missing(t.n_rows))
                    })
                    .collect();
                Column::concat(&parts)
            })
            .collect();

        Table {
            names: names.into_iter().cloned().collect(),
            columns,
            n_rows,
            row_names: None,
        }
    }
}
