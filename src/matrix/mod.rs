//! Labeled 2-D arrays and the triangular-matrix routines built on them.
//!
//! - [`LabeledMatrix`]: an `nalgebra::DMatrix` with optional labels per axis
//! - [`assemble`]: symmetric matrices from triangle vectors
//! - [`flatten`]: matrices to long (row label, column label, value) tables

pub mod assemble;
pub mod flatten;

use nalgebra::{DMatrix, Scalar};

use crate::error::{ReshapeError, Result};
use crate::table::{Column, Table};

pub use assemble::{reshape_vec2mat, MatrixAssembler};
pub use flatten::{reshape_longer, reshape_longer_matrix, LongerOptions};

/// Cell types a [`LabeledMatrix`] can be flattened from.
pub trait CellValue: Scalar {
    /// Whether this cell is NA.
    fn is_na(&self) -> bool;

    /// Collect cells into a table column.
    fn into_column(cells: Vec<Self>) -> Column;
}

impl CellValue for f64 {
    fn is_na(&self) -> bool {
        self.is_nan()
    }

    fn into_column(cells: Vec<Self>) -> Column {
        Column::from_f64(cells)
    }
}

impl CellValue for Option<f64> {
    fn is_na(&self) -> bool {
        self.map_or(true, f64::is_nan)
    }

    fn into_column(cells: Vec<Self>) -> Column {
        Column::Number(cells)
    }
}

impl CellValue for Option<String> {
    fn is_na(&self) -> bool {
        self.is_none()
    }

    fn into_column(cells: Vec<Self>) -> Column {
        Column::Text(cells)
    }
}

/// A dense matrix with optional row/column labels and dimension names.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix<T: Scalar> {
    data: DMatrix<T>,
    row_labels: Option<Vec<String>>,
    col_labels: Option<Vec<String>>,
    dim_names: Option<[String; 2]>,
}

impl<T: Scalar> LabeledMatrix<T> {
    /// Wrap an unlabeled matrix.
    pub fn new(data: DMatrix<T>) -> Self {
        Self {
            data,
            row_labels: None,
            col_labels: None,
            dim_names: None,
        }
    }

    /// Build from row-major nested vectors.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != ncols) {
            return Err(ReshapeError::shape(format!(
                "row {} has {} cells, expected {}",
                bad + 1,
                rows[bad].len(),
                ncols
            )));
        }
        let cells: Vec<T> = rows.into_iter().flatten().collect();
        Ok(Self::new(DMatrix::from_row_slice(nrows, ncols, &cells)))
    }

    /// Label both axes.
    pub fn with_labels<S: Into<String>>(self, rows: Vec<S>, cols: Vec<S>) -> Result<Self> {
        self.with_row_labels(rows)?.with_col_labels(cols)
    }

    /// Attach row labels; the count must match `nrows`.
    pub fn with_row_labels<S: Into<String>>(mut self, labels: Vec<S>) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.len() != self.nrows() {
            return Err(ReshapeError::shape(format!(
                "{} row labels for {} rows",
                labels.len(),
                self.nrows()
            )));
        }
        self.row_labels = Some(labels);
        Ok(self)
    }

    /// Attach column labels; the count must match `ncols`.
    pub fn with_col_labels<S: Into<String>>(mut self, labels: Vec<S>) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.len() != self.ncols() {
            return Err(ReshapeError::shape(format!(
                "{} column labels for {} columns",
                labels.len(),
                self.ncols()
            )));
        }
        self.col_labels = Some(labels);
        Ok(self)
    }

    /// Name the two axes; used as default label-column names when flattening.
    pub fn with_dim_names(mut self, rows: impl Into<String>, cols: impl Into<String>) -> Self {
        self.dim_names = Some([rows.into(), cols.into()]);
        self
    }

    /// The underlying nalgebra matrix.
    pub fn data(&self) -> &DMatrix<T> {
        &self.data
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// Whether the matrix is n×n.
    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// Row labels, if set.
    pub fn row_labels(&self) -> Option<&[String]> {
        self.row_labels.as_deref()
    }

    /// Column labels, if set.
    pub fn col_labels(&self) -> Option<&[String]> {
        self.col_labels.as_deref()
    }

    /// Names of the row and column dimensions, if set.
    pub fn dim_names(&self) -> Option<&[String; 2]> {
        self.dim_names.as_ref()
    }

    /// Row labels, or 1-based positions when unlabeled.
    pub fn row_labels_or_positions(&self) -> Vec<String> {
        labels_or_positions(self.row_labels.as_deref(), self.nrows())
    }

    /// Column labels, or 1-based positions when unlabeled.
    pub fn col_labels_or_positions(&self) -> Vec<String> {
        labels_or_positions(self.col_labels.as_deref(), self.ncols())
    }

    /// Cell by position.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.data.get((row, col))
    }

    /// Cell by row and column label.
    pub fn get_labeled(&self, row: &str, col: &str) -> Option<&T> {
        let i = self.row_labels.as_ref()?.iter().position(|l| l == row)?;
        let j = self.col_labels.as_ref()?.iter().position(|l| l == col)?;
        self.get(i, j)
    }

    /// Overwrite a cell by position.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[(row, col)] = value;
    }

    /// Swap axes together with their labels.
    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.transpose(),
            row_labels: self.col_labels.clone(),
            col_labels: self.row_labels.clone(),
            dim_names: self.dim_names.clone().map(|[r, c]| [c, r]),
        }
    }

    /// Main-diagonal cells.
    pub fn diagonal(&self) -> Vec<T> {
        let n = self.nrows().min(self.ncols());
        (0..n).map(|i| self.data[(i, i)].clone()).collect()
    }

    /// Apply `f` cell-wise, keeping labels.
    pub fn map<U: Scalar, F: FnMut(T) -> U>(&self, f: F) -> LabeledMatrix<U> {
        LabeledMatrix {
            data: self.data.map(f),
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels.clone(),
            dim_names: self.dim_names.clone(),
        }
    }
}

impl LabeledMatrix<Option<f64>> {
    /// Read a table of numeric columns as a matrix.
    ///
    /// Column names become column labels and row names (if any) row labels.
    pub fn from_table(table: &Table) -> Result<Self> {
        if table.col_count() == 0 {
            return Err(ReshapeError::shape("cannot read a table without columns as a matrix"));
        }
        let mut cells = Vec::with_capacity(table.row_count() * table.col_count());
        for (name, column) in table.names().iter().zip(table.columns()) {
            let values = column.as_numbers().ok_or_else(|| {
                ReshapeError::shape(format!("column {name:?} is not numeric"))
            })?;
            cells.extend_from_slice(values);
        }
        let data = DMatrix::from_column_slice(table.row_count(), table.col_count(), &cells);
        let mut matrix = Self::new(data).with_col_labels(table.names().to_vec())?;
        if let Some(rows) = table.row_names() {
            matrix = matrix.with_row_labels(rows.to_vec())?;
        }
        Ok(matrix)
    }
}

impl From<LabeledMatrix<f64>> for LabeledMatrix<Option<f64>> {
    fn from(m: LabeledMatrix<f64>) -> Self {
        m.map(|v| (!v.is_nan()).then_some(v))
    }
}

/// The ways a numeric matrix argument may be supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixInput {
    /// A matrix with NA cells.
    Matrix(LabeledMatrix<Option<f64>>),
    /// A table of numeric columns.
    Table(Table),
    /// A flat vector; not two-dimensional, rejected on conversion.
    Vector(Vec<Option<f64>>),
}

impl MatrixInput {
    /// Normalize to a matrix.
    pub fn into_matrix(self) -> Result<LabeledMatrix<Option<f64>>> {
        match self {
            MatrixInput::Matrix(m) => Ok(m),
            MatrixInput::Table(t) => LabeledMatrix::from_table(&t),
            MatrixInput::Vector(v) => Err(ReshapeError::shape(format!(
                "expected a matrix or table, got a vector of length {}",
                v.len()
            ))),
        }
    }
}

impl From<LabeledMatrix<Option<f64>>> for MatrixInput {
    fn from(m: LabeledMatrix<Option<f64>>) -> Self {
        MatrixInput::Matrix(m)
    }
}

impl From<LabeledMatrix<f64>> for MatrixInput {
    fn from(m: LabeledMatrix<f64>) -> Self {
        MatrixInput::Matrix(m.into())
    }
}

impl From<DMatrix<f64>> for MatrixInput {
    fn from(m: DMatrix<f64>) -> Self {
        LabeledMatrix::new(m).into()
    }
}

impl From<Table> for MatrixInput {
    fn from(t: Table) -> Self {
        MatrixInput::Table(t)
    }
}

impl From<Vec<f64>> for MatrixInput {
    fn from(v: Vec<f64>) -> Self {
        MatrixInput::Vector(v.into_iter().map(|x| (!x.is_nan()).then_some(x)).collect())
    }
}

/// Positions of a triangle of an `order`×`order` matrix in column-major order.
///
/// `upper` picks the triangle above the diagonal; `include_diag` adds the
/// diagonal cells.
pub(crate) fn triangle_cells(order: usize, include_diag: bool, upper: bool) -> Vec<(usize, usize)> {
    let mut cells = Vec::with_capacity(triangle_len(order, include_diag));
    for j in 0..order {
        for i in 0..order {
            let off_diag = if upper { i < j } else { i > j };
            let keep = off_diag || (include_diag && i == j);
            if keep {
                cells.push((i, j));
            }
        }
    }
    cells
}

/// Cell count of a triangle of an `order`×`order` matrix.
pub(crate) fn triangle_len(order: usize, include_diag: bool) -> usize {
    if include_diag {
        order * (order + 1) / 2
    } else {
        order * order.saturating_sub(1) / 2
    }
}

fn labels_or_positions(labels: Option<&[String]>, len: usize) -> Vec<String> {
    match labels {
        Some(l) => l.to_vec(),
        None => (1..=len).map(|i| i.to_string()).collect(),
    }
}
