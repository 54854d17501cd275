//! Design matrices: source-column names indexed by variable name.
//!
//! A square design (effect sizes, sample sizes) is indexed by variable on
//! both axes and read through its lower triangle: `design[y, x]` names the
//! column holding the statistic for the pair `(x, y)`. A per-variable design
//! (other statistics) has variables on rows and statistic labels on columns.

use std::collections::HashSet;

use nalgebra::DMatrix;

use crate::error::{ReshapeError, Result};
use crate::matrix::{triangle_cells, triangle_len, LabeledMatrix};
use crate::table::{Column, Table};

/// A labeled matrix of optional source-column names.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    cells: LabeledMatrix<Option<String>>,
}

impl DesignMatrix {
    /// Build from row-major cells.
    ///
    /// ```
    /// use corr_reshape::DesignMatrix;
    ///
    /// let other = DesignMatrix::new(
    ///     &["A", "B"],
    ///     &["mean", "sd"],
    ///     vec![vec![Some("mean_a"), Some("sd_a")], vec![Some("mean_b"), None]],
    /// )
    /// .unwrap();
    /// assert_eq!(other.get_named("B", "mean"), Some("mean_b"));
    /// ```
    pub fn new<S: AsRef<str>>(
        row_names: &[S],
        col_names: &[S],
        rows: Vec<Vec<Option<&str>>>,
    ) -> Result<Self> {
        let owned: Vec<Vec<Option<String>>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(|c| c.map(str::to_string)).collect())
            .collect();
        let cells = LabeledMatrix::from_rows(owned)?;
        if cells.nrows() != row_names.len() || (cells.nrows() > 0 && cells.ncols() != col_names.len()) {
            return Err(ReshapeError::shape(format!(
                "design cells are {}x{}, labels are {}x{}",
                cells.nrows(),
                cells.ncols(),
                row_names.len(),
                col_names.len()
            )));
        }
        let cells = if cells.nrows() == 0 {
            LabeledMatrix::new(DMatrix::from_element(0, col_names.len(), None))
        } else {
            cells
        };
        Self::labeled(cells, to_strings(row_names), to_strings(col_names))
    }

    /// Square design from strict-lower-triangle cells in column-major order,
    /// the same order [`MatrixAssembler`](crate::MatrixAssembler) fills.
    ///
    /// ```
    /// use corr_reshape::DesignMatrix;
    ///
    /// let es = DesignMatrix::from_lower_triangle(&["A", "B", "C"], &[Some("r_ab"), Some("r_ac"), None])
    ///     .unwrap();
    /// assert_eq!(es.get_named("C", "A"), Some("r_ac"));
    /// assert_eq!(es.get_named("C", "B"), None);
    /// ```
    pub fn from_lower_triangle<S: AsRef<str>>(names: &[S], cells: &[Option<&str>]) -> Result<Self> {
        let n = names.len();
        if cells.len() != triangle_len(n, false) {
            return Err(ReshapeError::shape(format!(
                "{} lower-triangle cells given for {n} variables, expected {}",
                cells.len(),
                triangle_len(n, false)
            )));
        }
        let mut data = DMatrix::from_element(n, n, None);
        for (&(i, j), cell) in triangle_cells(n, false, false).iter().zip(cells) {
            data[(i, j)] = cell.map(str::to_string);
        }
        let names = to_strings(names);
        Self::labeled(LabeledMatrix::new(data), names.clone(), names)
    }

    /// Read a table of text columns as a design; row names label the rows.
    ///
    /// # Errors
    ///
    /// [`ReshapeError::Configuration`] if the table has no row names or a
    /// column is not text.
    pub fn from_table(table: &Table) -> Result<Self> {
        let row_names = table
            .row_names()
            .ok_or_else(|| ReshapeError::config("design table must carry variable names as row names"))?
            .to_vec();
        let mut text = Vec::with_capacity(table.col_count());
        for (name, column) in table.names().iter().zip(table.columns()) {
            let values = match column {
                Column::Text(values) => values,
                Column::Number(values) if values.iter().all(Option::is_none) => {
                    text.push(vec![None; values.len()]);
                    continue;
                }
                Column::Number(_) => {
                    return Err(ReshapeError::config(format!(
                        "design must be a matrix of column names; column {name:?} is numeric"
                    )))
                }
            };
            text.push(values.clone());
        }
        let data = DMatrix::from_fn(table.row_count(), table.col_count(), |i, j| text[j][i].clone());
        Self::labeled(LabeledMatrix::new(data), row_names, table.names().to_vec())
    }

    fn labeled(
        cells: LabeledMatrix<Option<String>>,
        row_names: Vec<String>,
        col_names: Vec<String>,
    ) -> Result<Self> {
        check_unique(&row_names, "row")?;
        check_unique(&col_names, "column")?;
        Ok(Self {
            cells: cells.with_labels(row_names, col_names)?,
        })
    }

    /// Number of variables (rows).
    pub fn nrows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of design columns.
    pub fn ncols(&self) -> usize {
        self.cells.ncols()
    }

    /// Variable names.
    pub fn row_names(&self) -> &[String] {
        self.cells.row_labels().unwrap_or_default()
    }

    /// Column labels: variable names for square designs, statistic labels otherwise.
    pub fn col_names(&self) -> &[String] {
        self.cells.col_labels().unwrap_or_default()
    }

    /// Underlying labeled matrix, e.g. for flattening.
    pub fn as_matrix(&self) -> &LabeledMatrix<Option<String>> {
        &self.cells
    }

    /// Row position of a variable.
    pub fn row_index(&self, name: &str) -> Option<usize> {
        self.row_names().iter().position(|n| n == name)
    }

    /// Position of a column label.
    pub fn col_index(&self, name: &str) -> Option<usize> {
        self.col_names().iter().position(|n| n == name)
    }

    /// Cell by position.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row, col).and_then(|c| c.as_deref())
    }

    /// Cell by row and column name.
    pub fn get_named(&self, row: &str, col: &str) -> Option<&str> {
        self.cells.get_labeled(row, col).and_then(|c| c.as_deref())
    }

    /// Non-NA cells of one row as `(column label, source column)`.
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.col_names()
            .iter()
            .enumerate()
            .filter_map(move |(j, label)| self.get(row, j).map(|src| (label.as_str(), src)))
    }

    /// Every non-NA cell, column by column.
    pub fn referenced_columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.data().iter().filter_map(|c| c.as_deref())
    }

    /// Set cells naming any of `columns` to NA.
    pub fn clear_columns(&mut self, columns: &HashSet<String>) {
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                if self.get(i, j).is_some_and(|c| columns.contains(c)) {
                    self.cells.set(i, j, None);
                }
            }
        }
    }

    /// Row and column names are the same set, irrespective of order.
    pub fn is_symmetric_design(&self) -> bool {
        self.nrows() == self.ncols() && name_set(self.row_names()) == name_set(self.col_names())
    }

    /// Require a square design whose axes carry the same names.
    pub fn validate_square(&self, what: &str) -> Result<()> {
        if self.nrows() != self.ncols() {
            return Err(ReshapeError::shape(format!(
                "{what} must be square, got {}x{}",
                self.nrows(),
                self.ncols()
            )));
        }
        if !self.is_symmetric_design() {
            return Err(ReshapeError::shape(format!(
                "{what} must have identical row and column names"
            )));
        }
        Ok(())
    }

    /// Append NA rows for `rows` and NA columns for `cols` not already present.
    pub fn pad(&self, rows: &[String], cols: &[String]) -> Result<Self> {
        let mut row_names = self.row_names().to_vec();
        row_names.extend(rows.iter().filter(|n| self.row_index(n).is_none()).cloned());
        let mut col_names = self.col_names().to_vec();
        col_names.extend(cols.iter().filter(|n| self.col_index(n).is_none()).cloned());

        let (r, c) = (self.nrows(), self.ncols());
        let data = DMatrix::from_fn(row_names.len(), col_names.len(), |i, j| {
            if i < r && j < c {
                self.cells.data()[(i, j)].clone()
            } else {
                None
            }
        });
        Self::labeled(LabeledMatrix::new(data), row_names, col_names)
    }

    /// Reorder rows to follow `order`, which must be a permutation of the
    /// row names.
    pub fn reorder_rows(&self, order: &[String]) -> Result<Self> {
        if name_set(order) != name_set(self.row_names()) || order.len() != self.nrows() {
            return Err(ReshapeError::shape(
                "row order must be a permutation of the design's row names",
            ));
        }
        let positions: Vec<usize> = order.iter().filter_map(|n| self.row_index(n)).collect();
        let data = DMatrix::from_fn(self.nrows(), self.ncols(), |i, j| {
            self.cells.data()[(positions[i], j)].clone()
        });
        Self::labeled(LabeledMatrix::new(data), order.to_vec(), self.col_names().to_vec())
    }
}

/// Pad an effect-size design and a per-variable design to the union of their
/// variable names, then put `other` rows in `es` row order.
///
/// New names are appended in first-seen order and every new cell is NA.
pub fn reconcile(es: &DesignMatrix, other: &DesignMatrix) -> Result<(DesignMatrix, DesignMatrix)> {
    let mut union = es.row_names().to_vec();
    union.extend(
        other
            .row_names()
            .iter()
            .filter(|n| es.row_index(n).is_none())
            .cloned(),
    );
    if union.len() != es.nrows() || union.len() != other.nrows() {
        tracing::debug!(
            es = es.nrows(),
            other = other.nrows(),
            union = union.len(),
            "padding design matrices to a common variable set"
        );
    }
    let es = es.pad(&union, &union)?;
    let other = other.pad(&union, &[])?.reorder_rows(es.row_names())?;
    Ok((es, other))
}

fn name_set(names: &[String]) -> HashSet<&str> {
    names.iter().map(String::as_str).collect()
}

fn to_strings<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names.iter().map(|s| s.as_ref().to_string()).collect()
}

fn check_unique(names: &[String], axis: &str) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    match names.iter().find(|n| !seen.insert(n.as_str())) {
        Some(dup) => Err(ReshapeError::shape(format!("duplicate design {axis} name {dup:?}"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn es_abc() -> DesignMatrix {
        DesignMatrix::from_lower_triangle(&["A", "B", "C"], &[Some("r_ab"), Some("r_ac"), Some("r_bc")])
            .unwrap()
    }

    fn other_abd() -> DesignMatrix {
        DesignMatrix::new(
            &["D", "A", "B"],
            &["mean"],
            vec![vec![Some("m_d")], vec![Some("m_a")], vec![None]],
        )
        .unwrap()
    }

    #[test]
    fn test_lower_triangle_layout() {
        let es = es_abc();
        assert_eq!(es.get_named("B", "A"), Some("r_ab"));
        assert_eq!(es.get_named("A", "B"), None);
        assert_eq!(es.get_named("C", "B"), Some("r_bc"));
        assert!(es.validate_square("es_design").is_ok());
    }

    #[test]
    fn test_validate_square_rejects_mismatched_names() {
        let design = DesignMatrix::new(
            &["A", "B"],
            &["A", "C"],
            vec![vec![None, None], vec![Some("r"), None]],
        )
        .unwrap();
        assert!(matches!(design.validate_square("es_design"), Err(ReshapeError::Shape(_))));

        let wide = DesignMatrix::new(&["A"], &["A", "B"], vec![vec![None, None]]).unwrap();
        assert!(matches!(wide.validate_square("es_design"), Err(ReshapeError::Shape(_))));
    }

    #[test]
    fn test_reconcile_pads_to_union() {
        let (es, other) = reconcile(&es_abc(), &other_abd()).unwrap();

        assert_eq!(es.row_names(), &["A", "B", "C", "D"]);
        assert_eq!(es.col_names(), &["A", "B", "C", "D"]);
        assert_eq!(other.row_names(), &["A", "B", "C", "D"]);
        for name in ["A", "B", "C", "D"] {
            assert_eq!(es.get_named("D", name), None);
            assert_eq!(es.get_named(name, "D"), None);
        }
        assert_eq!(other.get_named("C", "mean"), None);
        assert_eq!(other.get_named("D", "mean"), Some("m_d"));
        assert_eq!(other.get_named("A", "mean"), Some("m_a"));
        assert_eq!(es.get_named("B", "A"), Some("r_ab"));
    }

    #[test]
    fn test_clear_columns() {
        let mut es = es_abc();
        let missing: HashSet<String> = ["r_ac".to_string()].into_iter().collect();
        es.clear_columns(&missing);
        assert_eq!(es.get_named("C", "A"), None);
        assert_eq!(es.referenced_columns().collect::<Vec<_>>(), vec!["r_ab", "r_bc"]);
    }

    #[test]
    fn test_from_table_requires_text_and_row_names() {
        let table = Table::new(vec!["mean"], vec![Column::from_strs(&["m_a", "m_b"])]).unwrap();
        assert!(matches!(
            DesignMatrix::from_table(&table),
            Err(ReshapeError::Configuration(_))
        ));

        let named = table.clone().with_row_names(vec!["A", "B"]).unwrap();
        let design = DesignMatrix::from_table(&named).unwrap();
        assert_eq!(design.get_named("B", "mean"), Some("m_b"));

        let numeric = Table::new(vec!["mean"], vec![Column::from_f64(vec![1.0, 2.0])])
            .unwrap()
            .with_row_names(vec!["A", "B"])
            .unwrap();
        assert!(matches!(
            DesignMatrix::from_table(&numeric),
            Err(ReshapeError::Configuration(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = DesignMatrix::from_lower_triangle(&["A", "A"], &[Some("r")]).unwrap_err();
        assert!(matches!(err, ReshapeError::Shape(_)));
    }
}
