//! Flatten a labeled matrix into (row label, column label, value) rows.

use super::{CellValue, LabeledMatrix, MatrixInput};
use crate::error::Result;
use crate::table::{Column, Table};

/// Options for [`reshape_longer_matrix`].
#[derive(Debug, Clone, PartialEq)]
pub struct LongerOptions {
    /// Names of the two label columns. Defaults to the matrix's dimension
    /// names, then to `Var1`/`Var2`.
    pub varnames: Option<[String; 2]>,

    /// Drop rows whose value is NA (default: false).
    pub na_rm: bool,

    /// Name of the value column (default: `"value"`).
    pub value_name: String,

    /// Put column labels in the first label column and row labels in the
    /// second (default: false). Row order is unaffected.
    pub rev: bool,
}

impl Default for LongerOptions {
    fn default() -> Self {
        Self {
            varnames: None,
            na_rm: false,
            value_name: "value".to_string(),
            rev: false,
        }
    }
}

impl LongerOptions {
    /// Options with defaults: `Var1`/`Var2` labels, `value`, NA kept.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names for the row-label and column-label output columns.
    pub fn varnames(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.varnames = Some([first.into(), second.into()]);
        self
    }

    /// Drop NA cells from the output.
    pub fn na_rm(mut self, na_rm: bool) -> Self {
        self.na_rm = na_rm;
        self
    }

    /// Name of the value column.
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = name.into();
        self
    }

    /// Swap which label set lands in which named column.
    pub fn rev(mut self, rev: bool) -> Self {
        self.rev = rev;
        self
    }
}

/// Flatten every cell of `mat` into one row of a long table.
///
/// Cells are visited column by column, so the row label varies fastest.
/// Unlabeled axes use 1-based positions as labels.
///
/// # Errors
///
/// Returns [`ReshapeError::Shape`](crate::ReshapeError::Shape) if the
/// label and value column names collide.
pub fn reshape_longer_matrix<T: CellValue>(
    mat: &LabeledMatrix<T>,
    options: &LongerOptions,
) -> Result<Table> {
    let row_labels = mat.row_labels_or_positions();
    let col_labels = mat.col_labels_or_positions();

    let capacity = mat.nrows() * mat.ncols();
    let mut row_side = Vec::with_capacity(capacity);
    let mut col_side = Vec::with_capacity(capacity);
    let mut cells = Vec::with_capacity(capacity);

    for (j, col_label) in col_labels.iter().enumerate() {
        for (i, row_label) in row_labels.iter().enumerate() {
            let cell = &mat.data()[(i, j)];
            if options.na_rm && cell.is_na() {
                continue;
            }
            row_side.push(row_label.as_str());
            col_side.push(col_label.as_str());
            cells.push(cell.clone());
        }
    }

    let [first_name, second_name] = options
        .varnames
        .clone()
        .or_else(|| mat.dim_names().cloned())
        .unwrap_or_else(|| ["Var1".to_string(), "Var2".to_string()]);
    let (first, second) = if options.rev {
        (col_side, row_side)
    } else {
        (row_side, col_side)
    };

    Table::new(
        vec![first_name, second_name, options.value_name.clone()],
        vec![
            Column::from_strs(&first),
            Column::from_strs(&second),
            T::into_column(cells),
        ],
    )
}

/// Flatten any supported matrix input.
///
/// Tables are read as numeric matrices first; vectors are rejected with
/// [`ReshapeError::Shape`](crate::ReshapeError::Shape).
pub fn reshape_longer(input: impl Into<MatrixInput>, options: &LongerOptions) -> Result<Table> {
    let mat = input.into().into_matrix()?;
    reshape_longer_matrix(&mat, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReshapeError;
    use crate::table::Value;

    fn two_by_three() -> LabeledMatrix<f64> {
        LabeledMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, f64::NAN, 6.0]])
            .unwrap()
            .with_labels(vec!["r1", "r2"], vec!["c1", "c2", "c3"])
            .unwrap()
    }

    #[test]
    fn test_row_label_varies_fastest() {
        let long = reshape_longer_matrix(&two_by_three(), &LongerOptions::new()).unwrap();

        assert_eq!(long.names(), &["Var1", "Var2", "value"]);
        assert_eq!(long.row_count(), 6);
        assert_eq!(
            long.column("Var1").unwrap(),
            &Column::from_strs(&["r1", "r2", "r1", "r2", "r1", "r2"])
        );
        assert_eq!(
            long.column("Var2").unwrap(),
            &Column::from_strs(&["c1", "c1", "c2", "c2", "c3", "c3"])
        );
        assert_eq!(long.get(1, "value"), Some(Value::Number(4.0)));
        assert_eq!(long.get(3, "value"), Some(Value::Missing));
    }

    #[test]
    fn test_na_rm_preserves_order() {
        let options = LongerOptions::new().na_rm(true).value_name("r");
        let long = reshape_longer_matrix(&two_by_three(), &options).unwrap();

        assert_eq!(long.row_count(), 5);
        assert_eq!(
            long.column("r").unwrap(),
            &Column::from_f64(vec![1.0, 4.0, 2.0, 3.0, 6.0])
        );
    }

    #[test]
    fn test_rev_swaps_label_columns_only() {
        let options = LongerOptions::new().varnames("a", "b").rev(true);
        let long = reshape_longer_matrix(&two_by_three(), &options).unwrap();

        assert_eq!(long.names(), &["a", "b", "value"]);
        assert_eq!(long.get(0, "a"), Some(Value::from("c1")));
        assert_eq!(long.get(0, "b"), Some(Value::from("r1")));
        assert_eq!(long.get(1, "a"), Some(Value::from("c1")));
        assert_eq!(long.get(1, "b"), Some(Value::from("r2")));
    }

    #[test]
    fn test_unlabeled_axes_use_positions_and_dim_names() {
        let mat = LabeledMatrix::from_rows(vec![vec![Some("a".to_string()), None]])
            .unwrap()
            .with_dim_names("row", "col");
        let long = reshape_longer_matrix(&mat, &LongerOptions::new()).unwrap();

        assert_eq!(long.names(), &["row", "col", "value"]);
        assert_eq!(long.get(1, "col"), Some(Value::from("2")));
        assert_eq!(long.get(1, "value"), Some(Value::Missing));
    }

    #[test]
    fn test_vector_input_rejected() {
        let err = reshape_longer(vec![1.0, 2.0], &LongerOptions::new()).unwrap_err();
        assert!(matches!(err, ReshapeError::Shape(_)));
    }
}
