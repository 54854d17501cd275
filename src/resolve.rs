//! Literal-or-column arguments and their resolution against a source table.
//!
//! Arguments that may either carry a value directly or name columns of a
//! source table are typed as [`Arg`]. A [`ColumnResolver`] turns column
//! references into table slices; [`Table`] is the resolver shipped with the
//! crate.

use crate::error::{ReshapeError, Result};
use crate::matrix::{LabeledMatrix, MatrixInput};
use crate::table::Table;

/// A literal value, or the names of source columns holding it.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg<T> {
    /// Use this value as given.
    Value(T),
    /// Look these columns up in the source table.
    Columns(Vec<String>),
}

impl<T> Arg<T> {
    /// Reference a single source column.
    pub fn column(name: impl Into<String>) -> Self {
        Arg::Columns(vec![name.into()])
    }

    /// Reference several source columns, in order.
    pub fn columns<S: AsRef<str>>(names: &[S]) -> Self {
        Arg::Columns(names.iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// Produce the literal value, resolving column references through
    /// `source` and converting the resolved slice with `convert`.
    ///
    /// # Errors
    ///
    /// [`ReshapeError::Configuration`] if columns are referenced without a
    /// source; whatever the resolver or `convert` return otherwise.
    pub fn resolve<F>(self, source: Option<&dyn ColumnResolver>, convert: F) -> Result<T>
    where
        F: FnOnce(Table) -> Result<T>,
    {
        match self {
            Arg::Value(value) => Ok(value),
            Arg::Columns(names) => {
                let source = source.ok_or_else(|| {
                    ReshapeError::config(format!(
                        "columns {names:?} referenced but no source table was supplied"
                    ))
                })?;
                convert(source.resolve_columns(&names)?)
            }
        }
    }
}

impl<T> From<T> for Arg<T> {
    fn from(value: T) -> Self {
        Arg::Value(value)
    }
}

/// Resolves column references to concrete data.
pub trait ColumnResolver {
    /// Slice the named columns, in order, into a new table.
    fn resolve_columns(&self, names: &[String]) -> Result<Table>;

    /// Slice the named numeric columns as a matrix.
    fn resolve_matrix(&self, names: &[String]) -> Result<LabeledMatrix<Option<f64>>> {
        MatrixInput::Table(self.resolve_columns(names)?).into_matrix()
    }
}

impl ColumnResolver for Table {
    fn resolve_columns(&self, names: &[String]) -> Result<Table> {
        self.select(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn source() -> Table {
        Table::new(
            vec!["var", "x", "y"],
            vec![
                Column::from_strs(&["x", "y"]),
                Column::from_f64(vec![1.0, 0.5]),
                Column::from_f64(vec![0.5, 1.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_literal_passes_through() {
        let arg: Arg<usize> = 7.into();
        assert_eq!(arg.resolve(None, |_| Ok(0)), Ok(7));
    }

    #[test]
    fn test_columns_without_source() {
        let arg: Arg<usize> = Arg::column("x");
        let err = arg.resolve(None, |_| Ok(0)).unwrap_err();
        assert!(matches!(err, ReshapeError::Configuration(_)));
    }

    #[test]
    fn test_resolve_matrix() {
        let table = source();
        let m = table.resolve_matrix(&["x".to_string(), "y".to_string()]).unwrap();
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.get(0, 1), Some(&Some(0.5)));
    }

    #[test]
    fn test_unknown_column_is_shape_error() {
        let table = source();
        let arg: Arg<Table> = Arg::column("missing");
        let err = arg.resolve(Some(&table), Ok).unwrap_err();
        assert!(matches!(err, ReshapeError::Shape(_)));
    }
}
