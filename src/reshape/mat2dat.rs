//! Journal-style correlation matrices to long pairwise tables.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::{ReshapeError, Result};
use crate::matrix::{reshape_longer_matrix, LongerOptions, MatrixInput};
use crate::resolve::{Arg, ColumnResolver};
use crate::table::{Column, Table, Value};

/// The ways per-variable or per-dataset attributes may be supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeInput {
    /// One value shared by every variable.
    Scalar(Value),
    /// One value per variable, unnamed.
    Vector(Column),
    /// One row per variable, named columns.
    Table(Table),
}

impl AttributeInput {
    /// Normalize to an `n`-row table; unnamed inputs get `generic_name`.
    fn into_table(self, n: usize, generic_name: &str) -> Result<Table> {
        let table = match self {
            AttributeInput::Scalar(value) => {
                Table::new(vec![generic_name], vec![Column::repeat(&value, n)])?
            }
            AttributeInput::Vector(column) => Table::new(vec![generic_name], vec![column])?,
            AttributeInput::Table(table) => table,
        };
        if table.row_count() != n {
            return Err(ReshapeError::shape(format!(
                "{generic_name} has {} rows, expected one per variable ({n})",
                table.row_count()
            )));
        }
        Ok(table)
    }
}

impl From<Value> for AttributeInput {
    fn from(value: Value) -> Self {
        AttributeInput::Scalar(value)
    }
}

impl From<f64> for AttributeInput {
    fn from(value: f64) -> Self {
        AttributeInput::Scalar(value.into())
    }
}

impl From<Column> for AttributeInput {
    fn from(column: Column) -> Self {
        AttributeInput::Vector(column)
    }
}

impl From<Vec<f64>> for AttributeInput {
    fn from(values: Vec<f64>) -> Self {
        AttributeInput::Vector(Column::from_f64(values))
    }
}

impl From<Table> for AttributeInput {
    fn from(table: Table) -> Self {
        AttributeInput::Table(table)
    }
}

/// Builder that extracts the populated triangle of a correlation matrix into
/// one row per variable pair.
///
/// The output has columns `x_name, y_name, rxyi`, then the common-data
/// columns, then the unique-data columns suffixed `_x`, then `_y`.
///
/// ```
/// use corr_reshape::{reshape_vec2mat, MatToLong};
///
/// let cor = reshape_vec2mat(&[0.3, 0.4, 0.5], &["X", "Y", "Z"]).unwrap();
/// let long = MatToLong::new(cor)
///     .var_names(&["X", "Y", "Z"])
///     .unique_data(vec![10.0, 20.0, 30.0])
///     .run()
///     .unwrap();
/// assert_eq!(long.row_count(), 3);
/// assert_eq!(long.names(), &["x_name", "y_name", "rxyi", "unique_data_x", "unique_data_y"]);
/// ```
pub struct MatToLong<'a> {
    var_names: Option<Arg<Vec<String>>>,
    cor_data: Arg<MatrixInput>,
    common_data: Option<Arg<AttributeInput>>,
    unique_data: Option<Arg<AttributeInput>>,
    diag_label: Option<String>,
    lower_tri: bool,
    data: Option<&'a dyn ColumnResolver>,
    config: Config,
}

impl<'a> MatToLong<'a> {
    /// Start from a literal correlation matrix.
    pub fn new(cor_data: impl Into<MatrixInput>) -> Self {
        Self::with_cor_arg(Arg::Value(cor_data.into()))
    }

    /// Start from correlation columns of the source table given to
    /// [`data`](Self::data).
    pub fn from_columns<S: AsRef<str>>(cor_columns: &[S]) -> Self {
        Self::with_cor_arg(Arg::columns(cor_columns))
    }

    fn with_cor_arg(cor_data: Arg<MatrixInput>) -> Self {
        Self {
            var_names: None,
            cor_data,
            common_data: None,
            unique_data: None,
            diag_label: None,
            lower_tri: true,
            data: None,
            config: Config::default(),
        }
    }

    /// Variable names, one per matrix row.
    pub fn var_names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.var_names = Some(Arg::Value(names.iter().map(|s| s.as_ref().to_string()).collect()));
        self
    }

    /// Take variable names from a source column.
    pub fn var_names_from(mut self, column: impl Into<String>) -> Self {
        self.var_names = Some(Arg::column(column));
        self
    }

    /// Attributes shared by both members of a pair, looked up by `x_name`.
    pub fn common_data(mut self, data: impl Into<AttributeInput>) -> Self {
        self.common_data = Some(Arg::Value(data.into()));
        self
    }

    /// Take common attributes from source columns.
    pub fn common_data_from<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.common_data = Some(Arg::columns(columns));
        self
    }

    /// Per-variable attributes, emitted once per side.
    pub fn unique_data(mut self, data: impl Into<AttributeInput>) -> Self {
        self.unique_data = Some(Arg::Value(data.into()));
        self
    }

    /// Take unique attributes from source columns.
    pub fn unique_data_from<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.unique_data = Some(Arg::columns(columns));
        self
    }

    /// Keep the matrix diagonal as a unique-data column with this name.
    pub fn diag_label(mut self, label: impl Into<String>) -> Self {
        self.diag_label = Some(label.into());
        self
    }

    /// Whether the populated triangle is the lower one (default: true).
    pub fn lower_tri(mut self, lower_tri: bool) -> Self {
        self.lower_tri = lower_tri;
        self
    }

    /// Source table for column references.
    pub fn data(mut self, source: &'a dyn ColumnResolver) -> Self {
        self.data = Some(source);
        self
    }

    /// Override naming defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the long table.
    ///
    /// # Errors
    ///
    /// - [`ReshapeError::Shape`] if the matrix is not n×n for n variable
    ///   names, names repeat, or attribute tables do not have n rows.
    /// - [`ReshapeError::Configuration`] if variable names are missing or
    ///   columns are referenced without a source table.
    pub fn run(self) -> Result<Table> {
        let source = self.data;
        let config = &self.config;

        let var_names = self
            .var_names
            .ok_or_else(|| ReshapeError::config("var_names is required"))?
            .resolve(source, names_from_table)?;
        let index = index_names(&var_names)?;
        let n = var_names.len();

        let mut cor = self
            .cor_data
            .resolve(source, |t| Ok(MatrixInput::Table(t)))?
            .into_matrix()?;
        if cor.nrows() != n || cor.ncols() != n {
            return Err(ReshapeError::shape(format!(
                "cor_data is {}x{}, expected {n}x{n} for {n} variable names",
                cor.nrows(),
                cor.ncols()
            )));
        }
        if !self.lower_tri {
            cor = cor.transpose();
        }

        let common = resolve_attributes(self.common_data, source, n, "common_data")?;
        let mut unique = resolve_attributes(self.unique_data, source, n, "unique_data")?;
        if let Some(label) = &self.diag_label {
            unique.push_column(label.clone(), Column::Number(cor.diagonal()))?;
        }

        for j in 0..n {
            for i in 0..=j {
                cor.set(i, j, None);
            }
        }
        let cor = cor.with_labels(var_names.clone(), var_names.clone())?;
        let common = common.with_row_names(var_names.clone())?;
        let unique = unique.with_row_names(var_names.clone())?;

        let options = LongerOptions::new()
            .varnames(config.x_label.clone(), config.y_label.clone())
            .na_rm(true)
            .value_name(config.es_name.clone())
            .rev(true);
        let long = reshape_longer_matrix(&cor, &options)?;

        let x_rows = label_positions(&long, &config.x_label, &index)?;
        let y_rows = label_positions(&long, &config.y_label, &index)?;

        let out = Table::hstack(&[
            long,
            common.take_rows(&x_rows),
            unique.take_rows(&x_rows).with_suffix(&config.x_suffix),
            unique.take_rows(&y_rows).with_suffix(&config.y_suffix),
        ])?
        .reset_row_names();

        tracing::debug!(variables = n, pairs = out.row_count(), "matrix reshaped to long format");
        Ok(out)
    }
}

/// Extract the populated lower triangle of `cor_data` with default options.
///
/// Shorthand for `MatToLong::new(cor_data).var_names(var_names).run()`.
pub fn reshape_mat2dat<S: AsRef<str>>(
    var_names: &[S],
    cor_data: impl Into<MatrixInput>,
) -> Result<Table> {
    MatToLong::new(cor_data).var_names(var_names).run()
}

fn names_from_table(table: Table) -> Result<Vec<String>> {
    if table.col_count() != 1 {
        return Err(ReshapeError::shape(format!(
            "var_names must resolve to one column, got {}",
            table.col_count()
        )));
    }
    table.columns()[0]
        .to_text()
        .into_iter()
        .map(|name| name.ok_or_else(|| ReshapeError::shape("variable names must not be NA")))
        .collect()
}

fn index_names(names: &[String]) -> Result<HashMap<&str, usize>> {
    if names.is_empty() {
        return Err(ReshapeError::shape("at least one variable name is required"));
    }
    let mut index = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if index.insert(name.as_str(), i).is_some() {
            return Err(ReshapeError::shape(format!("duplicate variable name {name:?}")));
        }
    }
    Ok(index)
}

fn resolve_attributes(
    arg: Option<Arg<AttributeInput>>,
    source: Option<&dyn ColumnResolver>,
    n: usize,
    generic_name: &str,
) -> Result<Table> {
    match arg {
        Some(arg) => arg
            .resolve(source, |t| Ok(AttributeInput::Table(t)))?
            .into_table(n, generic_name),
        None => Ok(Table::with_rows(n)),
    }
}

fn label_positions(long: &Table, label: &str, index: &HashMap<&str, usize>) -> Result<Vec<usize>> {
    let labels = long
        .column(label)
        .and_then(Column::as_text)
        .ok_or_else(|| ReshapeError::shape(format!("flattened matrix lacks label column {label:?}")))?;
    labels
        .iter()
        .map(|l| {
            l.as_deref()
                .and_then(|l| index.get(l).copied())
                .ok_or_else(|| ReshapeError::shape(format!("unknown variable label {l:?}")))
        })
        .collect()
}
