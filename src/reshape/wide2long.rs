//! Wide study tables to long pairwise (or per-variable) tables, driven by
//! design matrices that name the source column of every statistic.

use std::collections::HashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::design::{reconcile, DesignMatrix};
use crate::config::{Config, MissingColAction};
use crate::error::{ReshapeError, Result};
use crate::table::{Column, Table, Value};

/// Where sample sizes come from in pairwise mode.
#[derive(Debug, Clone, PartialEq)]
pub enum NDesign {
    /// One source column shared by every pair.
    Column(String),
    /// A square design shaped like the effect-size design.
    Matrix(DesignMatrix),
}

/// Builder for the design-driven wide-to-long reshape.
///
/// Every source row yields one output row per emitted pair (pairwise mode)
/// or per variable (variable-only mode, when no effect-size design is
/// given). Rows are grouped by pair, in source order within a group.
pub struct WideToLong<'a> {
    data: &'a Table,
    common_vars: Vec<String>,
    es_design: Option<DesignMatrix>,
    n_design: Option<NDesign>,
    other_design: Option<DesignMatrix>,
    config: Config,
}

/// One unit of output: a variable, or a pair read from `es[y, x]`.
enum Unit<'d> {
    Variable {
        name: &'d str,
        row: usize,
    },
    Pair {
        x: &'d str,
        y: &'d str,
        es: &'d str,
        n: Option<&'d str>,
        x_row: Option<usize>,
        y_row: Option<usize>,
    },
}

impl<'a> WideToLong<'a> {
    /// Start a reshape of `data`.
    pub fn new(data: &'a Table) -> Self {
        Self {
            data,
            common_vars: Vec::new(),
            es_design: None,
            n_design: None,
            other_design: None,
            config: Config::default(),
        }
    }

    /// Columns copied verbatim into every output row.
    pub fn common_vars<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.common_vars = columns.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Square design of effect-size columns, read through `es[y, x]`.
    pub fn es_design(mut self, design: DesignMatrix) -> Self {
        self.es_design = Some(design);
        self
    }

    /// Sample-size design for pairwise mode.
    pub fn n_design(mut self, design: NDesign) -> Self {
        self.n_design = Some(design);
        self
    }

    /// Shorthand for a single sample-size column shared by every pair.
    pub fn n_column(self, column: impl Into<String>) -> Self {
        self.n_design(NDesign::Column(column.into()))
    }

    /// Per-variable statistics: rows are variables, columns are output labels.
    pub fn other_design(mut self, design: DesignMatrix) -> Self {
        self.other_design = Some(design);
        self
    }

    /// Output column for the effect size (default: `"rxyi"`).
    pub fn es_name(mut self, name: impl Into<String>) -> Self {
        self.config.es_name = name.into();
        self
    }

    /// What to do when designs name columns absent from the data.
    pub fn missing_col_action(mut self, action: MissingColAction) -> Self {
        self.config.missing_col_action = action;
        self
    }

    /// Override naming defaults and the missing-column policy.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Validate the designs and build the long table.
    ///
    /// # Errors
    ///
    /// - [`ReshapeError::Configuration`] if neither `es_design` nor
    ///   `other_design` is given.
    /// - [`ReshapeError::Shape`] for inconsistent designs or unknown
    ///   `common_vars`.
    /// - [`ReshapeError::MissingColumns`] when designs name absent columns
    ///   and the action is [`MissingColAction::Stop`].
    pub fn run(self) -> Result<Table> {
        let Self {
            data,
            common_vars,
            es_design,
            n_design,
            other_design,
            config,
        } = self;

        if es_design.is_none() && other_design.is_none() {
            return Err(ReshapeError::config(
                "at least one of es_design or other_design must be supplied",
            ));
        }
        if let Some(es) = &es_design {
            es.validate_square("es_design")?;
        }
        if let Some(NDesign::Matrix(n)) = &n_design {
            n.validate_square("n_design")?;
            let same_names = es_design.as_ref().is_some_and(|es| {
                let es_names: HashSet<&String> = es.row_names().iter().collect();
                n.row_names().iter().collect::<HashSet<_>>() == es_names
            });
            if !same_names {
                return Err(ReshapeError::shape(
                    "n_design must have the same variable names as es_design",
                ));
            }
        }
        if let Some(missing) = common_vars.iter().find(|c| !data.has_column(c)) {
            return Err(ReshapeError::shape(format!(
                "common variable {missing:?} is not a column of data"
            )));
        }

        let (mut es_design, mut other_design) = match (es_design, other_design) {
            (Some(es), Some(other)) => {
                let (es, other) = reconcile(&es, &other)?;
                (Some(es), Some(other))
            }
            pair => pair,
        };
        let mut n_design = n_design;

        let missing = missing_columns(data, es_design.iter().chain(&other_design), n_design.as_ref());
        if !missing.is_empty() {
            match config.missing_col_action {
                MissingColAction::Stop => {
                    return Err(ReshapeError::MissingColumns { columns: missing });
                }
                MissingColAction::Warn => {
                    tracing::warn!(
                        columns = ?missing,
                        "design references columns missing from data; treating them as NA"
                    );
                }
                MissingColAction::Ignore => {}
            }
            let missing: HashSet<String> = missing.into_iter().collect();
            for design in es_design.iter_mut().chain(other_design.iter_mut()) {
                design.clear_columns(&missing);
            }
            if let Some(NDesign::Matrix(n)) = &mut n_design {
                n.clear_columns(&missing);
            }
        }

        let reshaper = Reshaper {
            data,
            common_vars: &common_vars,
            other: other_design.as_ref(),
            n_design: n_design.as_ref(),
            config: &config,
        };
        let units = match &es_design {
            Some(es) => reshaper.pairs(es),
            None => reshaper.variables(),
        };
        let schema = reshaper.schema(es_design.is_some());

        let blocks = build_blocks(&units, |unit| reshaper.block(unit, &schema))?;
        let out = if blocks.is_empty() {
            let columns = schema.iter().map(|_| Column::missing(0)).collect();
            Table::new(schema, columns)?
        } else {
            Table::vstack(&blocks)
        };

        tracing::debug!(
            units = units.len(),
            rows = out.row_count(),
            pairwise = es_design.is_some(),
            "wide table reshaped to long format"
        );
        Ok(out)
    }
}

/// Reshape `data` with default naming and the `Warn` missing-column policy.
///
/// Shorthand for the [`WideToLong`] builder.
pub fn reshape_wide2long<S: AsRef<str>>(
    data: &Table,
    common_vars: &[S],
    es_design: Option<DesignMatrix>,
    n_design: Option<NDesign>,
    other_design: Option<DesignMatrix>,
) -> Result<Table> {
    let mut builder = WideToLong::new(data).common_vars(common_vars);
    if let Some(es) = es_design {
        builder = builder.es_design(es);
    }
    if let Some(n) = n_design {
        builder = builder.n_design(n);
    }
    if let Some(other) = other_design {
        builder = builder.other_design(other);
    }
    builder.run()
}

/// Validated, reconciled inputs shared by every block.
struct Reshaper<'r> {
    data: &'r Table,
    common_vars: &'r [String],
    other: Option<&'r DesignMatrix>,
    n_design: Option<&'r NDesign>,
    config: &'r Config,
}

impl<'r> Reshaper<'r> {
    /// Pairs in lower-triangle scan order: (2,1), (3,1), (3,2), (4,1), ...
    fn pairs<'d>(&'d self, es: &'d DesignMatrix) -> Vec<Unit<'d>> {
        let names = es.row_names();
        let mut units = Vec::new();
        for (yi, y) in names.iter().enumerate() {
            for x in &names[..yi] {
                let Some(es_col) = es.get_named(y, x) else {
                    continue;
                };
                let n = match self.n_design {
                    Some(NDesign::Column(col)) => self.data.has_column(col).then_some(col.as_str()),
                    Some(NDesign::Matrix(n)) => n.get_named(y, x),
                    None => None,
                };
                units.push(Unit::Pair {
                    x: x.as_str(),
                    y: y.as_str(),
                    es: es_col,
                    n,
                    x_row: self.other.and_then(|o| o.row_index(x)),
                    y_row: self.other.and_then(|o| o.row_index(y)),
                });
            }
        }
        units
    }

    /// Variables with at least one designed statistic.
    fn variables(&self) -> Vec<Unit<'r>> {
        let Some(other) = self.other else {
            return Vec::new();
        };
        other
            .row_names()
            .iter()
            .enumerate()
            .filter(|&(row, _)| other.row_entries(row).next().is_some())
            .map(|(row, name)| Unit::Variable {
                name: name.as_str(),
                row,
            })
            .collect()
    }

    /// Output columns, fixed before any rows are built.
    fn schema(&self, pairwise: bool) -> Vec<String> {
        let config = self.config;
        let other_labels = self.other.map(DesignMatrix::col_names).unwrap_or_default();

        let mut schema = self.common_vars.to_vec();
        if pairwise {
            if self.n_design.is_some() {
                schema.push(config.n_name.clone());
            }
            schema.push(config.es_name.clone());
            schema.extend(other_labels.iter().map(|l| format!("{l}{}", config.x_suffix)));
            schema.extend(other_labels.iter().map(|l| format!("{l}{}", config.y_suffix)));
            schema.push(config.x_label.clone());
            schema.push(config.y_label.clone());
        } else {
            schema.extend(other_labels.iter().cloned());
            schema.push(config.x_label.clone());
        }
        schema
    }

    /// Rows of one unit, one per source row, with NA for undesigned cells.
    fn block(&self, unit: &Unit<'_>, schema: &[String]) -> Result<Table> {
        let config = self.config;
        let n_rows = self.data.row_count();
        let mut block = Table::with_rows(n_rows);

        for column in self.common_vars {
            block.push_column(column.clone(), self.source(Some(column.as_str()))?)?;
        }
        match unit {
            Unit::Variable { name, row } => {
                self.push_other(&mut block, Some(*row), "")?;
                block.push_column(config.x_label.clone(), Column::repeat(&Value::from(*name), n_rows))?;
            }
            Unit::Pair {
                x,
                y,
                es,
                n,
                x_row,
                y_row,
            } => {
                if self.n_design.is_some() {
                    block.push_column(config.n_name.clone(), self.source(*n)?)?;
                }
                block.push_column(config.es_name.clone(), self.source(Some(*es))?)?;
                self.push_other(&mut block, *x_row, &config.x_suffix)?;
                self.push_other(&mut block, *y_row, &config.y_suffix)?;
                block.push_column(config.x_label.clone(), Column::repeat(&Value::from(*x), n_rows))?;
                block.push_column(config.y_label.clone(), Column::repeat(&Value::from(*y), n_rows))?;
            }
        }
        debug_assert_eq!(block.names(), schema);
        Ok(block)
    }

    /// One column per `other_design` label; NA where the row has no entry.
    fn push_other(&self, block: &mut Table, row: Option<usize>, suffix: &str) -> Result<()> {
        let Some(other) = self.other else {
            return Ok(());
        };
        for (j, label) in other.col_names().iter().enumerate() {
            let source = row.and_then(|r| other.get(r, j));
            block.push_column(format!("{label}{suffix}"), self.source(source)?)?;
        }
        Ok(())
    }

    /// A source column, or an NA column when undesigned.
    fn source(&self, column: Option<&str>) -> Result<Column> {
        match column {
            Some(name) => self.data.column(name).cloned().ok_or_else(|| {
                ReshapeError::shape(format!("undefined column {name:?} selected"))
            }),
            None => Ok(Column::missing(self.data.row_count())),
        }
    }
}

/// Non-NA design cells naming columns absent from `data`, first-seen order.
fn missing_columns<'d>(
    data: &Table,
    designs: impl Iterator<Item = &'d DesignMatrix>,
    n_design: Option<&'d NDesign>,
) -> Vec<String> {
    let n_refs: Vec<&str> = match n_design {
        Some(NDesign::Column(name)) => vec![name.as_str()],
        Some(NDesign::Matrix(n)) => n.referenced_columns().collect(),
        None => Vec::new(),
    };
    let mut seen = HashSet::new();
    designs
        .flat_map(DesignMatrix::referenced_columns)
        .chain(n_refs)
        .filter(|c| !data.has_column(c) && seen.insert(*c))
        .map(str::to_string)
        .collect()
}

fn build_blocks<F>(units: &[Unit<'_>], build: F) -> Result<Vec<Table>>
where
    F: Fn(&Unit<'_>) -> Result<Table> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        crate::thread_pool::install(|| units.par_iter().map(&build).collect())
    }
    #[cfg(not(feature = "parallel"))]
    {
        crate::thread_pool::install(|| units.iter().map(build).collect())
    }
}
