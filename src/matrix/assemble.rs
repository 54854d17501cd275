//! Symmetric matrix assembly from triangle and diagonal vectors.
//!
//! Triangle values are written in column-major order over the chosen
//! triangle, then the matrix is symmetrized as `M + Mᵀ`. The diagonal is
//! seeded with `var / 2` so that the doubling leaves exactly `var` behind.
//!
//! With the default fill (`by_row = false`) a vector fills the lower triangle
//! column by column:
//!
//! ```text
//! cov = [a, b, c]      . a b
//!                 =>   a . c
//!                      b c .
//! ```

use nalgebra::{DMatrix, DVector};

use super::{triangle_cells, triangle_len, LabeledMatrix};
use crate::config::Config;
use crate::error::{ReshapeError, Result};

/// Builder for symmetric covariance/correlation matrices.
///
/// ```
/// use corr_reshape::MatrixAssembler;
///
/// let mat = MatrixAssembler::new()
///     .cov([0.3, 0.2, 0.4])
///     .var_names(&["x", "y", "z"])
///     .build()
///     .unwrap();
/// assert_eq!(mat.get_labeled("z", "y"), Some(&0.4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatrixAssembler {
    cov: Option<Vec<f64>>,
    var: Option<Vec<f64>>,
    order: Option<usize>,
    var_names: Option<Vec<String>>,
    by_row: bool,
    diag: bool,
    config: Config,
}

impl MatrixAssembler {
    /// Create an assembler with no inputs; at least one of `cov`, `var`,
    /// `order` must be set before [`build`](Self::build).
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangle values. A single value is broadcast over the triangle.
    pub fn cov(mut self, cov: impl Into<Vec<f64>>) -> Self {
        self.cov = Some(cov.into());
        self
    }

    /// Diagonal values. A single value is broadcast (default: ones).
    pub fn var(mut self, var: impl Into<Vec<f64>>) -> Self {
        self.var = Some(var.into());
        self
    }

    /// Explicit matrix dimension.
    pub fn order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    /// Row and column labels (default: `Var1..Varn`).
    pub fn var_names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.var_names = Some(names.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    /// Fill the upper triangle column by column, i.e. the lower triangle row
    /// by row.
    pub fn by_row(mut self, by_row: bool) -> Self {
        self.by_row = by_row;
        self
    }

    /// `cov` includes the diagonal, superseding `var`.
    pub fn diag(mut self, diag: bool) -> Self {
        self.diag = diag;
        self
    }

    /// Naming configuration for synthesized labels.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Assemble the matrix.
    ///
    /// # Errors
    ///
    /// - [`ReshapeError::Configuration`] when none of `cov`, `var`, `order`
    ///   is given.
    /// - [`ReshapeError::Shape`] when the order cannot be inferred from the
    ///   length of `cov`, or `cov`/`var` lengths disagree with the order.
    pub fn build(&self) -> Result<LabeledMatrix<f64>> {
        // Without cov there is nothing to write over the diagonal.
        let diag = self.diag && self.cov.is_some();

        let order = match (self.order, &self.cov, &self.var) {
            (Some(order), _, _) => order,
            (None, Some(cov), _) => infer_order(cov.len(), diag)?,
            (None, None, Some(var)) => var.len(),
            (None, None, None) => {
                return Err(ReshapeError::config(
                    "one of cov, var or order is required to assemble a matrix",
                ))
            }
        };
        if order == 0 {
            return Err(ReshapeError::shape("matrix order must be at least 1"));
        }

        let var = broadcast(self.var.as_deref(), order, 1.0, "var")?;
        let cells = triangle_cells(order, diag, self.by_row);
        let cov = broadcast(self.cov.as_deref(), cells.len(), 0.0, "cov")?;

        let halves = DVector::from_iterator(order, var.iter().map(|v| v / 2.0));
        let mut mat = DMatrix::from_diagonal(&halves);
        for (&(i, j), &value) in cells.iter().zip(&cov) {
            mat[(i, j)] = value;
        }
        if diag {
            for i in 0..order {
                mat[(i, i)] /= 2.0;
            }
        }
        let mat = &mat + mat.transpose();

        let names = match &self.var_names {
            Some(names) if names.len() == order => names.clone(),
            Some(names) => {
                tracing::warn!(
                    given = names.len(),
                    order,
                    "var_names length does not match matrix order; using default names"
                );
                self.config.default_var_names(order)
            }
            None => self.config.default_var_names(order),
        };
        LabeledMatrix::new(mat).with_labels(names.clone(), names)
    }
}

/// Assemble a symmetric matrix with unit diagonal from lower-triangle values.
///
/// Shorthand for `MatrixAssembler::new().cov(cov).var_names(var_names).build()`.
pub fn reshape_vec2mat<S: AsRef<str>>(cov: &[f64], var_names: &[S]) -> Result<LabeledMatrix<f64>> {
    MatrixAssembler::new().cov(cov).var_names(var_names).build()
}

/// Solve `n(n-1)/2 = len` (or `n(n+1)/2 = len` with the diagonal) for `n`.
fn infer_order(len: usize, include_diag: bool) -> Result<usize> {
    let root = ((1 + 8 * len) as f64).sqrt();
    let guess = if include_diag { (root - 1.0) / 2.0 } else { (root + 1.0) / 2.0 };
    let order = guess.round() as usize;
    if triangle_len(order, include_diag) != len {
        return Err(ReshapeError::shape(format!(
            "length of cov ({len}) is not the number of elements in a triangular matrix"
        )));
    }
    Ok(order)
}

/// Expand a scalar, check a vector, or fill with `default`.
fn broadcast(values: Option<&[f64]>, len: usize, default: f64, what: &str) -> Result<Vec<f64>> {
    match values {
        None => Ok(vec![default; len]),
        Some([single]) => Ok(vec![*single; len]),
        Some(v) if v.len() == len => Ok(v.to_vec()),
        Some(v) => Err(ReshapeError::shape(format!(
            "length of {what} ({}) does not match the {len} cells it must fill",
            v.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_three_by_three() {
        let mat = reshape_vec2mat(&[0.3, 0.2, 0.4], &["x", "y", "z"]).unwrap();

        assert_eq!(mat.diagonal(), vec![1.0, 1.0, 1.0]);
        assert_eq!(mat.get_labeled("x", "y"), Some(&0.3));
        assert_eq!(mat.get_labeled("y", "x"), Some(&0.3));
        assert_eq!(mat.get_labeled("x", "z"), Some(&0.2));
        assert_eq!(mat.get_labeled("y", "z"), Some(&0.4));
    }

    #[test]
    fn test_infer_order() {
        assert_eq!(infer_order(1, false), Ok(2));
        assert_eq!(infer_order(6, false), Ok(4));
        assert_eq!(infer_order(6, true), Ok(3));
        assert!(matches!(infer_order(4, false), Err(ReshapeError::Shape(_))));
    }

    #[test]
    fn test_by_row_fills_lower_triangle_row_wise() {
        let cov = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let by_col = MatrixAssembler::new().cov(cov).build().unwrap();
        let by_row = MatrixAssembler::new().cov(cov).by_row(true).build().unwrap();

        // Lower triangle, column-major: (2,1) (3,1) (4,1) (3,2) (4,2) (4,3)
        assert_eq!(by_col.get(3, 0), Some(&3.0));
        assert_eq!(by_col.get(2, 1), Some(&4.0));
        // Lower triangle, row-major: (2,1) (3,1) (3,2) (4,1) (4,2) (4,3)
        assert_eq!(by_row.get(2, 1), Some(&3.0));
        assert_eq!(by_row.get(3, 0), Some(&4.0));
        assert_eq!(by_row.get(0, 3), Some(&4.0));
    }

    #[test]
    fn test_diag_supersedes_var() {
        let mat = MatrixAssembler::new()
            .cov([4.0, 0.5, 9.0])
            .var([1.0, 1.0])
            .diag(true)
            .build()
            .unwrap();
        assert_eq!(mat.nrows(), 2);
        assert_eq!(mat.diagonal(), vec![4.0, 9.0]);
        assert_eq!(mat.get(0, 1), Some(&0.5));
    }

    #[test]
    fn test_var_only_and_scalar_cov() {
        let mat = MatrixAssembler::new().var([2.0, 3.0, 4.0]).cov([0.1]).order(3).build().unwrap();
        assert_eq!(mat.diagonal(), vec![2.0, 3.0, 4.0]);
        assert!(mat.data().iter().filter(|&&v| v == 0.1).count() == 6);

        let identity = MatrixAssembler::new().var([1.0, 1.0]).build().unwrap();
        assert_eq!(identity.get(0, 1), Some(&0.0));
        assert_eq!(identity.row_labels().unwrap(), &["Var1", "Var2"]);
    }

    #[test]
    fn test_length_mismatches() {
        let cov_err = MatrixAssembler::new().cov([0.1, 0.2]).order(3).build().unwrap_err();
        assert!(matches!(cov_err, ReshapeError::Shape(_)));

        let var_err = MatrixAssembler::new().cov([0.1, 0.2, 0.3]).var([1.0, 1.0]).build().unwrap_err();
        assert!(matches!(var_err, ReshapeError::Shape(_)));

        let none = MatrixAssembler::new().build().unwrap_err();
        assert!(matches!(none, ReshapeError::Configuration(_)));
    }

    #[test]
    fn test_wrong_name_count_falls_back_to_defaults() {
        let mat = MatrixAssembler::new().cov([0.5]).var_names(&["a", "b", "c"]).build().unwrap();
        assert_eq!(mat.col_labels().unwrap(), &["Var1", "Var2"]);
    }
}
