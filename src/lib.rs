//! # corr-reshape
//!
//! Reshape correlation/covariance data into the long, one-row-per-pair
//! layout that meta-analysis operates on.
//!
//! Three layouts are supported:
//! - **Matrix** ("journal") layout: a square correlation matrix with
//!   per-variable statistics alongside.
//! - **Wide** layout: one row per study, one column per pairwise statistic.
//! - **Long** layout: one row per variable pair (or per variable).
//!
//! ## Matrix to long
//!
//! ```
//! use corr_reshape::{reshape_vec2mat, MatToLong};
//!
//! // Lower triangle filled column by column: (Y,X), (Z,X), (Z,Y)
//! let cor = reshape_vec2mat(&[0.3, 0.4, 0.5], &["X", "Y", "Z"]).unwrap();
//!
//! let long = MatToLong::new(cor)
//!     .var_names(&["X", "Y", "Z"])
//!     .common_data(200.0)
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(long.row_count(), 3);
//! assert_eq!(long.names(), &["x_name", "y_name", "rxyi", "common_data"]);
//! ```
//!
//! ## Wide to long
//!
//! ```
//! use corr_reshape::{Column, DesignMatrix, Table, WideToLong};
//!
//! let studies = Table::new(
//!     vec!["study", "n", "r_ab"],
//!     vec![
//!         Column::from_strs(&["s1", "s2"]),
//!         Column::from_f64(vec![120.0, 80.0]),
//!         Column::from_f64(vec![0.21, 0.34]),
//!     ],
//! )
//! .unwrap();
//! let es = DesignMatrix::from_lower_triangle(&["A", "B"], &[Some("r_ab")]).unwrap();
//!
//! let long = WideToLong::new(&studies)
//!     .common_vars(&["study"])
//!     .es_design(es)
//!     .n_column("n")
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(long.names(), &["study", "n", "rxyi", "x_name", "y_name"]);
//! ```
//!
//! Failures are reported as [`ReshapeError`] before any output is built.
//! Degraded-but-recoverable situations (design cells naming absent columns
//! under [`MissingColAction::Warn`]) are logged through `tracing`.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod resolve;
mod thread_pool;

// Functional modules
pub mod matrix;
pub mod output;
pub mod reshape;
pub mod table;

// Re-exports for public API
pub use config::{Config, MissingColAction};
pub use error::{ReshapeError, Result};
pub use matrix::{
    reshape_longer, reshape_longer_matrix, reshape_vec2mat, CellValue, LabeledMatrix,
    LongerOptions, MatrixAssembler, MatrixInput,
};
pub use reshape::{
    reconcile, reshape_mat2dat, reshape_wide2long, AttributeInput, DesignMatrix, MatToLong,
    NDesign, WideToLong,
};
pub use resolve::{Arg, ColumnResolver};
pub use table::{Column, Table, Value};
