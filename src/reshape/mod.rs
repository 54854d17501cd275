//! Reshapers that produce long pairwise tables.
//!
//! - [`mat2dat`]: correlation matrix plus per-variable attributes to long
//! - [`wide2long`]: wide study table plus design matrices to long
//! - [`design`]: design-matrix validation and reconciliation

pub mod design;
pub mod mat2dat;
pub mod wide2long;

pub use design::{reconcile, DesignMatrix};
pub use mat2dat::{reshape_mat2dat, AttributeInput, MatToLong};
pub use wide2long::{reshape_wide2long, NDesign, WideToLong};
