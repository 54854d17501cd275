//! Error types for reshaping operations.

use thiserror::Error;

/// Failure reasons from any reshaping call.
///
/// Every variant is raised before output rows are built, so a failed call
/// never yields a truncated table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReshapeError {
    /// Dimensions, lengths or label sets are inconsistent.
    #[error("shape error: {0}")]
    Shape(String),

    /// The combination of arguments cannot describe a reshape.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Design cells name columns that the source table lacks.
    #[error("design references columns missing from data: {}", columns.join(", "))]
    MissingColumns {
        /// Offending column names, in first-seen order.
        columns: Vec<String>,
    },
}

impl ReshapeError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReshapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_names() {
        let err = ReshapeError::MissingColumns {
            columns: vec!["r_ab".to_string(), "n_ab".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "design references columns missing from data: r_ab, n_ab"
        );
    }
}
