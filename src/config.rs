//! Naming and policy configuration shared by the reshapers.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReshapeError;

/// Configuration options for the matrix and wide-table reshapers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Output column holding the effect size (default: `"rxyi"`).
    pub es_name: String,

    /// Output column holding the sample size in pairwise mode (default: `"n"`).
    pub n_name: String,

    /// Output column holding the first pair member (default: `"x_name"`).
    pub x_label: String,

    /// Output column holding the second pair member (default: `"y_name"`).
    pub y_label: String,

    /// Suffix for first-member attributes (default: `"_x"`).
    pub x_suffix: String,

    /// Suffix for second-member attributes (default: `"_y"`).
    pub y_suffix: String,

    /// Prefix of synthesized variable names, `Var1`, `Var2`, ... (default: `"Var"`).
    pub var_prefix: String,

    /// Policy for design cells naming absent source columns (default: `Warn`).
    pub missing_col_action: MissingColAction,
}

/// What to do when a design matrix names a column the source table lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingColAction {
    /// Log a warning, null the offending cells and continue.
    #[default]
    Warn,
    /// Null the offending cells silently and continue.
    Ignore,
    /// Abort with [`ReshapeError::MissingColumns`].
    Stop,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            es_name: "rxyi".to_string(),
            n_name: "n".to_string(),
            x_label: "x_name".to_string(),
            y_label: "y_name".to_string(),
            x_suffix: "_x".to_string(),
            y_suffix: "_y".to_string(),
            var_prefix: "Var".to_string(),
            missing_col_action: MissingColAction::Warn,
        }
    }
}

impl Config {
    /// Default configuration merged with environment overrides.
    ///
    /// Reads `RESHAPE_ES_NAME` and `RESHAPE_MISSING_COL_ACTION`. Unparseable
    /// values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(name) = parse_string_env("RESHAPE_ES_NAME") {
            config.es_name = name;
        }
        if let Some(raw) = parse_string_env("RESHAPE_MISSING_COL_ACTION") {
            match raw.parse() {
                Ok(action) => config.missing_col_action = action,
                Err(err) => tracing::warn!(%err, "ignoring RESHAPE_MISSING_COL_ACTION"),
            }
        }
        config
    }

    /// Synthesized label for the 1-based variable `index`.
    pub fn default_var_name(&self, index: usize) -> String {
        format!("{}{}", self.var_prefix, index)
    }

    /// Synthesized labels `Var1..Var{order}`.
    pub fn default_var_names(&self, order: usize) -> Vec<String> {
        (1..=order).map(|i| self.default_var_name(i)).collect()
    }
}

impl FromStr for MissingColAction {
    type Err = ReshapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            "stop" => Ok(Self::Stop),
            other => Err(ReshapeError::config(format!(
                "missing_col_action must be one of \"warn\", \"ignore\", \"stop\"; got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for MissingColAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Warn => "warn",
            Self::Ignore => "ignore",
            Self::Stop => "stop",
        };
        f.write_str(s)
    }
}

fn parse_string_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.es_name, "rxyi");
        assert_eq!(config.missing_col_action, MissingColAction::Warn);
        assert_eq!(MissingColAction::default(), MissingColAction::Warn);
        assert_eq!(config.default_var_names(3), vec!["Var1", "Var2", "Var3"]);
    }

    #[test]
    fn test_missing_col_action_parse() {
        assert_eq!("stop".parse::<MissingColAction>(), Ok(MissingColAction::Stop));
        assert_eq!(" Ignore ".parse::<MissingColAction>(), Ok(MissingColAction::Ignore));
        assert!(matches!(
            "abort".parse::<MissingColAction>(),
            Err(ReshapeError::Configuration(_))
        ));
        assert_eq!(MissingColAction::Warn.to_string(), "warn");
    }

    #[test]
    fn test_from_env_overrides() {
        env::set_var("RESHAPE_ES_NAME", "ryy");
        env::set_var("RESHAPE_MISSING_COL_ACTION", "stop");
        let config = Config::from_env();
        env::remove_var("RESHAPE_ES_NAME");
        env::remove_var("RESHAPE_MISSING_COL_ACTION");

        assert_eq!(config.es_name, "ryy");
        assert_eq!(config.missing_col_action, MissingColAction::Stop);
    }
}
