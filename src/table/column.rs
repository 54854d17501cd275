//! Typed nullable columns and scalar cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell pulled out of a [`Column`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric cell.
    Number(f64),
    /// Text cell.
    Text(String),
    /// NA.
    Missing,
}

impl Value {
    /// True for [`Value::Missing`] and for NaN numbers.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Number(v) => v.is_nan(),
            Value::Text(_) => false,
            Value::Missing => true,
        }
    }

    /// Numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            Value::Missing
        } else {
            Value::Number(v)
        }
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Value::Missing, Value::from)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Missing => f.write_str("NA"),
        }
    }
}

/// A typed column of data with `None` standing for NA.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum Column {
    /// Numeric column.
    Number(Vec<Option<f64>>),
    /// Text column.
    Text(Vec<Option<String>>),
}

impl Column {
    /// Numeric column from plain floats; NaN becomes NA.
    pub fn from_f64(data: Vec<f64>) -> Self {
        Column::Number(data.into_iter().map(|v| (!v.is_nan()).then_some(v)).collect())
    }

    /// Text column without missing cells.
    pub fn from_strs<S: AsRef<str>>(data: &[S]) -> Self {
        Column::Text(data.iter().map(|s| Some(s.as_ref().to_string())).collect())
    }

    /// All-NA column of length `len`.
    pub fn missing(len: usize) -> Self {
        Column::Number(vec![None; len])
    }

    /// Column of `len` copies of `value`.
    pub fn repeat(value: &Value, len: usize) -> Self {
        match value {
            Value::Number(v) => Column::Number(vec![(!v.is_nan()).then_some(*v); len]),
            Value::Text(s) => Column::Text(vec![Some(s.clone()); len]),
            Value::Missing => Column::missing(len),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Column::Number(data) => data.len(),
            Column::Text(data) => data.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row` (NA when out of range).
    pub fn get(&self, row: usize) -> Value {
        match self {
            Column::Number(data) => data.get(row).copied().flatten().into(),
            Column::Text(data) => data
                .get(row)
                .cloned()
                .flatten()
                .map_or(Value::Missing, Value::Text),
        }
    }

    /// Whether the value at `row` is NA.
    pub fn is_na(&self, row: usize) -> bool {
        self.get(row).is_missing()
    }

    /// Number of NA cells.
    pub fn na_count(&self) -> usize {
        match self {
            Column::Number(data) => data.iter().filter(|v| v.is_none()).count(),
            Column::Text(data) => data.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Numeric cells, if this is a numeric column.
    pub fn as_numbers(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Number(data) => Some(data),
            Column::Text(_) => None,
        }
    }

    /// Text cells, if this is a text column.
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Text(data) => Some(data),
            Column::Number(_) => None,
        }
    }

    /// Cells rendered as text; numbers use their shortest round-trip form.
    pub fn to_text(&self) -> Vec<Option<String>> {
        match self {
            Column::Number(data) => data.iter().map(|v| v.map(|x| x.to_string())).collect(),
            Column::Text(data) => data.clone(),
        }
    }

    /// Gather rows by position.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range.
    pub fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Number(data) => Column::Number(rows.iter().map(|&i| data[i]).collect()),
            Column::Text(data) => Column::Text(rows.iter().map(|&i| data[i].clone()).collect()),
        }
    }

    /// Stack columns end to end.
    ///
    /// Stays numeric when every part is numeric; otherwise every part is
    /// coerced to text.
    pub fn concat(parts: &[Column]) -> Column {
        if parts.iter().all(|c| matches!(c, Column::Number(_))) {
            let data = parts
                .iter()
                .filter_map(Column::as_numbers)
                .flat_map(|d| d.iter().copied())
                .collect();
            Column::Number(data)
        } else {
            Column::Text(parts.iter().flat_map(Column::to_text).collect())
        }
    }
}
