//! JSON serialization for reshaped tables.

use serde_json::{Map, Value as JsonValue};

use crate::table::{Table, Value};

/// Serialize a Table to a compact, column-oriented JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for Table).
pub fn to_json(table: &Table) -> Result<String, serde_json::Error> {
    serde_json::to_string(table)
}

/// Serialize a Table to a pretty-printed, column-oriented JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for Table).
pub fn to_json_pretty(table: &Table) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(table)
}

/// Serialize a Table as an array of row objects, NA as `null`.
///
/// Object keys are sorted.
///
/// This is the shape most meta-analysis tooling ingests directly.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for Table).
pub fn to_records_json(table: &Table) -> Result<String, serde_json::Error> {
    let records: Vec<JsonValue> = (0..table.row_count())
        .map(|row| {
            let fields: Map<String, JsonValue> = table
                .names()
                .iter()
                .zip(table.columns())
                .map(|(name, column)| (name.clone(), cell_to_json(column.get(row))))
                .collect();
            JsonValue::Object(fields)
        })
        .collect();
    serde_json::to_string(&records)
}

fn cell_to_json(value: Value) -> JsonValue {
    match value {
        Value::Number(v) => serde_json::Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number),
        Value::Text(s) => JsonValue::String(s),
        Value::Missing => JsonValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn make_test_table() -> Table {
        Table::new(
            vec!["x_name", "y_name", "rxyi"],
            vec![
                Column::from_strs(&["X", "X"]),
                Column::from_strs(&["Y", "Z"]),
                Column::Number(vec![Some(0.3), None]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&make_test_table()).unwrap();
        assert!(json.contains("\"names\":[\"x_name\",\"y_name\",\"rxyi\"]"));
        assert!(json.contains("{\"type\":\"number\",\"values\":[0.3,null]}"));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&make_test_table()).unwrap();
        assert!(json.contains('\n')); // Pretty print has newlines
        assert!(json.contains("rxyi"));
    }

    #[test]
    fn test_json_round_trip() {
        let table = make_test_table();
        let back: Table = serde_json::from_str(&to_json(&table).unwrap()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_to_records_json() {
        let json = to_records_json(&make_test_table()).unwrap();
        assert_eq!(
            json,
            r#"[{"rxyi":0.3,"x_name":"X","y_name":"Y"},{"rxyi":null,"x_name":"X","y_name":"Z"}]"#
        );
    }
}
