//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::table::{Table, Value};

/// Format a Table for human-readable terminal output.
///
/// Columns are left-aligned for text and right-aligned for numbers; NA
/// cells are dimmed. At most `max_rows` rows are printed.
pub fn format_table(table: &Table, max_rows: usize) -> String {
    let shown = table.row_count().min(max_rows);
    // (rendered text, right-align, is NA)
    let cells: Vec<Vec<(String, bool, bool)>> = table
        .columns()
        .iter()
        .map(|column| {
            (0..shown)
                .map(|row| {
                    let value = column.get(row);
                    let numeric = matches!(value, Value::Number(_));
                    (value.to_string(), numeric, value.is_missing())
                })
                .collect()
        })
        .collect();
    let widths: Vec<usize> = table
        .names()
        .iter()
        .zip(&cells)
        .map(|(name, col)| {
            col.iter()
                .map(|(text, _, _)| text.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len();
    let sep = "\u{2500}".repeat(total.max(20));

    let header: Vec<String> = table
        .names()
        .iter()
        .zip(&widths)
        .map(|(name, &w)| format!("{name:<w$}").bold().to_string())
        .collect();
    output.push_str(&format!("  {}\n", header.join("  ")));
    output.push_str(&sep);
    output.push('\n');

    for row in 0..shown {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(col, &w)| {
                let (text, numeric, missing) = &col[row];
                let padded = if *numeric {
                    format!("{text:>w$}")
                } else {
                    format!("{text:<w$}")
                };
                if *missing {
                    padded.dimmed().to_string()
                } else {
                    padded
                }
            })
            .collect();
        output.push_str(&format!("  {}\n", line.join("  ")));
    }

    output.push_str(&sep);
    output.push('\n');
    let summary = format!("{} rows \u{00D7} {} columns", table.row_count(), table.col_count());
    if shown < table.row_count() {
        output.push_str(&format!("{summary} ({} shown)\n", shown));
    } else {
        output.push_str(&format!("{summary}\n"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn make_test_table() -> Table {
        Table::new(
            vec!["x_name", "y_name", "rxyi"],
            vec![
                Column::from_strs(&["X", "X", "Y"]),
                Column::from_strs(&["Y", "Z", "Z"]),
                Column::Number(vec![Some(0.3), None, Some(0.5)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_format_table() {
        let output = format_table(&make_test_table(), 10);
        assert!(output.contains("x_name"));
        assert!(output.contains("0.3"));
        assert!(output.contains("NA"));
        assert!(output.contains("3 rows \u{00D7} 3 columns"));
    }

    #[test]
    fn test_format_table_truncates() {
        let output = format_table(&make_test_table(), 1);
        assert!(output.contains("(1 shown)"));
        assert!(!output.contains("0.5"));
    }
}
