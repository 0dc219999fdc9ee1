//! Row output formatting for the eval command.

use std::collections::BTreeSet;

use owo_colors::OwoColorize;
use serde::Serialize;
use smartlist_core::backend::Row;
use smartlist_core::filter::Value;

use super::helpers::truncate_str;

/// Widest a table cell gets before it is truncated.
const MAX_CELL_WIDTH: usize = 30;

/// JSON output structure for the eval command.
#[derive(Serialize)]
pub struct EvalOutput<'a> {
    pub matched: usize,
    pub total: usize,
    pub rows: &'a [&'a Row],
}

/// Formats matching rows as JSON.
pub fn format_rows_json(rows: &[&Row], total: usize) -> Result<String, serde_json::Error> {
    let output = EvalOutput {
        matched: rows.len(),
        total,
        rows,
    };
    serde_json::to_string_pretty(&output)
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(value) => truncate_str(&value.to_string(), MAX_CELL_WIDTH),
    }
}

/// Formats matching rows as a table with one column per field seen.
pub fn format_rows_table(rows: &[&Row], total: usize, use_colors: bool) -> String {
    if rows.is_empty() {
        return format!("No rows match (0 of {total}).\n");
    }

    let columns: Vec<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| cell(row.get(*c))).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let mut output = String::new();

    let header = pad_line(columns.iter().map(|c| c.to_string()), &widths);
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for row in cells {
        output.push_str(&pad_line(row.into_iter(), &widths));
        output.push('\n');
    }

    let footer = format!("{} of {} rows match", rows.len(), total);
    if use_colors {
        output.push_str(&format!("\n{}\n", footer.green()));
    } else {
        output.push_str(&format!("\n{footer}\n"));
    }
    output
}

fn pad_line(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_table_columns_are_union_of_fields() {
        let a = row(&[("status", "open".into()), ("tag", "urgent".into())]);
        let b = row(&[("status", "open".into()), ("priority", Value::Integer(1))]);
        let table = format_rows_table(&[&a, &b], 5, false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "priority  status  tag");
        assert_eq!(lines[1], "-         open    urgent");
        assert_eq!(lines[2], "1         open    -");
        assert!(table.contains("2 of 5 rows match"));
    }

    #[test]
    fn test_table_empty() {
        assert_eq!(format_rows_table(&[], 3, false), "No rows match (0 of 3).\n");
    }

    #[test]
    fn test_json_output() {
        let a = row(&[("status", "open".into()), ("done", Value::Bool(false))]);
        let json = format_rows_json(&[&a], 4).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["matched"], 1);
        assert_eq!(parsed["total"], 4);
        assert_eq!(parsed["rows"][0]["status"], "open");
        assert_eq!(parsed["rows"][0]["done"], false);
    }
}
