//! Output formatting for a single definition: summary, textual form, SQL.

use serde::Serialize;
use smartlist_core::backend::SqlPredicate;
use smartlist_core::filter::Value;

use super::helpers::label;

/// JSON output structure for the summary command.
#[derive(Serialize)]
pub struct SummaryOutput<'a> {
    pub summary: &'a str,
    pub locale: &'a str,
    pub leaves: usize,
    pub depth: usize,
}

/// JSON output structure for the sql command.
#[derive(Serialize)]
pub struct SqlOutput<'a> {
    pub sql: &'a str,
    pub params: &'a [Value],
}

/// Formats a summary as JSON.
pub fn format_summary_json(output: &SummaryOutput<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(output)
}

/// Formats the textual form as JSON.
pub fn format_text_json(text: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "text": text }))
}

/// Formats a SQL predicate as JSON.
pub fn format_sql_json(predicate: &SqlPredicate) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SqlOutput {
        sql: &predicate.sql,
        params: &predicate.params,
    })
}

/// Formats a SQL predicate as a `WHERE` clause followed by its parameters.
pub fn format_sql_text(predicate: &SqlPredicate, use_colors: bool) -> String {
    let mut output = format!("{} {}\n", label("WHERE", use_colors), predicate.sql);
    if !predicate.params.is_empty() {
        output.push('\n');
        output.push_str(&label("Parameters:", use_colors));
        output.push('\n');
        for (i, param) in predicate.params.iter().enumerate() {
            output.push_str(&format!("  ?{} = {}\n", i + 1, sql_literal(param)));
        }
    }
    output
}

fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
    }
}
