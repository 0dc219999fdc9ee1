//! Output formatting utilities for the sl CLI.
//!
//! This module provides functions for formatting data as tables or JSON:
//!
//! - [`definition`] - Summary, textual form and SQL output for one definition
//! - [`rows`] - Matching rows from the eval command
//! - [`helpers`] - Common formatting utilities (truncation, labels)

mod definition;
pub mod helpers;
mod rows;

pub use definition::{
    format_sql_json, format_sql_text, format_summary_json, format_text_json, SummaryOutput,
};
pub use rows::{format_rows_json, format_rows_table};
