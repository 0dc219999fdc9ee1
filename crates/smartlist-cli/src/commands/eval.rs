//! Eval command implementation.
//!
//! Compiles a definition for the in-memory backend and prints the rows of a
//! JSON dump that it matches.

use std::path::Path;

use smartlist_core::backend::{MemoryBackend, Row};

use super::{load_definition, read_input, CommandContext, Result};
use crate::output::{format_rows_json, format_rows_table};

/// Options for the eval command.
#[derive(Debug)]
pub struct EvalOptions<'a> {
    /// Definition file.
    pub file: &'a Path,
    /// JSON array of row objects.
    pub rows: &'a Path,
    /// Only print the match count.
    pub count: bool,
}

/// Reads a JSON array of flat objects into rows.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let bytes = read_input(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Executes the eval command.
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed, or if a leaf
/// cannot be compiled.
pub fn execute(ctx: &CommandContext, opts: &EvalOptions<'_>) -> Result<()> {
    let node = load_definition(ctx, opts.file)?;
    let rows = load_rows(opts.rows)?;

    let backend = MemoryBackend::new();
    let predicate = node.compile(&backend)?;
    let matched = backend.filter_rows(&predicate, &rows);

    tracing::debug!(matched = matched.len(), total = rows.len(), "evaluated rows");

    if opts.count {
        if ctx.json_output {
            println!(
                "{}",
                serde_json::json!({ "matched": matched.len(), "total": rows.len() })
            );
        } else {
            println!("{}", matched.len());
        }
        return Ok(());
    }

    if ctx.json_output {
        println!("{}", format_rows_json(&matched, rows.len())?);
    } else if !ctx.quiet {
        print!("{}", format_rows_table(&matched, rows.len(), ctx.use_colors));
    }

    Ok(())
}
