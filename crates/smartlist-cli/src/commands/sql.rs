//! SQL command implementation.
//!
//! Renders a definition as a parameterized `WHERE` fragment.

use std::path::Path;

use smartlist_core::backend::SqlBackend;

use super::{load_definition, CommandContext, Result};
use crate::output::{format_sql_json, format_sql_text};

/// Executes the sql command.
///
/// # Errors
///
/// Returns an error if the definition cannot be read or decoded, or names a
/// field that is not a valid column.
pub fn execute(ctx: &CommandContext, file: &Path) -> Result<()> {
    let node = load_definition(ctx, file)?;
    let predicate = node.compile(&SqlBackend::new())?;

    if ctx.json_output {
        println!("{}", format_sql_json(&predicate)?);
    } else if !ctx.quiet {
        print!("{}", format_sql_text(&predicate, ctx.use_colors));
    }

    Ok(())
}
