//! Text command implementation.
//!
//! Prints the compact textual form of a definition.

use std::path::Path;

use super::{load_definition, CommandContext, Result};
use crate::output::format_text_json;

/// Executes the text command.
///
/// # Errors
///
/// Returns an error if the definition cannot be read or decoded.
pub fn execute(ctx: &CommandContext, file: &Path) -> Result<()> {
    let node = load_definition(ctx, file)?;
    let text = node.to_text();

    if ctx.json_output {
        println!("{}", format_text_json(&text)?);
    } else if !ctx.quiet {
        println!("{text}");
    }

    Ok(())
}
