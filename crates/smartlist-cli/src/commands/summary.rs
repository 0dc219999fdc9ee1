//! Summary command implementation.
//!
//! Prints the localized, human-readable description of a definition.

use std::path::Path;

use smartlist_core::filter::Catalog;

use super::{load_definition, CommandContext, Result};
use crate::output::{format_summary_json, SummaryOutput};

/// Executes the summary command.
///
/// # Errors
///
/// Returns an error if the definition cannot be read or decoded.
pub fn execute(ctx: &CommandContext, file: &Path) -> Result<()> {
    let node = load_definition(ctx, file)?;
    let catalog = Catalog::builtin();
    let summary = node.summary(&catalog, &ctx.locale);

    if ctx.json_output {
        let output = SummaryOutput {
            summary: &summary,
            locale: &ctx.locale,
            leaves: node.leaf_count(),
            depth: node.depth(),
        };
        println!("{}", format_summary_json(&output)?);
    } else if !ctx.quiet {
        println!("{summary}");
    }

    Ok(())
}
