//! Encode command implementation.
//!
//! Builds a definition from its textual form and writes the tagged bytes the
//! other commands read.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use smartlist_core::filter::{Conjunction, FilterNode, TextReader, TypeRegistry};

use super::{CommandContext, Result};

/// Options for the encode command.
#[derive(Debug)]
pub struct EncodeOptions<'a> {
    /// Textual form to read.
    pub text: &'a str,
    /// Operator used for every group.
    pub operator: Conjunction,
    /// Destination file; stdout when absent.
    pub output: Option<&'a Path>,
}

/// Reads the textual form into a tree.
pub fn build_definition(text: &str, operator: Conjunction) -> Result<FilterNode> {
    let registry = TypeRegistry::with_builtin();
    Ok(TextReader::new(&registry, operator).parse(text)?)
}

/// Executes the encode command.
///
/// # Errors
///
/// Returns an error if the text is malformed or the output cannot be written.
pub fn execute(ctx: &CommandContext, opts: &EncodeOptions<'_>) -> Result<()> {
    let node = build_definition(opts.text, opts.operator)?;
    let bytes = node.to_tagged_bytes()?;

    match opts.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &bytes)?;

            if ctx.json_output {
                let output = serde_json::json!({
                    "status": "success",
                    "path": path.display().to_string(),
                    "bytes": bytes.len(),
                    "leaves": node.leaf_count(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if !ctx.quiet {
                println!(
                    "Wrote {} bytes ({} criteria) to {}",
                    bytes.len(),
                    node.leaf_count(),
                    path.display()
                );
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartlist_core::filter::FilterError;

    #[test]
    fn test_build_definition_uses_operator() {
        let node = build_definition("[status=open,tag=urgent]", Conjunction::Or).unwrap();
        let FilterNode::Conjunction(group) = node else {
            panic!("expected a group");
        };
        assert_eq!(group.operator(), Conjunction::Or);
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_build_definition_reports_position() {
        let err = build_definition("[status=open", Conjunction::And).unwrap_err();
        match err {
            super::super::CommandError::Filter(FilterError::MalformedTextPayload {
                position, ..
            }) => assert_eq!(position, 0),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
