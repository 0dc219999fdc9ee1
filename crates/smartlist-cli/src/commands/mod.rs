//! Command implementations for the sl CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod encode;
pub mod eval;
pub mod sql;
pub mod summary;
pub mod text;

use std::fs;
use std::path::Path;

use smartlist_core::filter::{FilterError, FilterNode, TaggedDecoder, TypeRegistry, UnknownLeafPolicy};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter definition error.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input file error.
    #[error("cannot read '{path}': {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Locale for summaries.
    pub locale: String,
    /// What to do with leaves of unregistered kinds.
    pub unknown_leaf: UnknownLeafPolicy,
}

impl CommandContext {
    /// Creates a context from CLI arguments; flags override the config file.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let use_colors = !cli.no_color
            && config.output.color.unwrap_or(true)
            && std::env::var_os("NO_COLOR").is_none();
        let unknown_leaf = if cli.skip_unknown {
            UnknownLeafPolicy::Skip
        } else {
            config.decode.unknown_leaf.unwrap_or_default()
        };

        Self {
            json_output: cli.json,
            use_colors,
            quiet: cli.quiet,
            verbose: cli.verbose,
            locale: cli
                .locale
                .clone()
                .or_else(|| config.locale.clone())
                .unwrap_or_else(|| config::DEFAULT_LOCALE.to_string()),
            unknown_leaf,
        }
    }
}

/// Reads a file, keeping its path in the error.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| CommandError::Input {
        path: path.display().to_string(),
        source,
    })
}

/// Loads a persisted definition (tagged form) with the context's decode policy.
pub(crate) fn load_definition(ctx: &CommandContext, path: &Path) -> Result<FilterNode> {
    let bytes = read_input(path)?;
    let registry = TypeRegistry::with_builtin();
    let decoded = TaggedDecoder::new(&registry)
        .with_policy(ctx.unknown_leaf)
        .decode_report(&bytes)?;

    if !decoded.skipped.is_empty() && !ctx.quiet && !ctx.json_output {
        eprintln!(
            "Skipped {} unknown criteria: {}",
            decoded.skipped.len(),
            decoded.skipped.join(", ")
        );
    }
    Ok(decoded.node)
}
