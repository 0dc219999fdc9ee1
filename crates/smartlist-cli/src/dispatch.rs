//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Commands, ConfigCommands};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Runs one parsed command.
pub fn dispatch(ctx: &CommandContext, command: &Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Summary { file }) => commands::summary::execute(ctx, file),
        Some(Commands::Text { file }) => commands::text::execute(ctx, file),
        Some(Commands::Eval { file, rows, count }) => {
            let opts = commands::eval::EvalOptions {
                file,
                rows,
                count: *count,
            };
            commands::eval::execute(ctx, &opts)
        }
        Some(Commands::Sql { file }) => commands::sql::execute(ctx, file),
        Some(Commands::Encode {
            text,
            operator,
            output,
        }) => {
            let opts = commands::encode::EncodeOptions {
                text,
                operator: (*operator).into(),
                output: output.as_deref(),
            };
            commands::encode::execute(ctx, &opts)
        }
        Some(Commands::Config { command }) => dispatch_config(ctx, command),
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
        None => {
            if !ctx.quiet {
                println!("sl - smart-list filter tool");
                println!("Use --help for usage information");
            }
            Ok(())
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}
