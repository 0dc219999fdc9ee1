//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the sl CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// sl - inspect and evaluate smart-list filter definitions
#[derive(Parser, Debug)]
#[command(name = "sl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Locale for summaries (default: from config, then "en")
    #[arg(long, global = true, env = "SL_LOCALE")]
    pub locale: Option<String>,

    /// Skip leaves of unknown kinds instead of failing
    #[arg(long, global = true)]
    pub skip_unknown: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the localized summary of a definition
    #[command(alias = "s")]
    Summary {
        /// Definition file (tagged form)
        file: PathBuf,
    },

    /// Print the textual form of a definition
    #[command(alias = "t")]
    Text {
        /// Definition file (tagged form)
        file: PathBuf,
    },

    /// Evaluate a definition against rows from a JSON file
    #[command(alias = "e")]
    Eval {
        /// Definition file (tagged form)
        file: PathBuf,

        /// JSON array of row objects
        #[arg(short, long)]
        rows: PathBuf,

        /// Only print the number of matching rows
        #[arg(long)]
        count: bool,
    },

    /// Render a definition as a SQL WHERE fragment
    Sql {
        /// Definition file (tagged form)
        file: PathBuf,
    },

    /// Build a definition from its textual form
    Encode {
        /// Textual form, e.g. "[status=open,tag=urgent]"
        #[arg(short, long)]
        text: String,

        /// Operator for every group (the textual form does not record it)
        #[arg(long, value_enum, default_value = "and")]
        operator: OperatorArg,

        /// Write the tagged form to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Group operator accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorArg {
    And,
    Or,
}

impl From<OperatorArg> for smartlist_core::Conjunction {
    fn from(arg: OperatorArg) -> Self {
        match arg {
            OperatorArg::And => smartlist_core::Conjunction::And,
            OperatorArg::Or => smartlist_core::Conjunction::Or,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["sl", "--verbose", "text", "list.json"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.json);

        let cli = Cli::parse_from(["sl", "--quiet", "--json", "text", "list.json"]);
        assert!(!cli.verbose);
        assert!(cli.quiet);
        assert!(cli.json);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["sl", "-v", "-q", "text", "x"]).is_err());
    }

    #[test]
    fn test_locale_flag() {
        let cli = Cli::parse_from(["sl", "--locale", "de", "summary", "list.json"]);
        assert_eq!(cli.locale, Some("de".to_string()));
    }

    #[test]
    fn test_summary_alias() {
        let cli = Cli::parse_from(["sl", "s", "list.json"]);
        match cli.command {
            Some(Commands::Summary { file }) => assert_eq!(file, PathBuf::from("list.json")),
            other => panic!("Expected Summary command, got {other:?}"),
        }
    }

    #[test]
    fn test_eval_requires_rows() {
        assert!(Cli::try_parse_from(["sl", "eval", "list.json"]).is_err());

        let cli = Cli::parse_from(["sl", "eval", "list.json", "--rows", "rows.json", "--count"]);
        match cli.command {
            Some(Commands::Eval { rows, count, .. }) => {
                assert_eq!(rows, PathBuf::from("rows.json"));
                assert!(count);
            }
            other => panic!("Expected Eval command, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_defaults_to_and() {
        let cli = Cli::parse_from(["sl", "encode", "--text", "[a=1,b=2]"]);
        match cli.command {
            Some(Commands::Encode {
                text,
                operator,
                output,
            }) => {
                assert_eq!(text, "[a=1,b=2]");
                assert_eq!(operator, OperatorArg::And);
                assert!(output.is_none());
            }
            other => panic!("Expected Encode command, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_operator_or() {
        let cli = Cli::parse_from(["sl", "encode", "-t", "a=1", "--operator", "or", "-o", "out.json"]);
        if let Some(Commands::Encode {
            operator, output, ..
        }) = cli.command
        {
            assert_eq!(operator, OperatorArg::Or);
            assert_eq!(output, Some(PathBuf::from("out.json")));
        } else {
            panic!("Expected Encode command");
        }
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::parse_from(["sl", "config", "set", "locale", "de"]);
        if let Some(Commands::Config {
            command: Some(ConfigCommands::Set { key, value }),
        }) = cli.command
        {
            assert_eq!(key, "locale");
            assert_eq!(value, "de");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["sl", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::parse_from(["sl"]);
        assert!(cli.command.is_none());
    }
}
