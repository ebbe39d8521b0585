use crate::definition::Kind;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub mod router;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration files
    Validate {
        /// Optional path to a specific config file to validate
        file: Option<PathBuf>,
    },

    /// Show effective configuration after merging all sources
    Show,
}

#[derive(Parser, Debug)]
#[command(name = "slash-registry")]
#[command(
    about = "Load, validate and render slash-command and agent definitions",
    long_about = None
)]
#[command(version = env!("SLASH_REGISTRY_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Plugin root directory (default: nearest directory containing the manifest)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Manifest path relative to the plugin root
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve an invocation and print the rendered prompt
    Run {
        /// Resolve against agents instead of commands
        #[arg(long)]
        agent: bool,

        /// Invocation such as `/api-new create a user endpoint`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        invocation: Vec<String>,
    },

    /// List loaded definitions grouped by category
    List {
        /// Only list one kind
        #[arg(long, value_enum)]
        kind: Option<Kind>,
    },

    /// Show one definition with its metadata and body
    Show {
        /// Identifier of the command or agent
        identifier: String,

        /// Look up an agent instead of a command
        #[arg(long)]
        agent: bool,
    },

    /// Load the plugin and report whether it is valid
    Validate,

    /// Show plugin metadata and registry statistics
    Info,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

pub fn kind_flag(agent: bool) -> Kind {
    if agent {
        Kind::Agent
    } else {
        Kind::Command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_keeps_argument_words() {
        let cli = Cli::try_parse_from([
            "slash-registry",
            "run",
            "/api-new",
            "create",
            "--fast",
            "endpoint",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run { agent, invocation }) => {
                assert!(!agent);
                assert_eq!(invocation, vec!["/api-new", "create", "--fast", "endpoint"]);
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["slash-registry", "list", "--json", "-vv", "--kind", "agent"])
            .unwrap();

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Some(Commands::List {
                kind: Some(Kind::Agent)
            })
        ));
    }

    #[test]
    fn test_kind_flag() {
        assert_eq!(kind_flag(true), Kind::Agent);
        assert_eq!(kind_flag(false), Kind::Command);
    }
}
