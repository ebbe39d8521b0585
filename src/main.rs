#![forbid(unsafe_code)]

use anyhow::Result;
use clap::{CommandFactory, Parser};

use slash_registry::cli::{kind_flag, router, Cli, Commands};
use slash_registry::config::Config;
use slash_registry::invocation::DEFAULT_MARKER;
use slash_registry::logging::init_logging;
use slash_registry::project::PluginRoot;
use slash_registry::{commands, RegistryError};

fn main() -> Result<()> {
    // The marker decides routing, so it comes from global config before argument parsing
    let marker = Config::load(None)
        .and_then(|config| config.invocation.marker_char())
        .unwrap_or(DEFAULT_MARKER);
    let routed_args = router::route_args(std::env::args_os(), marker);
    let cli = Cli::parse_from(routed_args);

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(e) if e.is_invocation_error() => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

fn run(cli: &Cli) -> Result<(), RegistryError> {
    let command = match &cli.command {
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Config { command } => {
            let base = Config::load(None)?.with_cli_overrides(cli);
            init_logging(&base.logging, cli.verbose)?;
            commands::config::execute(command, cli)
        }
        Commands::Validate => commands::validate::execute(&plugin_config(cli)?),
        Commands::Run { agent, invocation } => {
            let config = plugin_config(cli)?;
            let handle = commands::open_registry(&config)?;
            commands::run::execute(&handle, kind_flag(*agent), invocation, config.json)
        }
        Commands::List { kind } => {
            let config = plugin_config(cli)?;
            let handle = commands::open_registry(&config)?;
            commands::list::execute(&handle.snapshot(), *kind, config.json)
        }
        Commands::Show { identifier, agent } => {
            let config = plugin_config(cli)?;
            let handle = commands::open_registry(&config)?;
            commands::show::execute(&handle.snapshot(), kind_flag(*agent), identifier, config.json)
        }
        Commands::Info => {
            let config = plugin_config(cli)?;
            let handle = commands::open_registry(&config)?;
            commands::info::execute(&handle.snapshot(), config.json)
        }
    }
}

/// Global settings and CLI flags locate the plugin, whose own config then applies.
fn plugin_config(cli: &Cli) -> Result<Config, RegistryError> {
    let base = Config::load(None)?.with_cli_overrides(cli);
    let root = PluginRoot::resolve(base.registry.root.as_deref(), &base.registry.manifest)?;
    let mut config = Config::load(Some(root.root()))?.with_cli_overrides(cli);
    config.registry.root = Some(root.root().to_path_buf());

    init_logging(&config.logging, cli.verbose)?;
    Ok(config)
}
