use crate::cli::{Cli, ConfigCommands};
use crate::config::{global_config_path, Config, CONFIG_FILE_NAME};
use crate::error::Result;
use crate::project::PluginRoot;
use std::path::Path;

pub fn execute(command: &ConfigCommands, cli: &Cli) -> Result<()> {
    // Global settings only: the plugin root may be configured there
    let base = Config::load(None)?.with_cli_overrides(cli);

    match command {
        ConfigCommands::Validate { file } => match file {
            Some(path) => validate_file(path),
            None => validate(&base),
        },
        ConfigCommands::Show => show(&base, cli),
    }
}

fn validate_file(path: &Path) -> Result<()> {
    println!("Validating {}...", path.display());
    match Config::from_file(path).and_then(|c| c.validate()) {
        Ok(()) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn validate(base: &Config) -> Result<()> {
    println!("Validating configuration files...\n");

    match global_config_path() {
        Some(global) if global.exists() => println!("  Global config: {}", global.display()),
        Some(global) => println!(
            "  Global config: {} - not found (optional)",
            global.display()
        ),
        None => println!("  Global config: HOME not set - skipped"),
    }

    let root = PluginRoot::resolve(base.registry.root.as_deref(), &base.registry.manifest).ok();
    match &root {
        Some(root) => {
            let local = root.root().join(CONFIG_FILE_NAME);
            if local.exists() {
                println!("  Plugin config: {}", local.display());
            } else {
                println!("  Plugin config: {} - not found (optional)", local.display());
            }
        }
        None => println!("  Plugin config: no plugin root found - skipped"),
    }

    println!("\nLoading and validating configuration...");
    match Config::load(root.as_ref().map(|r| r.root())) {
        Ok(_) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn show(base: &Config, cli: &Cli) -> Result<()> {
    let root = PluginRoot::resolve(base.registry.root.as_deref(), &base.registry.manifest).ok();
    let mut config = Config::load(root.as_ref().map(|r| r.root()))?.with_cli_overrides(cli);
    config.registry.root = root.map(|r| r.root().to_path_buf());

    if base.json {
        return super::print_json(&config);
    }

    println!("Effective Configuration:");
    println!("(CLI > Environment > Plugin config > Global config > Defaults)\n");

    println!("Registry:");
    match &config.registry.root {
        Some(root) => println!("  root: {}", root.display()),
        None => println!("  root: (not found)"),
    }
    println!("  manifest: {}", config.registry.manifest.display());
    println!("  commands_dir: {}", config.registry.commands_dir.display());
    println!("  agents_dir: {}", config.registry.agents_dir.display());

    println!("\nTemplate:");
    println!("  placeholder: {}", config.template.placeholder);

    println!("\nInvocation:");
    println!("  marker: {}", config.invocation.marker);

    println!("\nLogging:");
    println!("  level: {}", config.logging.level);
    println!("  format: {}", config.logging.format.as_str());

    Ok(())
}
