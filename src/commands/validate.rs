use crate::config::Config;
use crate::definition::Kind;
use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    plugin: &'a str,
    commands: usize,
    agents: usize,
    fingerprint: &'a str,
}

pub fn execute(config: &Config) -> Result<()> {
    let loader = super::loader_for(config)?;

    if !config.json {
        println!("Validating plugin at {}...", loader.root().display());
    }

    match loader.load() {
        Ok(registry) => {
            let commands = registry.store().len(Kind::Command);
            let agents = registry.store().len(Kind::Agent);
            if config.json {
                return super::print_json(&ValidationReport {
                    valid: true,
                    plugin: registry.plugin_name(),
                    commands,
                    agents,
                    fingerprint: registry.fingerprint(),
                });
            }
            println!("✓ Plugin '{}' is valid!", registry.plugin_name());
            println!("  Commands: {}", commands);
            println!("  Agents: {}", agents);
            println!("  Fingerprint: {}", registry.fingerprint());
            Ok(())
        }
        Err(e) => {
            if !config.json {
                println!("✗ Plugin is invalid!");
                println!("  Error: {}", e);
            }
            Err(e)
        }
    }
}
