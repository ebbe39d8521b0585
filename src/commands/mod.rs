pub mod config;
pub mod info;
pub mod list;
pub mod run;
pub mod show;
pub mod validate;

use crate::config::Config;
use crate::error::Result;
use crate::loader::RegistryLoader;
use crate::project::PluginRoot;
use crate::registry::RegistryHandle;

/// Locate the plugin root and build a loader for it from the effective config.
pub fn loader_for(config: &Config) -> Result<RegistryLoader> {
    let root = PluginRoot::resolve(config.registry.root.as_deref(), &config.registry.manifest)?;
    RegistryLoader::from_config(root.root(), config)
}

/// Load the plugin described by `config`.
pub fn open_registry(config: &Config) -> Result<RegistryHandle> {
    RegistryHandle::open(loader_for(config)?)
}

/// Serialize `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
