use crate::cli::Cli;
use crate::error::{RegistryError, Result};
use crate::invocation::DEFAULT_MARKER;
use crate::template::DEFAULT_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".slash-registry.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub invocation: InvocationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Verbosity from repeated `-v` flags (not stored in config file)
    #[serde(skip)]
    pub verbose: u8,

    /// Emit JSON instead of text (not stored in config file)
    #[serde(skip)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryConfig {
    /// Plugin root; detected from the working directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default = "default_commands_dir")]
    pub commands_dir: PathBuf,

    #[serde(default = "default_agents_dir")]
    pub agents_dir: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            root: None,
            manifest: default_manifest(),
            commands_dir: default_commands_dir(),
            agents_dir: default_agents_dir(),
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("plugin.json")
}

fn default_commands_dir() -> PathBuf {
    PathBuf::from("commands")
}

fn default_agents_dir() -> PathBuf {
    PathBuf::from("agents")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
        }
    }
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvocationConfig {
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl Default for InvocationConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
        }
    }
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

impl InvocationConfig {
    /// The marker as a single character.
    pub fn marker_char(&self) -> Result<char> {
        let mut chars = self.marker.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(c),
            _ => Err(RegistryError::InvalidConfig(format!(
                "invocation marker must be a single non-whitespace character, got '{}'",
                self.marker
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "warn" or "slash_registry=debug"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

impl Config {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied later via with_cli_overrides)
    /// 2. Environment variables
    /// 3. Plugin config (.slash-registry.toml in the plugin root)
    /// 4. Global config (~/.slash-registry.toml)
    /// 5. Built-in defaults
    ///
    /// Pass `None` before the plugin root is known to get global settings only.
    pub fn load(plugin_root: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global) = global_config_path() {
            if global.exists() {
                config = config.merge(ConfigLayer::read(&global)?);
            }
        }

        if let Some(root) = plugin_root {
            let local = root.join(CONFIG_FILE_NAME);
            if local.exists() {
                config = config.merge(ConfigLayer::read(&local)?);
            }
        }

        config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(ConfigLayer::read(path)?.config)
    }

    /// Overlay the keys `layer` actually sets, even when they equal the defaults.
    fn merge(mut self, layer: ConfigLayer) -> Self {
        let other = &layer.config;

        if layer.sets("registry", "root") {
            self.registry.root = other.registry.root.clone();
        }
        if layer.sets("registry", "manifest") {
            self.registry.manifest = other.registry.manifest.clone();
        }
        if layer.sets("registry", "commands_dir") {
            self.registry.commands_dir = other.registry.commands_dir.clone();
        }
        if layer.sets("registry", "agents_dir") {
            self.registry.agents_dir = other.registry.agents_dir.clone();
        }

        if layer.sets("template", "placeholder") {
            self.template.placeholder = other.template.placeholder.clone();
        }
        if layer.sets("invocation", "marker") {
            self.invocation.marker = other.invocation.marker.clone();
        }

        if layer.sets("logging", "level") {
            self.logging.level = other.logging.level.clone();
        }
        if layer.sets("logging", "format") {
            self.logging.format = other.logging.format;
        }

        self
    }

    fn merge_env(mut self) -> Self {
        if let Ok(root) = std::env::var("SLASH_REGISTRY_ROOT") {
            if !root.is_empty() {
                self.registry.root = Some(PathBuf::from(root));
            }
        }

        if let Ok(manifest) = std::env::var("SLASH_REGISTRY_MANIFEST") {
            if !manifest.is_empty() {
                self.registry.manifest = PathBuf::from(manifest);
            }
        }

        self
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        self.verbose = cli.verbose;
        self.json = cli.json;

        if let Some(root) = &cli.root {
            self.registry.root = Some(root.clone());
        }
        if let Some(manifest) = &cli.manifest {
            self.registry.manifest = manifest.clone();
        }

        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.template.placeholder.trim().is_empty() {
            return Err(RegistryError::InvalidConfig(
                "template placeholder cannot be empty".to_string(),
            ));
        }

        self.invocation.marker_char()?;

        for (name, value) in [
            ("registry.manifest", &self.registry.manifest),
            ("registry.commands_dir", &self.registry.commands_dir),
            ("registry.agents_dir", &self.registry.agents_dir),
        ] {
            if value.as_os_str().is_empty() {
                return Err(RegistryError::InvalidConfig(format!(
                    "{} cannot be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// One config file: its typed values plus the raw table recording which keys it sets.
struct ConfigLayer {
    config: Config,
    keys: toml::Table,
}

impl ConfigLayer {
    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            config: toml::from_str(&contents)?,
            keys: toml::from_str(&contents)?,
        })
    }

    fn sets(&self, section: &str, key: &str) -> bool {
        self.keys
            .get(section)
            .and_then(|s| s.as_table())
            .is_some_and(|s| s.contains_key(key))
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Get the home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
