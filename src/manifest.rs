//! Plugin manifest (`plugin.json`) listing every expected command and agent.
//!
//! ```json
//! {
//!   "name": "fullstack-toolkit",
//!   "version": "1.2.0",
//!   "commands": [{ "name": "api-new", "source": "commands/api/api-new.md" }],
//!   "agents": [{ "name": "security-auditor", "source": "agents/security-auditor.md" }]
//! }
//! ```

use crate::definition::{join_components, validate_identifier, Kind};
use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Manifest {
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub commands: Vec<ManifestItem>,

    #[serde(default)]
    pub agents: Vec<ManifestItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManifestItem {
    pub name: String,
    pub source: String,
}

/// One expected definition, as the loader sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry<'a> {
    pub kind: Kind,
    pub identifier: &'a str,
    pub source: &'a str,
}

impl Manifest {
    /// Read and validate the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse manifest JSON; `path` is only used in error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        let manifest: Manifest =
            serde_json::from_str(contents).map_err(|source| RegistryError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// All entries in document order, commands before agents.
    pub fn entries(&self) -> impl Iterator<Item = ManifestEntry<'_>> + '_ {
        let commands = self.commands.iter().map(|item| (Kind::Command, item));
        let agents = self.agents.iter().map(|item| (Kind::Agent, item));
        commands.chain(agents).map(|(kind, item)| ManifestEntry {
            kind,
            identifier: item.name.as_str(),
            source: item.source.as_str(),
        })
    }

    pub fn parsed_version(&self) -> Option<semver::Version> {
        self.version
            .as_deref()
            .and_then(|v| semver::Version::parse(v).ok())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidManifest(
                "plugin name cannot be empty".to_string(),
            ));
        }

        if let Some(version) = &self.version {
            semver::Version::parse(version).map_err(|e| {
                RegistryError::InvalidManifest(format!(
                    "version '{}' is not valid semver: {}",
                    version, e
                ))
            })?;
        }

        let mut seen: HashSet<(Kind, &str)> = HashSet::new();
        for entry in self.entries() {
            validate_identifier(entry.identifier)?;

            if entry.source.trim().is_empty() {
                return Err(RegistryError::InvalidManifest(format!(
                    "{} '{}' has an empty source path",
                    entry.kind, entry.identifier
                )));
            }

            if !seen.insert((entry.kind, entry.identifier)) {
                return Err(RegistryError::DuplicateIdentifier {
                    kind: entry.kind,
                    identifier: entry.identifier.to_string(),
                    first: PathBuf::from("plugin manifest"),
                    second: PathBuf::from(entry.source),
                });
            }
        }

        Ok(())
    }
}

/// Normalise a manifest source path for comparison with discovered files.
pub fn normalize_source(source: &str) -> String {
    let source = source.trim().replace('\\', "/");
    let path: PathBuf = Path::new(&source)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    join_components(&path)
}
