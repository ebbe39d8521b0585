//! Builds a [`Registry`] from a plugin directory tree.
//!
//! Loading is all-or-nothing: definitions are collected into a private store and only
//! wrapped into a `Registry` once every file parsed and the manifest cross-check passed.

use crate::config::Config;
use crate::definition::{self, Kind, SourceFile};
use crate::error::{RegistryError, Result};
use crate::invocation::DEFAULT_MARKER;
use crate::manifest::{normalize_source, Manifest};
use crate::registry::Registry;
use crate::store::DefinitionStore;
use crate::template::TemplateRenderer;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct RegistryLoader {
    root: PathBuf,
    manifest: PathBuf,
    commands_dir: PathBuf,
    agents_dir: PathBuf,
    renderer: TemplateRenderer,
    marker: char,
}

impl RegistryLoader {
    /// Loader with the default layout: `plugin.json`, `commands/`, `agents/`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest: PathBuf::from("plugin.json"),
            commands_dir: PathBuf::from("commands"),
            agents_dir: PathBuf::from("agents"),
            renderer: TemplateRenderer::default(),
            marker: DEFAULT_MARKER,
        }
    }

    /// Loader for `root` using the layout and template settings from `config`.
    pub fn from_config(root: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        Ok(Self::new(root)
            .with_manifest(&config.registry.manifest)
            .with_commands_dir(&config.registry.commands_dir)
            .with_agents_dir(&config.registry.agents_dir)
            .with_renderer(TemplateRenderer::new(config.template.placeholder.clone()))
            .with_marker(config.invocation.marker_char()?))
    }

    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = path.into();
        self
    }

    pub fn with_commands_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.commands_dir = dir.into();
        self
    }

    pub fn with_agents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.agents_dir = dir.into();
        self
    }

    pub fn with_renderer(mut self, renderer: TemplateRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }

    fn subtree(&self, kind: Kind) -> PathBuf {
        match kind {
            Kind::Command => self.root.join(&self.commands_dir),
            Kind::Agent => self.root.join(&self.agents_dir),
        }
    }

    /// Parse every source file, cross-check against the manifest and build a registry.
    pub fn load(&self) -> Result<Registry> {
        let manifest = Manifest::load(&self.manifest_path())?;

        let mut store = DefinitionStore::new();
        for kind in Kind::ALL {
            for source in self.discover(kind)? {
                let content = std::fs::read_to_string(&source.path).map_err(|e| {
                    RegistryError::ReadFile {
                        path: source.path.clone(),
                        source: e,
                    }
                })?;

                let definition = match kind {
                    Kind::Command => definition::parse_command(&content, &source)?,
                    Kind::Agent => definition::parse_agent(&content, &source)?,
                };
                self.renderer.validate(&definition.body, &source.path)?;

                tracing::debug!(
                    kind = %kind,
                    identifier = %definition.identifier,
                    path = %source.relative,
                    "parsed definition"
                );
                store.put(definition)?;
            }
        }

        cross_validate(&manifest, &store, &self.root)?;

        let registry = Registry::new(
            store,
            manifest,
            self.root.clone(),
            self.renderer.clone(),
            self.marker,
        );
        tracing::info!(
            plugin = %registry.plugin_name(),
            commands = registry.store().len(Kind::Command),
            agents = registry.store().len(Kind::Agent),
            fingerprint = %registry.fingerprint(),
            "registry loaded"
        );
        Ok(registry)
    }

    /// Markdown sources under the kind's subtree, in sorted path order.
    fn discover(&self, kind: Kind) -> Result<Vec<SourceFile>> {
        let subtree = self.subtree(kind);
        if !subtree.is_dir() {
            tracing::debug!(kind = %kind, path = %subtree.display(), "no source directory");
            return Ok(Vec::new());
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(&subtree).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_markdown = path.extension().and_then(|e| e.to_str()) == Some("md");
            if entry.file_type().is_file() && is_markdown {
                sources.push(SourceFile::new(&self.root, &subtree, path)?);
            }
        }
        Ok(sources)
    }
}

/// Require a one-to-one match between manifest entries and parsed definitions.
fn cross_validate(manifest: &Manifest, store: &DefinitionStore, root: &Path) -> Result<()> {
    let mut listed = HashSet::new();

    for entry in manifest.entries() {
        let source = normalize_source(entry.source);
        let matches = store
            .get(entry.kind, entry.identifier)
            .map(|definition| definition.source == source)
            .unwrap_or(false);

        if !matches {
            return Err(RegistryError::MissingDefinition {
                kind: entry.kind,
                identifier: entry.identifier.to_string(),
                source_path: source,
            });
        }
        listed.insert((entry.kind, entry.identifier));
    }

    if let Some(extra) = store
        .iter()
        .find(|d| !listed.contains(&(d.kind, d.identifier.as_str())))
    {
        return Err(RegistryError::UnregisteredDefinition {
            kind: extra.kind,
            identifier: extra.identifier.clone(),
            path: root.join(&extra.source),
        });
    }

    Ok(())
}
