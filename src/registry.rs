//! Immutable registry snapshots and the handle that publishes them.

use crate::definition::Kind;
use crate::error::Result;
use crate::invocation::Resolver;
use crate::loader::RegistryLoader;
use crate::manifest::Manifest;
use crate::store::DefinitionStore;
use crate::template::TemplateRenderer;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A fully validated, read-only set of definitions from one load pass.
#[derive(Debug)]
pub struct Registry {
    store: DefinitionStore,
    manifest: Manifest,
    root: PathBuf,
    renderer: TemplateRenderer,
    marker: char,
    fingerprint: String,
    loaded_at: DateTime<Utc>,
}

impl Registry {
    pub(crate) fn new(
        store: DefinitionStore,
        manifest: Manifest,
        root: PathBuf,
        renderer: TemplateRenderer,
        marker: char,
    ) -> Self {
        let fingerprint = fingerprint(&store);
        Self {
            store,
            manifest,
            root,
            renderer,
            marker,
            fingerprint,
            loaded_at: Utc::now(),
        }
    }

    pub fn store(&self) -> &DefinitionStore {
        &self.store
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn plugin_name(&self) -> &str {
        &self.manifest.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// Hex digest over every definition's identity and content.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store, &self.renderer, self.marker)
    }

    /// Resolve `raw` and return the rendered body.
    pub fn execute(&self, kind: Kind, raw: &str) -> Result<String> {
        self.resolver().resolve_and_render(kind, raw)
    }
}

fn fingerprint(store: &DefinitionStore) -> String {
    let mut buffer = Vec::new();
    for def in store.iter() {
        let fields = [
            def.kind.as_str(),
            def.identifier.as_str(),
            def.source.as_str(),
            def.description.as_str(),
            def.model_hint.as_deref().unwrap_or(""),
            def.color_hint.as_deref().unwrap_or(""),
            def.argument_hint.as_deref().unwrap_or(""),
            def.body.as_str(),
        ];
        for field in fields {
            buffer.extend_from_slice(field.as_bytes());
            buffer.push(0);
        }
    }
    format!("{:x}", md5::compute(&buffer))
}

/// Owns the current registry and swaps it wholesale on reload.
///
/// Readers take an `Arc` snapshot; a reload in progress never affects a snapshot already taken.
#[derive(Debug)]
pub struct RegistryHandle {
    loader: RegistryLoader,
    current: RwLock<Arc<Registry>>,
}

impl RegistryHandle {
    /// Perform the initial load. There is no previous registry to fall back to.
    pub fn open(loader: RegistryLoader) -> Result<Self> {
        let registry = loader.load()?;
        Ok(Self {
            loader,
            current: RwLock::new(Arc::new(registry)),
        })
    }

    pub fn snapshot(&self) -> Arc<Registry> {
        Arc::clone(&*self.current.read())
    }

    /// Rebuild from disk and publish the result.
    ///
    /// On failure the previous registry stays active and the error is returned.
    pub fn reload(&self) -> Result<Arc<Registry>> {
        let next = match self.loader.load() {
            Ok(registry) => Arc::new(registry),
            Err(e) => {
                tracing::warn!(error = %e, "reload failed, keeping previous registry");
                return Err(e);
            }
        };

        let previous = {
            let mut current = self.current.write();
            std::mem::replace(&mut *current, Arc::clone(&next))
        };

        if previous.fingerprint() == next.fingerprint() {
            tracing::debug!(fingerprint = %next.fingerprint(), "reload found no changes");
        } else {
            tracing::info!(
                from = %previous.fingerprint(),
                to = %next.fingerprint(),
                "registry replaced"
            );
        }
        Ok(next)
    }

    /// Resolve and render against the registry current at call time.
    pub fn execute(&self, kind: Kind, raw: &str) -> Result<String> {
        self.snapshot().execute(kind, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn plugin() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "plugin.json",
            r#"{"name": "demo", "commands": [{"name": "fix", "source": "commands/fix.md"}]}"#,
        );
        write(
            dir.path(),
            "commands/fix.md",
            "---\ndescription: Fix an issue\n---\nFix: $ARGUMENTS",
        );
        dir
    }

    #[test]
    fn test_execute() {
        let dir = plugin();
        let handle = RegistryHandle::open(RegistryLoader::new(dir.path())).unwrap();

        let out = handle.execute(Kind::Command, "/fix issue 42").unwrap();
        assert_eq!(out, "Fix: issue 42");
    }

    #[test]
    fn test_fingerprint_stable_across_loads() {
        let dir = plugin();
        let loader = RegistryLoader::new(dir.path());

        let a = loader.load().unwrap();
        let b = loader.load().unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 32);
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = plugin();
        let handle = RegistryHandle::open(RegistryLoader::new(dir.path())).unwrap();
        let before = handle.snapshot();

        write(
            dir.path(),
            "commands/fix.md",
            "---\ndescription: Fix an issue\n---\nPlease fix: $ARGUMENTS",
        );
        let after = handle.reload().unwrap();

        assert_ne!(before.fingerprint(), after.fingerprint());
        assert_eq!(
            handle.execute(Kind::Command, "/fix it").unwrap(),
            "Please fix: it"
        );
        // Snapshot taken before the reload is untouched
        assert_eq!(before.execute(Kind::Command, "/fix it").unwrap(), "Fix: it");
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let dir = plugin();
        let handle = RegistryHandle::open(RegistryLoader::new(dir.path())).unwrap();
        let fingerprint = handle.snapshot().fingerprint().to_string();

        fs::remove_file(dir.path().join("commands/fix.md")).unwrap();
        let result = handle.reload();

        assert!(matches!(result, Err(RegistryError::MissingDefinition { .. })));
        assert_eq!(handle.snapshot().fingerprint(), fingerprint);
        assert!(handle.execute(Kind::Command, "/fix x").is_ok());
    }

    #[test]
    fn test_open_fails_without_fallback() {
        let dir = plugin();
        write(
            dir.path(),
            "commands/fix.md",
            "---\ndescription: Fix\n---\n$ARGUMENTS then $ARGUMENTS",
        );

        let result = RegistryHandle::open(RegistryLoader::new(dir.path()));
        assert!(matches!(result, Err(RegistryError::MalformedTemplate { .. })));
    }

    #[test]
    fn test_concurrent_readers_see_whole_registries() {
        let dir = plugin();
        let handle = Arc::new(RegistryHandle::open(RegistryLoader::new(dir.path())).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = Arc::clone(&handle);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let out = handle.execute(Kind::Command, "/fix x").unwrap();
                        assert!(out == "Fix: x" || out == "Now fix: x", "torn read: {}", out);
                    }
                })
            })
            .collect();

        write(
            dir.path(),
            "commands/fix.md",
            "---\ndescription: Fix an issue\n---\nNow fix: $ARGUMENTS",
        );
        handle.reload().unwrap();

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
