use crate::error::{RegistryError, Result};
use std::path::{Path, PathBuf};

/// The directory a plugin lives in: the one holding its manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRoot {
    root: PathBuf,
}

impl PluginRoot {
    /// Use `root` as given, without looking for a manifest.
    pub fn explicit(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let root = root.canonicalize().map_err(|source| RegistryError::ReadFile {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Walk up from `start` to the first directory containing `manifest`.
    pub fn detect(start: &Path, manifest: &Path) -> Result<Self> {
        let start = start
            .canonicalize()
            .unwrap_or_else(|_| start.to_path_buf());

        for dir in start.ancestors() {
            if dir.join(manifest).is_file() {
                tracing::debug!(root = %dir.display(), "detected plugin root");
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
        }

        Err(RegistryError::PluginRootNotFound(start))
    }

    /// Explicit root when configured, otherwise detection from the working directory.
    pub fn resolve(configured: Option<&Path>, manifest: &Path) -> Result<Self> {
        match configured {
            Some(root) => Self::explicit(root),
            None => {
                let cwd = std::env::current_dir()?;
                Self::detect(&cwd, manifest)
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
