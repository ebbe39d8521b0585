//! Placeholder substitution for definition bodies.

use crate::error::{RegistryError, Result};
use std::path::Path;

pub const DEFAULT_PLACEHOLDER: &str = "$ARGUMENTS";

/// Substitutes caller-supplied text for the placeholder token in a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRenderer {
    placeholder: String,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl TemplateRenderer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn has_placeholder(&self, body: &str) -> bool {
        body.contains(&self.placeholder)
    }

    /// Reject bodies where substitution would be ambiguous.
    pub fn validate(&self, body: &str, path: &Path) -> Result<()> {
        let count = body.matches(self.placeholder.as_str()).count();
        if count > 1 {
            return Err(RegistryError::MalformedTemplate {
                path: path.to_path_buf(),
                placeholder: self.placeholder.clone(),
                count,
            });
        }
        Ok(())
    }

    /// Insert `arguments` verbatim in place of the placeholder.
    ///
    /// Bodies without a placeholder come back unchanged and the arguments are dropped.
    /// Bodies are validated at load time, so only the first occurrence is ever replaced.
    pub fn render(&self, body: &str, arguments: &str) -> String {
        body.replacen(self.placeholder.as_str(), arguments, 1)
    }
}
