//! Parsing `/name arguments...` invocations and resolving them against a store.

use crate::definition::{validate_identifier, Definition, Kind};
use crate::error::{RegistryError, Result};
use crate::store::DefinitionStore;
use crate::template::TemplateRenderer;
use std::sync::Arc;

pub const DEFAULT_MARKER: char = '/';

/// A raw invocation split into identifier and argument text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub identifier: &'a str,
    pub arguments: &'a str,
}

impl<'a> Invocation<'a> {
    /// Split `raw` into its identifier and verbatim argument text.
    ///
    /// One leading `marker` is stripped if present. Everything after the whitespace that
    /// follows the identifier is returned untouched, internal and trailing whitespace included.
    pub fn parse(raw: &'a str, marker: char) -> Result<Self> {
        let trimmed = raw.trim_start();
        let trimmed = trimmed.strip_prefix(marker).unwrap_or(trimmed);

        let (identifier, arguments) = match trimmed.find(char::is_whitespace) {
            Some(idx) => (&trimmed[..idx], trimmed[idx..].trim_start()),
            None => (trimmed, ""),
        };

        if identifier.is_empty() {
            return Err(RegistryError::EmptyInvocation);
        }
        validate_identifier(identifier)?;

        Ok(Self {
            identifier,
            arguments,
        })
    }
}

/// Resolves invocations against a borrowed store.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a DefinitionStore,
    renderer: &'a TemplateRenderer,
    marker: char,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a DefinitionStore, renderer: &'a TemplateRenderer, marker: char) -> Self {
        Self {
            store,
            renderer,
            marker,
        }
    }

    /// Look up the definition named by `raw` and return it with the argument text.
    pub fn resolve<'r>(&self, kind: Kind, raw: &'r str) -> Result<(Arc<Definition>, &'r str)> {
        let invocation = Invocation::parse(raw, self.marker)?;
        let definition = self.store.get(kind, invocation.identifier)?;
        tracing::debug!(
            kind = %kind,
            identifier = invocation.identifier,
            argument_len = invocation.arguments.len(),
            "resolved invocation"
        );
        Ok((definition, invocation.arguments))
    }

    /// Resolve `raw` and render the definition body with its arguments.
    pub fn resolve_and_render(&self, kind: Kind, raw: &str) -> Result<String> {
        let (definition, arguments) = self.resolve(kind, raw)?;
        Ok(self.renderer.render(&definition.body, arguments))
    }
}
