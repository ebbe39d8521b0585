//! In-memory definition store keyed by kind and identifier.

use crate::definition::{Definition, Kind};
use crate::error::{RegistryError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct DefinitionStore {
    commands: BTreeMap<String, Arc<Definition>>,
    agents: BTreeMap<String, Arc<Definition>>,
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: Kind) -> &BTreeMap<String, Arc<Definition>> {
        match kind {
            Kind::Command => &self.commands,
            Kind::Agent => &self.agents,
        }
    }

    /// Insert a definition, rejecting a second entry with the same kind and identifier.
    pub fn put(&mut self, definition: Definition) -> Result<()> {
        let table = match definition.kind {
            Kind::Command => &mut self.commands,
            Kind::Agent => &mut self.agents,
        };

        if let Some(existing) = table.get(&definition.identifier) {
            return Err(RegistryError::DuplicateIdentifier {
                kind: definition.kind,
                identifier: definition.identifier,
                first: PathBuf::from(&existing.source),
                second: PathBuf::from(definition.source),
            });
        }

        table.insert(definition.identifier.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, kind: Kind, identifier: &str) -> Result<Arc<Definition>> {
        self.table(kind)
            .get(identifier)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                kind,
                identifier: identifier.to_string(),
            })
    }

    pub fn contains(&self, kind: Kind, identifier: &str) -> bool {
        self.table(kind).contains_key(identifier)
    }

    /// Definitions of `kind`, sorted by identifier. Call again to restart.
    pub fn list(&self, kind: Kind) -> impl Iterator<Item = &Arc<Definition>> + '_ {
        self.table(kind).values()
    }

    /// All definitions, commands first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Definition>> + '_ {
        Kind::ALL.into_iter().flat_map(move |kind| self.list(kind))
    }

    /// Distinct categories used by `kind`, sorted.
    pub fn categories(&self, kind: Kind) -> BTreeSet<&str> {
        self.list(kind)
            .filter_map(|d| d.category.as_deref())
            .collect()
    }

    pub fn len(&self, kind: Kind) -> usize {
        self.table(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(kind: Kind, identifier: &str, category: Option<&str>) -> Definition {
        Definition {
            identifier: identifier.to_string(),
            kind,
            description: format!("{} description", identifier),
            model_hint: None,
            color_hint: None,
            argument_hint: None,
            category: category.map(str::to_string),
            source: format!("{}s/{}.md", kind, identifier),
            body: String::new(),
        }
    }

    #[test]
    fn test_put_and_get() {
        let mut store = DefinitionStore::new();
        store.put(definition(Kind::Command, "lint", None)).unwrap();

        let found = store.get(Kind::Command, "lint").unwrap();
        assert_eq!(found.identifier, "lint");
        assert!(store.contains(Kind::Command, "lint"));
        assert!(!store.contains(Kind::Agent, "lint"));
    }

    #[test]
    fn test_get_missing() {
        let store = DefinitionStore::new();
        let result = store.get(Kind::Agent, "reviewer");
        assert!(matches!(
            result,
            Err(RegistryError::NotFound { kind: Kind::Agent, identifier }) if identifier == "reviewer"
        ));
    }

    #[test]
    fn test_duplicate_same_kind() {
        let mut store = DefinitionStore::new();
        store.put(definition(Kind::Command, "lint", None)).unwrap();

        let mut second = definition(Kind::Command, "lint", Some("quality"));
        second.source = "commands/quality/lint.md".to_string();
        let result = store.put(second);

        match result {
            Err(RegistryError::DuplicateIdentifier {
                identifier,
                first,
                second,
                ..
            }) => {
                assert_eq!(identifier, "lint");
                assert_eq!(first, PathBuf::from("commands/lint.md"));
                assert_eq!(second, PathBuf::from("commands/quality/lint.md"));
            }
            other => panic!("expected DuplicateIdentifier, got {:?}", other),
        }
        assert_eq!(store.len(Kind::Command), 1);
    }

    #[test]
    fn test_same_identifier_across_kinds() {
        let mut store = DefinitionStore::new();
        store.put(definition(Kind::Command, "review", None)).unwrap();
        store.put(definition(Kind::Agent, "review", None)).unwrap();

        assert_eq!(store.len(Kind::Command), 1);
        assert_eq!(store.len(Kind::Agent), 1);
    }

    #[test]
    fn test_list_sorted_and_restartable() {
        let mut store = DefinitionStore::new();
        for id in ["ui-new", "api-new", "lint"] {
            store.put(definition(Kind::Command, id, None)).unwrap();
        }

        let first: Vec<_> = store.list(Kind::Command).map(|d| d.identifier.as_str()).collect();
        let second: Vec<_> = store.list(Kind::Command).map(|d| d.identifier.as_str()).collect();
        assert_eq!(first, vec!["api-new", "lint", "ui-new"]);
        assert_eq!(first, second);
        assert_eq!(store.list(Kind::Agent).count(), 0);
    }

    #[test]
    fn test_categories() {
        let mut store = DefinitionStore::new();
        store.put(definition(Kind::Command, "api-new", Some("api"))).unwrap();
        store.put(definition(Kind::Command, "api-test", Some("api"))).unwrap();
        store.put(definition(Kind::Command, "ui-new", Some("ui"))).unwrap();
        store.put(definition(Kind::Command, "lint", None)).unwrap();

        let categories: Vec<_> = store.categories(Kind::Command).into_iter().collect();
        assert_eq!(categories, vec!["api", "ui"]);
    }

    #[test]
    fn test_iter_commands_first() {
        let mut store = DefinitionStore::new();
        store.put(definition(Kind::Agent, "auditor", None)).unwrap();
        store.put(definition(Kind::Command, "lint", None)).unwrap();

        let kinds: Vec<_> = store.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![Kind::Command, Kind::Agent]);
        assert!(!store.is_empty());
    }
}
