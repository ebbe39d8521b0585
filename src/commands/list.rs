use crate::definition::{Definition, Kind};
use crate::error::Result;
use crate::registry::Registry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Serialize)]
pub struct ListEntry<'a> {
    pub kind: Kind,
    pub identifier: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_hint: Option<&'a str>,
    pub takes_arguments: bool,
}

pub fn entries(registry: &Registry, kind: Option<Kind>) -> Vec<ListEntry<'_>> {
    let kinds: Vec<Kind> = kind.map(|k| vec![k]).unwrap_or_else(|| Kind::ALL.to_vec());
    kinds
        .into_iter()
        .flat_map(|k| registry.store().list(k))
        .map(|d| ListEntry {
            kind: d.kind,
            identifier: &d.identifier,
            description: &d.description,
            category: d.category.as_deref(),
            model_hint: d.model_hint.as_deref(),
            takes_arguments: registry.renderer().has_placeholder(&d.body),
        })
        .collect()
}

/// Human-readable listing, one section per kind, grouped by category.
pub fn format_listing(registry: &Registry, kind: Option<Kind>) -> String {
    let mut out = String::new();
    let kinds: Vec<Kind> = kind.map(|k| vec![k]).unwrap_or_else(|| Kind::ALL.to_vec());

    for kind in kinds {
        let definitions: Vec<&Definition> = registry.store().list(kind).map(|d| d.as_ref()).collect();
        let heading = match kind {
            Kind::Command => "Commands",
            Kind::Agent => "Agents",
        };
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{} ({}):", heading, definitions.len());

        if definitions.is_empty() {
            let _ = writeln!(out, "  (none)");
            continue;
        }

        // Uncategorised definitions sort first
        let mut groups: BTreeMap<Option<&str>, Vec<&Definition>> = BTreeMap::new();
        for def in definitions {
            groups.entry(def.category.as_deref()).or_default().push(def);
        }

        let prefix = match kind {
            Kind::Command => registry.marker().to_string(),
            Kind::Agent => String::new(),
        };
        for (category, defs) in groups {
            let indent = if let Some(category) = category {
                let _ = writeln!(out, "  [{}]", category);
                "    "
            } else {
                "  "
            };
            for def in defs {
                let name = format!("{}{}", prefix, def.identifier);
                let _ = writeln!(out, "{}{:<28} {}", indent, name, first_line(&def.description));
            }
        }
    }

    out
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

pub fn execute(registry: &Registry, kind: Option<Kind>, json: bool) -> Result<()> {
    if json {
        return super::print_json(&entries(registry, kind));
    }
    print!("{}", format_listing(registry, kind));
    Ok(())
}
