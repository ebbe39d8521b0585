use crate::definition::{Definition, Kind};
use crate::error::Result;
use crate::registry::Registry;
use std::fmt::Write;

pub fn format_definition(registry: &Registry, definition: &Definition) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", definition.kind, definition.identifier);
    let _ = writeln!(out, "  Description: {}", definition.description);
    let _ = writeln!(out, "  Source: {}", definition.source);
    if let Some(category) = &definition.category {
        let _ = writeln!(out, "  Category: {}", category);
    }
    if let Some(model) = &definition.model_hint {
        let _ = writeln!(out, "  Model: {}", model);
    }
    if let Some(color) = &definition.color_hint {
        let _ = writeln!(out, "  Color: {}", color);
    }
    if let Some(hint) = &definition.argument_hint {
        let _ = writeln!(out, "  Arguments: {}", hint);
    }
    let placeholder = if registry.renderer().has_placeholder(&definition.body) {
        "yes"
    } else {
        "no (arguments are ignored)"
    };
    let _ = writeln!(out, "  Takes arguments: {}", placeholder);
    let _ = writeln!(out, "\n{}", definition.body.trim_end());
    out
}

pub fn execute(registry: &Registry, kind: Kind, identifier: &str, json: bool) -> Result<()> {
    let definition = registry.store().get(kind, identifier)?;
    if json {
        return super::print_json(definition.as_ref());
    }
    print!("{}", format_definition(registry, &definition));
    Ok(())
}
