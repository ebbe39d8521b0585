use crate::definition::Kind;
use crate::error::Result;
use crate::registry::Registry;
use serde_json::json;

pub fn execute(registry: &Registry, json: bool) -> Result<()> {
    let manifest = registry.manifest();

    if json {
        return super::print_json(&json!({
            "name": manifest.name,
            "version": manifest.version,
            "description": manifest.description,
            "root": registry.root(),
            "fingerprint": registry.fingerprint(),
            "loaded_at": registry.loaded_at(),
            "commands": registry.store().len(Kind::Command),
            "agents": registry.store().len(Kind::Agent),
            "placeholder": registry.renderer().placeholder(),
        }));
    }

    println!("Plugin Information:");
    println!("  Name: {}", manifest.name);
    if let Some(version) = &manifest.version {
        println!("  Version: {}", version);
    }
    if let Some(description) = &manifest.description {
        println!("  Description: {}", description);
    }
    if let Some(author) = &manifest.author {
        match &author.email {
            Some(email) => println!("  Author: {} <{}>", author.name, email),
            None => println!("  Author: {}", author.name),
        }
    }
    println!("  Root: {}", registry.root().display());

    println!("\nRegistry:");
    for kind in Kind::ALL {
        let categories: Vec<&str> = registry.store().categories(kind).into_iter().collect();
        if categories.is_empty() {
            println!("  {}s: {}", kind, registry.store().len(kind));
        } else {
            println!(
                "  {}s: {} (categories: {})",
                kind,
                registry.store().len(kind),
                categories.join(", ")
            );
        }
    }
    println!("  Placeholder: {}", registry.renderer().placeholder());
    println!("  Fingerprint: {}", registry.fingerprint());
    println!(
        "  Loaded at: {}",
        registry.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
    );

    Ok(())
}
