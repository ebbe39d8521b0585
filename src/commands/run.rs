use crate::definition::Kind;
use crate::error::Result;
use crate::registry::RegistryHandle;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RunOutput<'a> {
    kind: Kind,
    identifier: &'a str,
    arguments: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_hint: Option<&'a str>,
    prompt: &'a str,
}

/// Shell words are re-joined with single spaces to form the raw invocation.
pub fn invocation_text(words: &[String]) -> String {
    words.join(" ")
}

pub fn execute(handle: &RegistryHandle, kind: Kind, words: &[String], json: bool) -> Result<()> {
    let raw = invocation_text(words);
    let registry = handle.snapshot();

    if json {
        let (definition, arguments) = registry.resolver().resolve(kind, &raw)?;
        let prompt = registry.renderer().render(&definition.body, arguments);
        return super::print_json(&RunOutput {
            kind,
            identifier: &definition.identifier,
            arguments,
            model_hint: definition.model_hint.as_deref(),
            prompt: &prompt,
        });
    }

    let prompt = registry.execute(kind, &raw)?;
    print!("{}", prompt);
    if !prompt.ends_with('\n') {
        println!();
    }
    Ok(())
}
