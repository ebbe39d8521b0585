//! Definition types and front-matter parsing for command and agent sources.
//!
//! A definition source is a Markdown document with a YAML front-matter block:
//!
//! ```markdown
//! ---
//! description: Scaffold a new API endpoint
//! model: sonnet
//! ---
//!
//! Create an endpoint for: $ARGUMENTS
//! ```
//!
//! Agents additionally declare `name` (which must equal the file name) and may declare `color`.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The two kinds of invokable definitions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Command,
    Agent,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Command, Kind::Agent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Command => "command",
            Kind::Agent => "agent",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed, validated command or agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub identifier: String,
    pub kind: Kind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Source path relative to the plugin root, always `/`-separated.
    pub source: String,
    pub body: String,
}

/// Front-matter accepted in `commands/**/*.md`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandFrontMatter {
    pub description: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default, rename = "argument-hint", alias = "argument_hint")]
    pub argument_hint: Option<String>,
}

/// Front-matter accepted in `agents/**/*.md`.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentFrontMatter {
    pub name: String,
    pub description: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub color: Option<String>,
}

/// Check that an identifier is non-empty and uses only `[a-z0-9-]`.
pub fn validate_identifier(identifier: &str) -> Result<()> {
    let valid = !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidIdentifier(identifier.to_string()))
    }
}

/// Split a document into its raw YAML front-matter and body.
///
/// The first line must be `---`; the block ends at the next line consisting of `---`.
/// Leading blank lines of the body are dropped, the rest is kept verbatim.
pub fn split_front_matter<'a>(content: &'a str, path: &Path) -> Result<(&'a str, &'a str)> {
    let missing = || RegistryError::MissingFrontMatter {
        path: path.to_path_buf(),
    };

    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))
        .ok_or_else(missing)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\r', '\n']);
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(missing())
}

/// Parse a command source. The identifier is the file stem.
pub fn parse_command(content: &str, source: &SourceFile) -> Result<Definition> {
    let (yaml, body) = split_front_matter(content, &source.path)?;
    let front: CommandFrontMatter = parse_yaml(yaml, &source.path)?;

    validate_identifier(&source.stem)?;
    require_description(&front.description, &source.path)?;

    Ok(Definition {
        identifier: source.stem.clone(),
        kind: Kind::Command,
        description: front.description.trim().to_string(),
        model_hint: non_empty(front.model),
        color_hint: None,
        argument_hint: non_empty(front.argument_hint),
        category: source.category.clone(),
        source: source.relative.clone(),
        body: body.to_string(),
    })
}

/// Parse an agent source. The declared `name` must equal the file stem.
pub fn parse_agent(content: &str, source: &SourceFile) -> Result<Definition> {
    let (yaml, body) = split_front_matter(content, &source.path)?;
    let front: AgentFrontMatter = parse_yaml(yaml, &source.path)?;

    let declared = front.name.trim();
    if declared != source.stem {
        return Err(RegistryError::IdentifierMismatch {
            path: source.path.clone(),
            declared: declared.to_string(),
            expected: source.stem.clone(),
        });
    }
    validate_identifier(declared)?;
    require_description(&front.description, &source.path)?;

    Ok(Definition {
        identifier: declared.to_string(),
        kind: Kind::Agent,
        description: front.description.trim().to_string(),
        model_hint: non_empty(front.model),
        color_hint: non_empty(front.color),
        argument_hint: None,
        category: source.category.clone(),
        source: source.relative.clone(),
        body: body.to_string(),
    })
}

/// Location facts about a source file, derived before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute (or caller-relative) path used for reading and error messages.
    pub path: PathBuf,
    /// Path relative to the plugin root, `/`-separated.
    pub relative: String,
    /// File name without the `.md` extension.
    pub stem: String,
    /// Directories between the kind subtree and the file, joined with `/`.
    pub category: Option<String>,
}

impl SourceFile {
    /// Describe `path`, found under `subtree`, for a plugin rooted at `root`.
    pub fn new(root: &Path, subtree: &Path, path: &Path) -> Result<Self> {
        let invalid = |reason: &str| RegistryError::InvalidDefinition {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| invalid("file name is not valid UTF-8"))?
            .to_string();

        let relative = path
            .strip_prefix(root)
            .map_err(|_| invalid("file is outside the plugin root"))?;

        let category = path
            .parent()
            .and_then(|parent| parent.strip_prefix(subtree).ok())
            .map(join_components)
            .filter(|c| !c.is_empty());

        Ok(Self {
            path: path.to_path_buf(),
            relative: join_components(relative),
            stem,
            category,
        })
    }
}

/// Join path components with `/` regardless of platform.
pub fn join_components(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn parse_yaml<T: serde::de::DeserializeOwned>(yaml: &str, path: &Path) -> Result<T> {
    serde_yaml::from_str(yaml).map_err(|source| RegistryError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })
}

fn require_description(description: &str, path: &Path) -> Result<()> {
    if description.trim().is_empty() {
        return Err(RegistryError::InvalidDefinition {
            path: path.to_path_buf(),
            reason: "description cannot be empty".to_string(),
        });
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
