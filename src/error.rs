use crate::definition::Kind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Duplicate {kind} identifier '{identifier}' ({} and {})", first.display(), second.display())]
    DuplicateIdentifier {
        kind: Kind,
        identifier: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Unknown {kind}: '{identifier}'")]
    NotFound { kind: Kind, identifier: String },

    #[error("Template in {} contains the placeholder '{placeholder}' {count} times (at most one allowed)", path.display())]
    MalformedTemplate {
        path: PathBuf,
        placeholder: String,
        count: usize,
    },

    #[error("Empty invocation: expected '/<name> [arguments]'")]
    EmptyInvocation,

    #[error("Invalid identifier '{0}': only lowercase letters, digits and hyphens are allowed")]
    InvalidIdentifier(String),

    #[error("Agent name '{declared}' does not match file name '{expected}' in {}", path.display())]
    IdentifierMismatch {
        path: PathBuf,
        declared: String,
        expected: String,
    },

    #[error("Manifest lists {kind} '{identifier}' at {source_path} but no matching definition was found")]
    MissingDefinition {
        kind: Kind,
        identifier: String,
        source_path: String,
    },

    #[error("{kind} '{identifier}' ({}) is not listed in the manifest", path.display())]
    UnregisteredDefinition {
        kind: Kind,
        identifier: String,
        path: PathBuf,
    },

    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing front-matter block ('---') in {}", path.display())]
    MissingFrontMatter { path: PathBuf },

    #[error("Invalid front-matter in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid definition {}: {reason}", path.display())]
    InvalidDefinition { path: PathBuf, reason: String },

    #[error("Failed to parse manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No plugin manifest found in {} or any parent directory", .0.display())]
    PluginRootNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl RegistryError {
    /// True for failures caused by the user's invocation rather than the plugin tree.
    pub fn is_invocation_error(&self) -> bool {
        matches!(
            self,
            RegistryError::NotFound { .. }
                | RegistryError::EmptyInvocation
                | RegistryError::InvalidIdentifier(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
