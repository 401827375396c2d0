use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, HubError>;

/// Error type covering the failures that can occur while loading the catalog,
/// persisting progress, or generating the tools manifest.
#[derive(Debug, Error)]
pub enum HubError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when README front matter is not valid YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Transport-level failures from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Raised when one of the catalog documents cannot be fetched.
    #[error("failed to load {resource}: {reason}")]
    DataLoad { resource: String, reason: String },

    /// Raised when a progress action names a slug that is not in the catalog.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Raised when a progress level given on the command line is out of range.
    #[error("invalid progress level '{0}' (expected all, 0, 1, 2 or 3)")]
    InvalidProgressLevel(String),

    /// Raised when an unsupported language code is requested.
    #[error("invalid language '{0}' (expected ja or en)")]
    InvalidLanguage(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
