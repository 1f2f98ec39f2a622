// crates/core/src/error.rs
use std::fmt;
use std::path::PathBuf;

use siteconf_types::SchemaError;
use thiserror::Error;

use crate::scan::SecretFinding;

/// Where a record field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    Default,
    File(PathBuf),
    Env(String),
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSource::Default => f.write_str("built-in default"),
            FieldSource::File(path) => write!(f, "file {}", path.display()),
            FieldSource::Env(var) => write!(f, "env {var}"),
        }
    }
}

/// Wrapper so a list of findings can sit inside an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Findings(pub Vec<SecretFinding>);

impl fmt::Display for Findings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, finding) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{finding}")?;
        }
        Ok(())
    }
}

/// Errors that can occur while assembling a record from its sources
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("{key} from {origin}: {source}")]
    Field {
        key: &'static str,
        origin: FieldSource,
        #[source]
        source: SchemaError,
    },

    #[error("Refusing to load a record with secret-like content: {0}")]
    SecretContent(Findings),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors from binding a record into a [`crate::ConfigStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Configuration is already loaded")]
    AlreadyLoaded,

    #[error("Refusing to bind a record with secret-like content: {0}")]
    SecretContent(Findings),
}

/// Errors from rendering or parsing the published artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Invalid global name {0:?}: must be a JavaScript identifier")]
    InvalidGlobalName(String),

    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Artifact does not match the record schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("Refusing to publish secret-like content: {0}")]
    SecretContent(Findings),
}
