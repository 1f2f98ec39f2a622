// crates/types/src/error.rs
use thiserror::Error;

/// Log-safe stand-in for a rejected value: its first four characters and its
/// length. Values of four characters or fewer are shown as they are.
pub fn redact(raw: &str) -> String {
    let total = raw.chars().count();
    let head: String = raw.chars().take(4).collect();
    if total <= 4 {
        head
    } else {
        format!("{head}... ({total} chars)")
    }
}

/// Errors raised when a raw value does not fit the record schema.
///
/// Messages never echo a rejected value verbatim. Variants carry the
/// [`redact`]ed form, so a credential pasted into the wrong field cannot end
/// up in a log line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Unknown AI provider: {0:?} (expected one of: adk, vertex)")]
    UnknownProvider(String),

    #[error("Unknown provider sub-type: {0:?} (expected one of: vertex, gemini)")]
    UnknownSubtype(String),

    #[error("Invalid chat endpoint: {reason}")]
    InvalidEndpoint { reason: String },

    #[error("Invalid model identifier {model:?}: {reason}")]
    InvalidModel { model: String, reason: String },
}

impl SchemaError {
    pub fn unknown_provider(raw: &str) -> Self {
        Self::UnknownProvider(redact(raw))
    }

    pub fn unknown_subtype(raw: &str) -> Self {
        Self::UnknownSubtype(redact(raw))
    }

    pub fn endpoint(reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            reason: reason.into(),
        }
    }

    pub fn model(model: &str, reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            model: redact(model),
            reason: reason.into(),
        }
    }
}
