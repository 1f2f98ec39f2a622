// crates/types/src/model.rs
//! Model identifier passed through to the chat backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

const MAX_MODEL_LEN: usize = 128;

/// Model name/version, e.g. `gemini-2.5-flash` or
/// `publishers/google/models/gemini-2.5-pro`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, SchemaError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SchemaError::model(&raw, "must not be empty"));
        }
        if raw.len() > MAX_MODEL_LEN {
            return Err(SchemaError::model(
                &raw,
                format!("longer than {MAX_MODEL_LEN} characters"),
            ));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '/')))
        {
            return Err(SchemaError::model(&raw, format!("unexpected character {c:?}")));
        }
        if raw.starts_with('/') || raw.ends_with('/') || raw.contains("//") {
            return Err(SchemaError::model(&raw, "empty path segment"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModelId {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ModelId> for String {
    fn from(value: ModelId) -> Self {
        value.0
    }
}

impl FromStr for ModelId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
