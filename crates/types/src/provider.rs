// crates/types/src/provider.rs
//! Enumerated provider selector and sub-type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Which backend integration path the front-end should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// Self-hosted / Cloud Run agent chat service.
    #[default]
    Adk,
    /// Vertex AI generate proxy.
    Vertex,
}

impl AiProvider {
    pub const ALL: [AiProvider; 2] = [AiProvider::Adk, AiProvider::Vertex];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::Adk => "adk",
            AiProvider::Vertex => "vertex",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SchemaError::unknown_provider(s))
    }
}

/// Backend implementation reachable through the chat endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSubtype {
    /// Vertex AI (GCP project credentials on the server side).
    #[default]
    Vertex,
    /// Gemini API (AI Studio).
    Gemini,
}

impl ProviderSubtype {
    pub const ALL: [ProviderSubtype; 2] = [ProviderSubtype::Vertex, ProviderSubtype::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderSubtype::Vertex => "vertex",
            ProviderSubtype::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderSubtype {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SchemaError::unknown_subtype(s))
    }
}
