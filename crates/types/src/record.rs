// crates/types/src/record.rs
//! The public configuration record.

use serde::{Deserialize, Serialize};

use crate::endpoint::ChatEndpoint;
use crate::model::ModelId;
use crate::provider::{AiProvider, ProviderSubtype};

/// Cloud Run deployment of the agent chat service.
pub const DEFAULT_CHAT_URL: &str =
    "https://my-agent-api-531513049365.us-central1.run.app/api/chat";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Wire keys, in the order they are published.
pub const FIELD_KEYS: [&str; 4] = ["AI_PROVIDER", "ADK_CHAT_URL", "ADK_PROVIDER", "ADK_MODEL"];

/// Flat set of public values the front-end reads from its global namespace.
///
/// Fields are private: once built, a record is only ever read. Unknown keys
/// are rejected on deserialization so a typo cannot silently ship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigRecord {
    #[serde(rename = "AI_PROVIDER")]
    ai_provider: AiProvider,
    #[serde(rename = "ADK_CHAT_URL")]
    chat_url: ChatEndpoint,
    #[serde(rename = "ADK_PROVIDER")]
    provider_subtype: ProviderSubtype,
    #[serde(rename = "ADK_MODEL")]
    model: ModelId,
}

impl ConfigRecord {
    pub fn new(
        ai_provider: AiProvider,
        chat_url: ChatEndpoint,
        provider_subtype: ProviderSubtype,
        model: ModelId,
    ) -> Self {
        Self {
            ai_provider,
            chat_url,
            provider_subtype,
            model,
        }
    }

    pub fn ai_provider(&self) -> AiProvider {
        self.ai_provider
    }

    pub fn chat_url(&self) -> &ChatEndpoint {
        &self.chat_url
    }

    pub fn provider_subtype(&self) -> ProviderSubtype {
        self.provider_subtype
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    /// `(key, value)` pairs in publication order.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (FIELD_KEYS[0], self.ai_provider.as_str()),
            (FIELD_KEYS[1], self.chat_url.as_str()),
            (FIELD_KEYS[2], self.provider_subtype.as_str()),
            (FIELD_KEYS[3], self.model.as_str()),
        ]
    }
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            ai_provider: AiProvider::default(),
            chat_url: ChatEndpoint::parse(DEFAULT_CHAT_URL).expect("default chat URL is valid"),
            provider_subtype: ProviderSubtype::default(),
            model: ModelId::parse(DEFAULT_MODEL).expect("default model id is valid"),
        }
    }
}
