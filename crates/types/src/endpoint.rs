// crates/types/src/endpoint.rs
//! Public chat endpoint URL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::error::SchemaError;

/// Query parameter names that would smuggle a credential into a public URL.
const CREDENTIAL_QUERY_KEYS: &[&str] = &[
    "key",
    "api_key",
    "apikey",
    "token",
    "access_token",
    "id_token",
    "secret",
    "password",
    "sig",
    "signature",
];

/// Absolute, credential-free URL of the chat service.
///
/// The original string is kept as written so that reads return exactly what
/// was authored. `Url` normalises (a bare host gains a trailing slash), so it
/// is only used for validation and component access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChatEndpoint {
    raw: String,
    url: Url,
}

impl ChatEndpoint {
    pub fn parse(raw: impl Into<String>) -> Result<Self, SchemaError> {
        let raw = raw.into();
        let url = validate(&raw)?;
        Ok(Self { raw, url })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

fn validate(raw: &str) -> Result<Url, SchemaError> {
    if raw.trim() != raw {
        return Err(SchemaError::endpoint("surrounding whitespace"));
    }
    let url = Url::parse(raw).map_err(|e| SchemaError::endpoint(format!("not an absolute URL ({e})")))?;

    let host = url
        .host()
        .ok_or_else(|| SchemaError::endpoint("missing host"))?;
    let loopback = match host {
        Host::Domain(d) => d.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(ip) => ip.is_loopback(),
        Host::Ipv6(ip) => ip.is_loopback(),
    };
    match url.scheme() {
        "https" => {}
        "http" if loopback => {}
        "http" => return Err(SchemaError::endpoint("plain http is only allowed for loopback hosts")),
        other => return Err(SchemaError::endpoint(format!("unsupported scheme {other:?}"))),
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(SchemaError::endpoint("embedded credentials are not allowed"));
    }
    for (name, _) in url.query_pairs() {
        let lower = name.to_ascii_lowercase();
        if CREDENTIAL_QUERY_KEYS.contains(&lower.as_str()) {
            return Err(SchemaError::endpoint(format!(
                "credential-like query parameter {name:?}"
            )));
        }
    }
    Ok(url)
}

impl TryFrom<String> for ChatEndpoint {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ChatEndpoint> for String {
    fn from(value: ChatEndpoint) -> Self {
        value.raw
    }
}

impl FromStr for ChatEndpoint {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChatEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
