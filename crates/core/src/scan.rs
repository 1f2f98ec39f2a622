// crates/core/src/scan.rs
//! Static scan for secret-like material.
//!
//! The record is published as public static content and nothing at runtime can
//! redact it, so every path that binds, renders or checks a record runs these
//! rules first and refuses on any finding.

use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde_json::Value;
use siteconf_types::{redact, ConfigRecord};

/// Minimum length of a token considered for the entropy rule.
const ENTROPY_MIN_LEN: usize = 32;
/// Bits per character at or above which a token looks random.
const ENTROPY_THRESHOLD: f64 = 4.0;

/// Normalised key fragments that name a credential.
const CREDENTIAL_KEY_FRAGMENTS: &[&str] = &[
    "apikey",
    "accesskey",
    "secret",
    "token",
    "password",
    "passwd",
    "credential",
    "privatekey",
    "bearer",
    "authorization",
];

/// Whole key segments that name a credential.
const CREDENTIAL_KEY_SEGMENTS: &[&str] = &["key", "auth", "pwd", "jwt"];

/// Known vendor credential shapes.
const KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("google-api-key", r"AIza[0-9A-Za-z_\-]{35}"),
    ("google-oauth-token", r"ya29\.[0-9A-Za-z_\-]{20,}"),
    ("openai-key", r"sk-[A-Za-z0-9_\-]{20,}"),
    ("github-token", r"gh[pousr]_[A-Za-z0-9]{36}"),
    ("github-pat", r"github_pat_[A-Za-z0-9_]{22,}"),
    ("huggingface-token", r"hf_[A-Za-z0-9]{30,}"),
    ("slack-token", r"xox[abprs]-[A-Za-z0-9\-]{10,}"),
    ("aws-access-key", r"AKIA[0-9A-Z]{16}"),
    ("private-key-block", r"-----BEGIN [A-Z ]*PRIVATE KEY-----"),
];

/// Which rule produced a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretRule {
    CredentialKey,
    KnownPrefix(&'static str),
    UrlCredentials,
    HighEntropy,
}

impl fmt::Display for SecretRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretRule::CredentialKey => f.write_str("credential-like key name"),
            SecretRule::KnownPrefix(kind) => write!(f, "known credential format ({kind})"),
            SecretRule::UrlCredentials => f.write_str("URL with embedded credentials"),
            SecretRule::HighEntropy => f.write_str("high-entropy token"),
        }
    }
}

/// A single match. `preview` is redacted and safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretFinding {
    pub location: String,
    pub rule: SecretRule,
    pub preview: String,
}

impl fmt::Display for SecretFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.location, self.rule, self.preview)
    }
}

fn known_prefix_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        KNOWN_PREFIXES
            .iter()
            .filter_map(|(kind, pattern)| Regex::new(pattern).ok().map(|re| (*kind, re)))
            .collect()
    })
}

fn url_credentials_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"[A-Za-z][A-Za-z0-9+.\-]*://[^/\s:@"'`]+:[^/\s@"'`]+@"#).ok())
        .as_ref()
}

fn token_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[A-Za-z0-9+/=_\-]{32,}").ok())
        .as_ref()
}

/// Shannon entropy in bits per character.
pub fn shannon_entropy(s: &str) -> f64 {
    let total = s.chars().count();
    if total == 0 {
        return 0.0;
    }
    let mut counts = std::collections::HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0usize) += 1;
    }
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

/// Two or more lowercase words between separators read as a path or slug
/// (`publishers/google/models/...`, `gemini-2-5-flash-preview`), not a key.
fn is_word_like(token: &str) -> bool {
    token
        .split(['/', '-', '_', '.', '+', '='])
        .filter(|seg| seg.len() >= 3 && seg.chars().all(|c| c.is_ascii_lowercase()))
        .count()
        >= 2
}

fn looks_random(token: &str) -> bool {
    token.len() >= ENTROPY_MIN_LEN
        && shannon_entropy(token) >= ENTROPY_THRESHOLD
        && !is_word_like(token)
}

/// True when a key name reads like it holds a credential.
pub fn is_credential_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    let squashed: String = lower.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if CREDENTIAL_KEY_FRAGMENTS.iter().any(|f| squashed.contains(f)) {
        return true;
    }
    lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|segment| CREDENTIAL_KEY_SEGMENTS.contains(&segment))
}

/// Apply the value rules to one piece of text.
pub fn scan_str(location: &str, text: &str) -> Vec<SecretFinding> {
    let mut spans: Vec<(SecretRule, Range<usize>)> = Vec::new();

    for (kind, re) in known_prefix_patterns() {
        spans.extend(re.find_iter(text).map(|m| (SecretRule::KnownPrefix(*kind), m.range())));
    }
    if let Some(re) = url_credentials_pattern() {
        spans.extend(re.find_iter(text).map(|m| (SecretRule::UrlCredentials, m.range())));
    }
    if let Some(re) = token_pattern() {
        for m in re.find_iter(text) {
            let span = m.range();
            let overlaps = spans
                .iter()
                .any(|(_, f)| f.start < span.end && span.start < f.end);
            if !overlaps && looks_random(m.as_str()) {
                spans.push((SecretRule::HighEntropy, span));
            }
        }
    }

    spans
        .into_iter()
        .map(|(rule, span)| SecretFinding {
            location: location.to_string(),
            rule,
            preview: redact(&text[span]),
        })
        .collect()
}

/// Walk a JSON value, checking key names and every string.
pub fn scan_value(value: &Value) -> Vec<SecretFinding> {
    let mut findings = Vec::new();
    walk(value, "$", &mut findings);
    findings
}

fn walk(value: &Value, path: &str, findings: &mut Vec<SecretFinding>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = format!("{path}.{key}");
                if is_credential_key(key) {
                    findings.push(SecretFinding {
                        location: child_path.clone(),
                        rule: SecretRule::CredentialKey,
                        preview: key.clone(),
                    });
                }
                walk(child, &child_path, findings);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(child, &format!("{path}[{i}]"), findings);
            }
        }
        Value::String(s) => findings.extend(scan_str(path, s)),
        _ => {}
    }
}

/// Scan a typed record through its published JSON shape.
pub fn scan_record(record: &ConfigRecord) -> Vec<SecretFinding> {
    let mut findings = Vec::new();
    for (key, value) in record.entries() {
        let location = format!("$.{key}");
        if is_credential_key(key) {
            findings.push(SecretFinding {
                location: location.clone(),
                rule: SecretRule::CredentialKey,
                preview: key.to_string(),
            });
        }
        findings.extend(scan_str(&location, value));
    }
    findings
}

/// Scan the raw text of a published file, line by line.
///
/// Comments ship with the file too, so this looks at every line rather than
/// only at parsed values.
pub fn scan_text(text: &str) -> Vec<SecretFinding> {
    text.lines()
        .enumerate()
        .flat_map(|(i, line)| scan_str(&format!("line {}", i + 1), line))
        .collect()
}
