// crates/core/src/loader.rs
//! Assemble a [`ConfigRecord`] from its sources.
//!
//! Precedence, lowest first: built-in defaults, TOML file, `SITECONF_*`
//! environment overrides. A field missing from every source falls back to its
//! default; a field present with a bad value fails the whole load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use siteconf_types::{ConfigRecord, SchemaError, FIELD_KEYS};
use tracing::{debug, warn};

use crate::error::{FieldSource, Findings, LoadError};
use crate::scan::scan_record;

/// Prefix of every environment variable the loader reads.
pub const ENV_PREFIX: &str = "SITECONF_";

/// Environment variable naming the TOML file when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "SITECONF_CONFIG";

/// On-disk shape. Same keys as the published record, all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(rename = "AI_PROVIDER")]
    ai_provider: Option<String>,
    #[serde(rename = "ADK_CHAT_URL")]
    chat_url: Option<String>,
    #[serde(rename = "ADK_PROVIDER")]
    provider_subtype: Option<String>,
    #[serde(rename = "ADK_MODEL")]
    model: Option<String>,
}

/// Inputs to [`load_record`]. `env` is injected so tests never touch the
/// process environment.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub env: HashMap<String, String>,
}

impl LoadOptions {
    /// Snapshot the `SITECONF_*` variables of the current process. An explicit
    /// `config_path` wins over `SITECONF_CONFIG`.
    pub fn from_process_env(config_path: Option<PathBuf>) -> Self {
        let env: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        let config_path = config_path.or_else(|| {
            env.get(CONFIG_PATH_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        });
        Self { config_path, env }
    }

    fn env_override(&self, key: &str) -> Option<(String, String)> {
        let var = format!("{ENV_PREFIX}{key}");
        let value = self.env.get(&var)?.trim();
        if value.is_empty() {
            return None;
        }
        Some((var, value.to_string()))
    }
}

/// A loaded record plus where each field came from.
#[derive(Debug, Clone)]
pub struct ResolvedRecord {
    pub record: ConfigRecord,
    pub sources: [(&'static str, FieldSource); 4],
}

fn read_file(path: &Path) -> Result<ConfigFile, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    // `message()` only: the full Display quotes the offending source line,
    // which may be the very value we refuse to publish.
    toml::from_str(&text).map_err(|e| LoadError::Malformed {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

fn resolve<T>(
    key: &'static str,
    file_value: Option<String>,
    opts: &LoadOptions,
    default: T,
) -> Result<(T, FieldSource), LoadError>
where
    T: FromStr<Err = SchemaError>,
{
    let (raw, origin) = if let Some((var, value)) = opts.env_override(key) {
        (value, FieldSource::Env(var))
    } else if let (Some(value), Some(path)) = (file_value, opts.config_path.as_ref()) {
        (value, FieldSource::File(path.clone()))
    } else {
        if let Some(path) = &opts.config_path {
            warn!(key, path = %path.display(), "field missing from config file, using default");
        }
        return Ok((default, FieldSource::Default));
    };

    debug!(key, origin = %origin, "resolved config field");
    raw.parse::<T>()
        .map(|value| (value, origin.clone()))
        .map_err(|source| LoadError::Field {
            key,
            origin,
            source,
        })
}

/// Build, validate and scan a record. Nothing partially valid is returned.
pub fn load_record(opts: &LoadOptions) -> Result<ResolvedRecord, LoadError> {
    let file = match &opts.config_path {
        Some(path) => read_file(path)?,
        None => ConfigFile::default(),
    };
    let defaults = ConfigRecord::default();
    let [k_provider, k_url, k_subtype, k_model] = FIELD_KEYS;

    let (ai_provider, s_provider) =
        resolve(k_provider, file.ai_provider, opts, defaults.ai_provider())?;
    let (chat_url, s_url) = resolve(k_url, file.chat_url, opts, defaults.chat_url().clone())?;
    let (provider_subtype, s_subtype) = resolve(
        k_subtype,
        file.provider_subtype,
        opts,
        defaults.provider_subtype(),
    )?;
    let (model, s_model) = resolve(k_model, file.model, opts, defaults.model().clone())?;

    let record = ConfigRecord::new(ai_provider, chat_url, provider_subtype, model);
    let findings = scan_record(&record);
    if !findings.is_empty() {
        return Err(LoadError::SecretContent(Findings(findings)));
    }

    Ok(ResolvedRecord {
        record,
        sources: [
            (k_provider, s_provider),
            (k_url, s_url),
            (k_subtype, s_subtype),
            (k_model, s_model),
        ],
    })
}
