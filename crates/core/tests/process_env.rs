// crates/core/tests/process_env.rs
use std::io::Write;

use serial_test::serial;
use siteconf_core::types::{AiProvider, ProviderSubtype};
use siteconf_core::{load_record, FieldSource, LoadOptions, CONFIG_PATH_ENV};

const VARS: [&str; 5] = [
    "SITECONF_CONFIG",
    "SITECONF_AI_PROVIDER",
    "SITECONF_ADK_CHAT_URL",
    "SITECONF_ADK_PROVIDER",
    "SITECONF_ADK_MODEL",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn process_env_overrides_defaults() {
    clear_env();
    std::env::set_var("SITECONF_AI_PROVIDER", "vertex");
    std::env::set_var("SITECONF_ADK_PROVIDER", "gemini");
    std::env::set_var("UNRELATED_ADK_MODEL", "ignored");

    let opts = LoadOptions::from_process_env(None);
    assert!(opts.config_path.is_none());
    assert!(!opts.env.contains_key("UNRELATED_ADK_MODEL"));

    let resolved = load_record(&opts).unwrap();
    assert_eq!(resolved.record.ai_provider(), AiProvider::Vertex);
    assert_eq!(resolved.record.provider_subtype(), ProviderSubtype::Gemini);
    assert_eq!(resolved.record.model().as_str(), "gemini-2.5-flash");
    assert_eq!(
        resolved.sources[0].1,
        FieldSource::Env("SITECONF_AI_PROVIDER".into())
    );

    std::env::remove_var("UNRELATED_ADK_MODEL");
    clear_env();
}

#[test]
#[serial]
fn config_path_comes_from_env_unless_given() {
    clear_env();
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "ADK_MODEL = \"gemini-2.0-flash\"").unwrap();
    std::env::set_var(CONFIG_PATH_ENV, file.path());

    let opts = LoadOptions::from_process_env(None);
    assert_eq!(opts.config_path.as_deref(), Some(file.path()));
    let resolved = load_record(&opts).unwrap();
    assert_eq!(resolved.record.model().as_str(), "gemini-2.0-flash");

    let explicit = std::path::PathBuf::from("/elsewhere/site.toml");
    let opts = LoadOptions::from_process_env(Some(explicit.clone()));
    assert_eq!(opts.config_path, Some(explicit));

    clear_env();
}
