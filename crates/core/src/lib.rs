// crates/core/src/lib.rs
pub mod artifact;
pub mod error;
pub mod loader;
pub mod scan;
pub mod store;

pub use artifact::{
    check_artifact, parse_js, parse_json, render, render_js, render_json, ArtifactFormat,
    CheckReport, GlobalName, ParsedArtifact, DEFAULT_GLOBAL_NAME,
};
pub use error::*;
pub use loader::{load_record, LoadOptions, ResolvedRecord, CONFIG_PATH_ENV, ENV_PREFIX};
pub use scan::{scan_record, scan_text, scan_value, SecretFinding, SecretRule};
pub use store::{global, ConfigStore, LoadState};

pub use siteconf_types as types;
