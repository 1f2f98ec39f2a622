// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use siteconf_core::{render_js, render_json, ArtifactError, GlobalName};
use siteconf_types::ConfigRecord;

/// Shared application state accessible from all route handlers.
///
/// Both artifact bodies are rendered once here; handlers only clone them.
#[derive(Debug)]
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    pub config_js: String,
    pub config_json: String,
}

impl AppState {
    /// Render the artifacts for `record` and wrap the state for sharing.
    pub fn new(record: &ConfigRecord, global_name: &GlobalName) -> Result<Arc<Self>, ArtifactError> {
        let config_js = render_js(record, global_name)?;
        let config_json = render_json(record)?;
        Ok(Arc::new(Self {
            start_time: Instant::now(),
            config_js,
            config_json,
        }))
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
