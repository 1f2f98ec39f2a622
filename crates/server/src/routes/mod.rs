// crates/server/src/routes/mod.rs
//! Route table.
//!
//! - GET /health       - status, version, uptime
//! - GET /config.js    - `window.<GLOBAL> = Object.freeze({...})`
//! - GET /config.json  - the same record as JSON
//!
//! Anything else answers 404 with a JSON error body.

pub mod artifact;
pub mod health;

use std::sync::Arc;

use axum::http::Uri;
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

/// Create the full route tree with state applied.
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(artifact::router())
        .fallback(not_found)
        .with_state(state)
}
