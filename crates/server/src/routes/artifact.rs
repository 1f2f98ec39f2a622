// crates/server/src/routes/artifact.rs
//! The published config artifacts. Bodies come pre-rendered from [`AppState`].

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};
use siteconf_core::ArtifactFormat;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;

pub const CACHE_POLICY: &str = "public, max-age=300";

/// GET /config.js
pub async fn config_js(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, ArtifactFormat::Js.content_type())],
        state.config_js.clone(),
    )
}

/// GET /config.json
pub async fn config_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, ArtifactFormat::Json.content_type())],
        state.config_json.clone(),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/config.js", get(config_js))
        .route("/config.json", get(config_json))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_POLICY),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}
