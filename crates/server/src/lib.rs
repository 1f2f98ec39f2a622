// crates/server/src/lib.rs
//! HTTP surface and command-line entry points for `siteconf`.
//!
//! The server publishes the process-wide record as `config.js`/`config.json`
//! for a static site. Everything it serves is public.

pub mod cli;
pub mod error;
pub mod routes;
pub mod state;

pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

/// Create the Axum application with all routes and middleware.
///
/// CORS is open to any origin for reads and never allows credentials.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(siteconf_observability::trace_layer())
}
