//! Vitrine Storefront library.
//!
//! The public catalog site: server-rendered with Askama, progressively
//! enhanced with HTMX, reading everything from the catalog API. The binary in
//! `main.rs` adds Sentry and the tracing subscriber around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::http::{HeaderValue, header};
use axum::response::Redirect;
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the storefront router.
pub fn app(state: AppState) -> Router {
    let static_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ))
        .service(ServeDir::new(STATIC_DIR));

    let router = Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", static_files)
        .fallback(fallback)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ));

    middleware::http_trace_layer(router).with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog API.
async fn health() -> &'static str {
    "ok"
}

/// Unknown paths go back to the catalog.
async fn fallback() -> Redirect {
    Redirect::to("/")
}
