//! Vitrine Admin library.
//!
//! The catalog administration panel. Every read and write goes through the
//! catalog API; the panel itself only stores login sessions. The binary in
//! `main.rs` adds Sentry, the tracing subscriber, and TLS around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::extract::{DefaultBodyLimit, State};
use axum::response::Redirect;
use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Largest request body accepted, sized for a batch of product images.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Build the admin router around `session_layer`.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog API.
async fn health() -> &'static str {
    "ok"
}

/// Anything outside the panel goes to the storefront.
async fn fallback(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config().storefront_url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::AdminConfig;
    use crate::middleware::create_session_layer;

    /// A panel whose catalog API is unreachable.
    fn offline_app() -> Router {
        let config = AdminConfig::from_lookup(|key| match key {
            "CATALOG_API_URL" => Some("http://127.0.0.1:9".to_string()),
            "STOREFRONT_URL" => Some("https://shop.example".to_string()),
            _ => None,
        })
        .unwrap();
        let layer = create_session_layer(MemoryStore::default(), &config);
        app(AppState::new(config).unwrap(), layer)
    }

    async fn get(uri: &str) -> axum::response::Response {
        offline_app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_unknown_path_goes_to_storefront() {
        let response = get("/nowhere").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "https://shop.example");
    }

    #[tokio::test]
    async fn test_admin_root_redirects_to_dashboard() {
        let response = get("/admin").await;
        assert_eq!(response.headers()["location"], "/admin/dashboard");
    }

    #[tokio::test]
    async fn test_protected_page_without_session_redirects_to_login() {
        let response = get("/admin/products").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/admin/login");
    }

    #[tokio::test]
    async fn test_htmx_request_without_session_gets_hx_redirect() {
        let response = offline_app()
            .oneshot(
                Request::post("/admin/settings/hero-images/h1/toggle")
                    .header("hx-request", "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["hx-redirect"], "/admin/login");
    }

    #[tokio::test]
    async fn test_login_page_renders_with_security_headers() {
        let response = get("/admin/login").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(r#"action="/admin/login""#));
    }

    #[tokio::test]
    async fn test_invalid_login_is_rejected_without_request() {
        let response = offline_app()
            .oneshot(
                Request::post("/admin/login")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("email=not-an-email&password=x"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("set-cookie").is_none());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("notice-error"));
        assert!(html.contains(r#"value="not-an-email""#));
    }
}
