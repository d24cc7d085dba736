//! Vitrine catalog API client.
//!
//! The catalog API owns every record Vitrine shows. This crate wraps it in a
//! single configured [`ApiClient`] whose endpoints are grouped by resource:
//!
//! ```rust,ignore
//! use vitrine_client::{ApiClient, PublicProductQuery};
//!
//! let client = ApiClient::new("http://localhost:3000")?;
//! let heroes = client.public().hero_images().await?;
//! let products = client
//!     .public()
//!     .products(&PublicProductQuery { limit: Some(12), ..Default::default() })
//!     .await?;
//! ```
//!
//! Each call issues exactly one request. There is no retry, caching, or
//! batching; callers refetch after every mutation.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod accounts;
mod catalog;
mod dashboard;
mod error;
mod public;
mod settings;
mod uploads;

use std::sync::Arc;

use reqwest::Method;
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

pub use accounts::{Admins, Auth};
pub use catalog::{Categories, ProductQuery, Products};
pub use dashboard::Dashboard;
pub use error::ApiError;
pub use public::{Public, PublicProductQuery};
pub use settings::Settings;
pub use uploads::{FileUpload, Uploads};

/// Client for the catalog API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: parsed.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    #[must_use]
    pub const fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    #[must_use]
    pub const fn categories(&self) -> Categories<'_> {
        Categories::new(self)
    }

    #[must_use]
    pub const fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    #[must_use]
    pub const fn uploads(&self) -> Uploads<'_> {
        Uploads::new(self)
    }

    #[must_use]
    pub const fn settings(&self) -> Settings<'_> {
        Settings::new(self)
    }

    #[must_use]
    pub const fn admins(&self) -> Admins<'_> {
        Admins::new(self)
    }

    #[must_use]
    pub const fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(self)
    }

    /// Endpoints that need no admin session.
    #[must_use]
    pub const fn public(&self) -> Public<'_> {
        Public::new(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    #[instrument(skip(self), fields(method = "GET"))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.http.get(self.url(path));
        self.execute(request).await
    }

    #[instrument(skip(self, query), fields(method = "GET"))]
    async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.inner.http.get(self.url(path)).query(query);
        self.execute(request).await
    }

    #[instrument(skip(self, method, body), fields(method = %method))]
    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.inner.http.request(method, self.url(path)).json(body);
        self.execute(request).await
    }

    #[instrument(skip(self), fields(method = "DELETE"))]
    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.inner.http.delete(self.url(path));
        self.send(request).await.map(|_| ())
    }

    #[instrument(skip(self, form), fields(method = "POST"))]
    async fn send_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let request = self.inner.http.post(self.url(path)).multipart(form);
        self.execute(request).await
    }

    /// Send a request and decode the JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(request).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body, 500),
                "Failed to parse catalog API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and return the raw body of a success response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            if status.is_server_error() {
                tracing::error!(
                    status = %status,
                    body = %truncate(&body, 500),
                    "Catalog API returned non-success status"
                );
            } else {
                tracing::warn!(
                    status = %status,
                    body = %truncate(&body, 500),
                    "Catalog API rejected request"
                );
            }
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error::server_message(&body),
            });
        }

        Ok(body)
    }
}

fn truncate(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:3000/").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/products"), "http://localhost:3000/products");
    }

    async fn spawn_api(router: axum::Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        let addr = listener.local_addr().unwrap_or_else(|e| panic!("{e}"));
        tokio::spawn(async move { axum::serve(listener, router).await });
        ApiClient::new(&format!("http://{addr}")).unwrap_or_else(|e| panic!("{e}"))
    }

    #[tokio::test]
    async fn test_server_error_carries_message() {
        use axum::http::StatusCode;
        use axum::routing::post;

        let router = axum::Router::new().route(
            "/auth/login",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(serde_json::json!({ "message": "Invalid credentials" })),
                )
            }),
        );
        let client = spawn_api(router).await;

        let err = client
            .auth()
            .login("owner@store.example", "wrong")
            .await
            .err()
            .unwrap_or_else(|| panic!("login should fail"));
        assert!(matches!(err, ApiError::Server { status: 401, .. }));
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_query_and_decode() {
        use axum::extract::Query;
        use axum::routing::get;

        let router = axum::Router::new().route(
            "/public/products",
            get(|Query(q): Query<std::collections::HashMap<String, String>>| async move {
                let name = format!("limit={}", q.get("limit").cloned().unwrap_or_default());
                axum::Json(serde_json::json!([{ "id": "p1", "name": name, "price": 4.5 }]))
            }),
        );
        let client = spawn_api(router).await;

        let products = client
            .public()
            .products(&PublicProductQuery {
                limit: Some(12),
                ..PublicProductQuery::default()
            })
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "limit=12");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_parse_error() {
        use axum::routing::get;

        let router = axum::Router::new().route("/public/whatsapp", get(|| async { "not json" }));
        let client = spawn_api(router).await;

        let result = client.public().whatsapp().await;
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let client = ApiClient::new("http://api.example/v1/").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(client.url("/categories"), "http://api.example/v1/categories");
    }
}
