//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers that cannot degrade to an empty
//! section return `Result<T, AppError>`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use vitrine_client::ApiError;

use crate::filters;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog API request failed.
    #[error("Catalog API error: {0}")]
    Api(#[from] ApiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Page shown for a missing product or any other unknown record.
#[derive(Template, WebTemplate)]
#[template(path = "errors/not_found.html")]
pub struct NotFoundTemplate {
    pub message: String,
}

impl AppError {
    /// Map a catalog API error, treating a 404 as a missing `what`.
    #[must_use]
    pub fn from_api(err: ApiError, what: &str) -> Self {
        if err.is_not_found() {
            Self::NotFound(what.to_string())
        } else {
            Self::Api(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Api(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                NotFoundTemplate {
                    message: format!("{what} not found"),
                },
            )
                .into_response(),
            // Don't expose internal error details to clients
            Self::Api(_) => {
                (StatusCode::BAD_GATEWAY, "External service error").into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = AppError::NotFound("Product".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let upstream = AppError::Api(ApiError::Server {
            status: 500,
            message: None,
        })
        .into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_from_api_maps_404() {
        let err = AppError::from_api(
            ApiError::Server {
                status: 404,
                message: None,
            },
            "Product",
        );
        assert!(matches!(err, AppError::NotFound(what) if what == "Product"));

        let err = AppError::from_api(
            ApiError::Server {
                status: 503,
                message: None,
            },
            "Product",
        );
        assert!(matches!(err, AppError::Api(_)));
    }
}
