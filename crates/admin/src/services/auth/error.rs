//! Admin authentication error types.

use thiserror::Error;
use vitrine_client::ApiError;
use vitrine_core::guard::GuardViolation;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// The form failed validation; nothing was sent.
    #[error("{0}")]
    Invalid(#[from] GuardViolation),

    /// The catalog API refused the credentials or the registration.
    #[error("catalog API error: {0}")]
    Api(#[from] ApiError),

    /// The session could not be written.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AdminAuthError {
    /// Message shown on the login or register form.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Invalid(violation) => violation.to_string(),
            Self::Api(err) => err.user_message(fallback),
            Self::Session(_) => fallback.to_string(),
        }
    }
}
