//! Authentication extractors for admin.
//!
//! The session is restored once per request by `SessionManagerLayer`; these
//! extractors only read it, so a handler never renders before the admin's
//! identity is known.

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, SessionState, session_keys};

/// Login page path.
pub const LOGIN_PATH: &str = "/admin/login";

/// Extractor that requires admin authentication.
///
/// If the admin is not logged in, returns a redirect to the login page,
/// or a 401 carrying `HX-Redirect` for HTMX requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but the user is not logged in.
#[derive(Debug, PartialEq, Eq)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Client-side redirect for HTMX fragment requests.
    HxRedirectToLogin,
}

impl AdminAuthRejection {
    fn for_request(parts: &Parts) -> Self {
        if parts.headers.contains_key("hx-request") {
            Self::HxRedirectToLogin
        } else {
            Self::RedirectToLogin
        }
    }
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::HxRedirectToLogin => (
                StatusCode::UNAUTHORIZED,
                [("hx-redirect", HeaderValue::from_static(LOGIN_PATH))],
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(AdminAuthRejection::for_request(parts));
        };

        match SessionState::load(session).await {
            SessionState::Authenticated(admin) => Ok(Self(admin)),
            SessionState::Anonymous => Err(AdminAuthRejection::for_request(parts)),
        }
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdminAuth`, this does not reject the request if the admin is not logged in.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => SessionState::load(session).await.into_current(),
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Helper to set the current admin in the session.
///
/// The session id is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(uri: &str, htmx: bool) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_missing_session_layer_rejects() {
        let mut p = parts("/admin/dashboard", false);
        let result = RequireAdminAuth::from_request_parts(&mut p, &()).await;
        assert!(matches!(result, Err(AdminAuthRejection::RedirectToLogin)));
    }

    #[test]
    fn test_rejection_kind_follows_request() {
        assert_eq!(
            AdminAuthRejection::for_request(&parts("/admin/products", false)),
            AdminAuthRejection::RedirectToLogin
        );
        assert_eq!(
            AdminAuthRejection::for_request(&parts("/admin/settings", true)),
            AdminAuthRejection::HxRedirectToLogin
        );
    }

    #[test]
    fn test_rejection_responses() {
        let redirect = AdminAuthRejection::RedirectToLogin.into_response();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        assert_eq!(redirect.headers()["location"], LOGIN_PATH);

        let hx = AdminAuthRejection::HxRedirectToLogin.into_response();
        assert_eq!(hx.headers()["hx-redirect"], LOGIN_PATH);
    }
}
