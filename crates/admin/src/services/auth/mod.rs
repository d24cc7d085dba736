//! Admin authentication service.
//!
//! Credentials are checked by the catalog API. On success the returned
//! admin is written to the session under a fixed key; logging out removes
//! it. Input is validated locally first so a malformed form never reaches
//! the API.

mod error;

pub use error::AdminAuthError;

use tower_sessions::Session;
use tracing::instrument;
use vitrine_client::ApiClient;
use vitrine_core::guard;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    api: &'a ApiClient,
    session: &'a Session,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, session: &'a Session) -> Self {
        Self { api, session }
    }

    /// Log in and store the admin in the session.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Invalid` for malformed input (no request is
    /// sent), `AdminAuthError::Api` if the API rejects the credentials, or
    /// `AdminAuthError::Session` if the session cannot be written.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentAdmin, AdminAuthError> {
        let email = guard::validate_login(email, password)?;
        let admin = self.api.auth().login(email.as_str(), password).await?;
        self.establish(admin.into()).await
    }

    /// Register a new admin and log them in.
    ///
    /// # Errors
    ///
    /// Same as [`Self::login`].
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<CurrentAdmin, AdminAuthError> {
        let email = guard::validate_registration(name, email, password)?;
        let admin = self
            .api
            .auth()
            .register(name.trim(), email.as_str(), password)
            .await?;
        self.establish(admin.into()).await
    }

    /// Remove the admin from the session.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Session` if the session cannot be modified.
    pub async fn logout(&self) -> Result<(), AdminAuthError> {
        clear_current_admin(self.session).await?;
        clear_sentry_user();
        Ok(())
    }

    async fn establish(&self, admin: CurrentAdmin) -> Result<CurrentAdmin, AdminAuthError> {
        set_current_admin(self.session, &admin).await?;
        set_sentry_user(&admin.id, &admin.email);
        tracing::info!(admin_id = %admin.id, "Admin logged in");
        Ok(admin)
    }
}
