//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use vitrine_core::models::Admin;
use vitrine_core::{AdminId, Email};

/// Session-stored admin identity.
///
/// The admin record returned by the catalog API at login or registration,
/// minus the timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's catalog API ID.
    pub id: AdminId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
}

impl From<Admin> for CurrentAdmin {
    fn from(admin: Admin) -> Self {
        Self {
            name: admin.display_name().to_string(),
            id: admin.id,
            email: admin.email,
        }
    }
}

/// Authentication state of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(CurrentAdmin),
}

impl SessionState {
    /// Restore the state from the session store.
    ///
    /// Missing or unreadable data is anonymous; nothing is sent to the
    /// catalog API.
    pub async fn load(session: &Session) -> Self {
        match session.get::<CurrentAdmin>(keys::CURRENT_ADMIN).await {
            Ok(Some(admin)) => Self::Authenticated(admin),
            Ok(None) => Self::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read admin session");
                Self::Anonymous
            }
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<&CurrentAdmin> {
        match self {
            Self::Authenticated(admin) => Some(admin),
            Self::Anonymous => None,
        }
    }

    #[must_use]
    pub fn into_current(self) -> Option<CurrentAdmin> {
        match self {
            Self::Authenticated(admin) => Some(admin),
            Self::Anonymous => None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "admin";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminId::new("a1"),
            email: Email::parse("owner@store.example").unwrap(),
            name: "Owner".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_session_is_anonymous() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let state = SessionState::load(&session).await;
        assert_eq!(state, SessionState::Anonymous);
        assert!(state.current().is_none());
    }

    #[tokio::test]
    async fn test_stored_admin_is_authenticated() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session.insert(keys::CURRENT_ADMIN, admin()).await.unwrap();

        let state = SessionState::load(&session).await;
        assert!(state.is_authenticated());
        assert_eq!(state.into_current(), Some(admin()));
    }

    #[test]
    fn test_from_admin_falls_back_to_email_for_name() {
        let admin: Admin =
            serde_json::from_str(r#"{"id":"a2","email":"staff@store.example","name":""}"#).unwrap();
        let current = CurrentAdmin::from(admin);
        assert_eq!(current.name, "staff@store.example");
        assert_eq!(current.id.as_str(), "a2");
    }
}
