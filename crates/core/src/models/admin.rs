//! Admin account record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AdminId, Email};

/// An admin account as returned by the auth and admins endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    pub email: Email,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub name: String,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub last_login: Option<DateTime<Utc>>,
}

impl Admin {
    /// Name to show in the UI, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.email.as_str()
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_admin() {
        let json = r#"{"id":"a1","email":"owner@store.example"}"#;
        let admin: Admin = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(admin.id.as_str(), "a1");
        assert_eq!(admin.display_name(), "owner@store.example");
        assert!(admin.last_login.is_none());
    }

    #[test]
    fn test_deserialize_timestamps() {
        let json = r#"{
            "id": "a1",
            "email": "owner@store.example",
            "name": "Owner",
            "createdAt": "2024-03-01T10:00:00Z",
            "lastLogin": "not a date"
        }"#;
        let admin: Admin = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(admin.display_name(), "Owner");
        assert!(admin.created_at.is_some());
        assert!(admin.last_login.is_none());
    }
}
