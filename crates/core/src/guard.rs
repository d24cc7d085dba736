//! Checks that run before any request is sent to the catalog API.
//!
//! A violation is shown to the admin straight away as a blocking notice and
//! no request is issued.

use crate::types::{AdminId, Email};

/// Minimum password length accepted by the registration form.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A local rule the submitted action breaks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardViolation {
    #[error("You cannot delete your own account!")]
    SelfDeletion,

    #[error("Please select a category")]
    MissingCategory,

    /// A form field failed validation.
    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

impl GuardViolation {
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}

/// Reject deleting the admin who is logged in, matched by id or email.
///
/// # Errors
///
/// Returns [`GuardViolation::SelfDeletion`] when the target is the current
/// admin.
pub fn ensure_not_self(
    current_id: &AdminId,
    current_email: &Email,
    target_id: &AdminId,
    target_email: Option<&Email>,
) -> Result<(), GuardViolation> {
    let same_email = target_email
        .is_some_and(|email| email.as_str().eq_ignore_ascii_case(current_email.as_str()));
    if current_id == target_id || same_email {
        return Err(GuardViolation::SelfDeletion);
    }
    Ok(())
}

/// Validate login input.
///
/// # Errors
///
/// Returns [`GuardViolation::InvalidField`] for a malformed email or an
/// empty password.
pub fn validate_login(email: &str, password: &str) -> Result<Email, GuardViolation> {
    let email = Email::parse(email).map_err(|e| GuardViolation::invalid("email", e.to_string()))?;
    if password.is_empty() {
        return Err(GuardViolation::invalid("password", "password is required"));
    }
    Ok(email)
}

/// Validate registration input.
///
/// # Errors
///
/// Returns [`GuardViolation::InvalidField`] for an empty name, a malformed
/// email, or a password shorter than [`MIN_PASSWORD_LENGTH`].
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
) -> Result<Email, GuardViolation> {
    if name.trim().is_empty() {
        return Err(GuardViolation::invalid("name", "name is required"));
    }
    let email = Email::parse(email).map_err(|e| GuardViolation::invalid("email", e.to_string()))?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(GuardViolation::invalid(
            "password",
            format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    Ok(email)
}
