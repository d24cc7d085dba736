use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("catalog API returned {status}{}", format_message(.message.as_deref()))]
    Server {
        status: u16,
        /// The body's `message` field, when present.
        message: Option<String>,
    },

    /// The response body did not decode.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL is not a valid URL.
    #[error("invalid catalog API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// The message to show a user: the server-supplied message when there is
    /// one, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Returns `true` for a 404 response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }

    /// Returns `true` when the API could not be reached or answered garbage,
    /// as opposed to rejecting the request.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse(_) | Self::InvalidUrl(_) => true,
            Self::Server { status, .. } => *status >= 500,
        }
    }
}

fn format_message(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

/// Extract `message` from an error body.
///
/// Validation errors carry a list of messages; those are joined.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(message) => Some(message.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(serde_json::Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_string() {
        assert_eq!(
            server_message(r#"{"statusCode":409,"message":"Email already registered"}"#).as_deref(),
            Some("Email already registered")
        );
    }

    #[test]
    fn test_server_message_array() {
        assert_eq!(
            server_message(r#"{"message":["name should not be empty","price must be a number"]}"#)
                .as_deref(),
            Some("name should not be empty, price must be a number")
        );
    }

    #[test]
    fn test_server_message_absent() {
        assert!(server_message("Bad Gateway").is_none());
        assert!(server_message(r#"{"error":"x"}"#).is_none());
        assert!(server_message(r#"{"message":42}"#).is_none());
    }

    #[test]
    fn test_user_message_fallback() {
        let with_message = ApiError::Server {
            status: 400,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(with_message.user_message("Login failed"), "Invalid credentials");

        let without = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(without.user_message("Login failed"), "Login failed");
        assert!(without.is_unavailable());
    }

    #[test]
    fn test_is_not_found() {
        let err = ApiError::Server {
            status: 404,
            message: None,
        };
        assert!(err.is_not_found());
        assert!(!err.is_unavailable());
    }
}
