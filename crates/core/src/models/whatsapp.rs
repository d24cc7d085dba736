//! WhatsApp contact settings.

use serde::{Deserialize, Serialize};

/// Country code used until the admin picks one.
pub const DEFAULT_COUNTRY_CODE: &str = "+961";

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

super::null_or!(null_or_country_code: String = default_country_code);

/// The singleton WhatsApp contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppSettings {
    #[serde(default = "default_country_code", deserialize_with = "null_or_country_code")]
    pub country_code: String,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub phone_number: String,
}

impl Default for WhatsAppSettings {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            phone_number: String::new(),
        }
    }
}

impl WhatsAppSettings {
    /// Digits of country code and phone number, as wa.me expects them.
    ///
    /// Returns `None` when no phone number is configured.
    #[must_use]
    pub fn contact_number(&self) -> Option<String> {
        let phone = sanitize_phone(&self.phone_number);
        if phone.is_empty() {
            return None;
        }
        Some(format!("{}{phone}", sanitize_phone(&self.country_code)))
    }

    /// `https://wa.me/{digits}?text={message}` chat link.
    #[must_use]
    pub fn chat_link(&self, message: &str) -> Option<String> {
        self.contact_number().map(|number| {
            format!(
                "https://wa.me/{number}?text={}",
                urlencoding::encode(message)
            )
        })
    }
}

/// Body for saving the WhatsApp settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppInput {
    pub country_code: String,
    pub phone_number: String,
    pub updated_by: String,
}

impl WhatsAppInput {
    /// Build the body from raw form input. Non-digits are stripped from the
    /// phone number and an empty country code falls back to the default.
    #[must_use]
    pub fn from_form(country_code: &str, phone_number: &str, updated_by: impl Into<String>) -> Self {
        let country_code = country_code.trim();
        Self {
            country_code: if country_code.is_empty() {
                default_country_code()
            } else {
                country_code.to_string()
            },
            phone_number: sanitize_phone(phone_number),
            updated_by: updated_by.into(),
        }
    }
}

/// Keep only ASCII digits.
#[must_use]
pub fn sanitize_phone(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}
