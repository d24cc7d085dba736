//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Up to two upper-cased initials, for the avatar in the navigation bar.
///
/// Usage in templates: `{{ admin_user.name|initials }}`
#[askama::filter_fn]
pub fn initials(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value
        .to_string()
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect())
}

/// Shortens text to at most `max` characters, adding an ellipsis when cut.
///
/// Usage in templates: `{{ product.description|truncate_chars(60) }}`
#[askama::filter_fn]
pub fn truncate_chars(
    value: impl Display,
    _env: &dyn askama::Values,
    max: usize,
) -> askama::Result<String> {
    let text = value.to_string();
    if text.chars().count() <= max {
        return Ok(text);
    }
    let cut: String = text.chars().take(max).collect();
    Ok(format!("{}…", cut.trim_end()))
}
