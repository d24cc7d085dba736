//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the first character of a name, upper-cased.
///
/// Used as the placeholder for a category without an icon.
///
/// Usage in templates: `{{ category.name|initial }}`
#[askama::filter_fn]
pub fn initial(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value
        .to_string()
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default())
}

/// Shortens text to at most `max` characters, adding an ellipsis when cut.
///
/// Usage in templates: `{{ product.description|excerpt(90) }}`
#[askama::filter_fn]
pub fn excerpt(
    value: impl Display,
    _env: &dyn askama::Values,
    max: usize,
) -> askama::Result<String> {
    let text = value.to_string();
    let text = text.trim();
    if text.chars().count() <= max {
        return Ok(text.to_string());
    }
    let cut: String = text.chars().take(max).collect();
    Ok(format!("{}…", cut.trim_end()))
}
