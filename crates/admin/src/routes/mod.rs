//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /admin                                  - Redirect to the dashboard
//!
//! # Auth
//! GET  /admin/login, POST                      - Login form / login
//! GET  /admin/register, POST                   - Register form / register
//! POST /admin/logout                           - Logout
//!
//! # Dashboard
//! GET  /admin/dashboard                        - Stats, recent and featured products
//!
//! # Products
//! GET  /admin/products                         - List (?limit=&q=)
//! GET  /admin/products/new, POST /admin/products
//! GET  /admin/products/{id}/edit, POST /admin/products/{id}
//! GET  /admin/products/{id}/delete, POST       - Confirm / delete
//!
//! # Categories
//! GET  /admin/categories                       - List
//! GET  /admin/categories/new, POST /admin/categories
//! GET  /admin/categories/{id}/edit, POST /admin/categories/{id}
//! GET  /admin/categories/{id}/delete, POST     - Confirm / delete
//!
//! # Settings
//! GET  /admin/settings                         - Hero table + WhatsApp form
//! GET  /admin/settings/hero-images/new, POST /admin/settings/hero-images
//! GET  /admin/settings/hero-images/{id}/edit, POST /admin/settings/hero-images/{id}
//! POST /admin/settings/hero-images/{id}/move   - Swap with a neighbour
//! POST /admin/settings/hero-images/{id}/toggle - Flip isActive
//! GET  /admin/settings/hero-images/{id}/delete, POST
//! POST /admin/settings/whatsapp                - Save WhatsApp number
//!
//! # Admins
//! GET  /admin/admins                           - List
//! GET  /admin/admins/{id}/delete, POST         - Confirm / delete
//! ```

pub mod admins;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod products;
pub mod settings;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::HeaderMap,
    response::Redirect,
    routing::get,
};
use serde::Deserialize;

use crate::filters;
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(|| async { Redirect::to("/admin/dashboard") }))
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(settings::router())
        .merge(admins::router())
}

/// Logged-in admin as shown in the navigation bar.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
        }
    }
}

/// `?success=` / `?error=` carried to a list page after a mutation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Banner rendered at the top of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            error: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(message.into()),
        }
    }
}

impl From<NoticeQuery> for Notice {
    fn from(query: NoticeQuery) -> Self {
        let keep = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            success: keep(query.success),
            error: keep(query.error),
        }
    }
}

/// Confirmation step shared by every delete action.
#[derive(Template, WebTemplate)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub title: String,
    pub message: String,
    pub action: String,
    pub cancel_href: String,
    /// Extra hidden inputs posted with the confirmation.
    pub hidden: Vec<(&'static str, String)>,
    pub notice: Notice,
}

impl ConfirmDeleteTemplate {
    pub fn new(admin: &CurrentAdmin, section: &str, what: &str, name: &str, action: String) -> Self {
        Self {
            admin_user: AdminUserView::from(admin),
            current_path: section.to_string(),
            title: format!("Delete {what}"),
            message: format!("Delete \"{name}\"? This cannot be undone."),
            action,
            cancel_href: section.to_string(),
            hidden: Vec::new(),
            notice: Notice::default(),
        }
    }
}

/// Redirect to `path` with a success banner.
pub fn redirect_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_notice(path, "success", message))
}

/// Redirect to `path` with an error banner.
pub fn redirect_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_notice(path, "error", message))
}

fn with_notice(path: &str, kind: &str, message: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{kind}={}", urlencoding::encode(message))
}

/// Whether the request was issued by HTMX.
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Log a failed read and fall back to an empty value.
pub fn or_empty<T: Default>(result: Result<T, vitrine_client::ApiError>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch {what}");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_url_encodes_message() {
        assert_eq!(
            with_notice("/admin/products", "success", "Product saved!"),
            "/admin/products?success=Product%20saved%21"
        );
        assert_eq!(
            with_notice("/admin/products?limit=20", "error", "x"),
            "/admin/products?limit=20&error=x"
        );
    }

    #[test]
    fn test_blank_notices_are_dropped() {
        let notice = Notice::from(NoticeQuery {
            success: Some("  ".to_string()),
            error: Some("Failed".to_string()),
        });
        assert_eq!(notice, Notice::error("Failed"));
    }
}
