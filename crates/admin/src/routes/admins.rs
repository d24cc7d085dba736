//! Admin accounts management routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;
use vitrine_core::guard::ensure_not_self;
use vitrine_core::models::Admin;
use vitrine_core::{AdminId, Email};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::state::AppState;

use super::{
    AdminUserView, ConfirmDeleteTemplate, Notice, NoticeQuery, or_empty, redirect_error,
    redirect_success,
};

const ADMINS_PATH: &str = "/admin/admins";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(ADMINS_PATH, get(index))
        .route("/admin/admins/{id}/delete", get(confirm_delete).post(delete))
}

/// Admin account row.
#[derive(Debug, Clone)]
pub struct AdminListItem {
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub last_login: String,
    pub is_current: bool,
    pub delete_href: String,
}

fn format_date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |d| d.format("%b %d, %Y").to_string())
}

impl AdminListItem {
    fn new(admin: &Admin, current: &CurrentAdmin) -> Self {
        Self {
            name: admin.display_name().to_string(),
            email: admin.email.to_string(),
            created_at: format_date(admin.created_at),
            last_login: format_date(admin.last_login),
            is_current: ensure_not_self(&current.id, &current.email, &admin.id, Some(&admin.email))
                .is_err(),
            delete_href: format!("{ADMINS_PATH}/{}/delete", admin.id),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "admins/index.html")]
pub struct AdminsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub admins: Vec<AdminListItem>,
    pub notice: Notice,
}

/// GET /admin/admins
#[instrument(skip(admin, state, notice))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(notice): Query<NoticeQuery>,
) -> AdminsIndexTemplate {
    let admins = or_empty(state.api().admins().list().await, "admins");

    AdminsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: ADMINS_PATH.to_string(),
        admins: admins
            .iter()
            .map(|a| AdminListItem::new(a, &admin))
            .collect(),
        notice: notice.into(),
    }
}

/// GET /admin/admins/{id}/delete
///
/// Asking to delete oneself is turned away before anything is fetched.
#[instrument(skip(admin, state))]
async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = AdminId::new(id);
    if let Err(violation) = ensure_not_self(&admin.id, &admin.email, &id, None) {
        return Ok(redirect_error(ADMINS_PATH, &violation.to_string()).into_response());
    }

    let admins = state.api().admins().list().await?;
    let target = admins
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| AppError::NotFound("Admin".to_string()))?;
    if let Err(violation) = ensure_not_self(&admin.id, &admin.email, &id, Some(&target.email)) {
        return Ok(redirect_error(ADMINS_PATH, &violation.to_string()).into_response());
    }

    let mut page = ConfirmDeleteTemplate::new(
        &admin,
        ADMINS_PATH,
        "admin",
        target.email.as_str(),
        format!("{ADMINS_PATH}/{id}/delete"),
    );
    page.message = format!(
        "Delete the admin account \"{}\" ({})? This cannot be undone.",
        target.display_name(),
        target.email
    );
    page.hidden.push(("email", target.email.to_string()));
    Ok(page.into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteAdminForm {
    /// Email of the account, as shown on the confirmation page.
    #[serde(default)]
    pub email: String,
}

/// POST /admin/admins/{id}/delete
#[instrument(skip(admin, state, form), fields(admin_id = %admin.id))]
async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteAdminForm>,
) -> Response {
    let id = AdminId::new(id);
    let target_email = Email::parse(&form.email).ok();

    if let Err(violation) = ensure_not_self(&admin.id, &admin.email, &id, target_email.as_ref()) {
        tracing::warn!(target_id = %id, "Refused self-deletion");
        return redirect_error(ADMINS_PATH, &violation.to_string()).into_response();
    }

    match state.api().admins().delete(&id).await {
        Ok(()) => {
            tracing::info!(target_id = %id, "Admin deleted");
            redirect_success(ADMINS_PATH, "Admin deleted successfully!").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete admin");
            redirect_error(ADMINS_PATH, &e.user_message("Failed to delete admin")).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(id: &str, email: &str) -> Admin {
        let json = format!(r#"{{"id":"{id}","email":"{email}","name":"","createdAt":"2024-03-01T10:00:00Z"}}"#);
        serde_json::from_str(&json).unwrap_or_else(|e| panic!("{e}"))
    }

    fn current() -> CurrentAdmin {
        CurrentAdmin::from(admin("a1", "me@store.example"))
    }

    #[test]
    fn test_current_admin_is_marked() {
        let me = AdminListItem::new(&admin("a1", "me@store.example"), &current());
        let other = AdminListItem::new(&admin("a2", "other@store.example"), &current());
        assert!(me.is_current);
        assert!(!other.is_current);
        assert_eq!(other.delete_href, "/admin/admins/a2/delete");
        assert_eq!(other.created_at, "Mar 01, 2024");
        assert_eq!(other.last_login, "-");
    }

    #[test]
    fn test_same_email_other_id_is_marked() {
        let alias = AdminListItem::new(&admin("a9", "ME@store.example"), &current());
        assert!(alias.is_current);
    }
}
