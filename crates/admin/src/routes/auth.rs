//! Authentication route handlers for admin.
//!
//! Email and password are checked by the catalog API; the panel only keeps
//! the returned identity in its session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::{LOGIN_PATH, OptionalAdminAuth};
use crate::services::AdminAuthService;
use crate::state::AppState;

const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/admin/register", get(register_page).post(register))
        .route("/admin/logout", post(logout))
}

/// GET /admin/login
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    LoginTemplate {
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// POST /admin/login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AdminAuthService::new(state.api(), &session);
    match auth.login(&form.email, &form.password).await {
        Ok(_) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            LoginTemplate {
                email: form.email,
                error: Some(e.user_message("Login failed")),
            }
            .into_response()
        }
    }
}

/// GET /admin/register
async fn register_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    RegisterTemplate {
        name: String::new(),
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// POST /admin/register
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    let auth = AdminAuthService::new(state.api(), &session);
    match auth.register(&form.name, &form.email, &form.password).await {
        Ok(_) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            RegisterTemplate {
                name: form.name,
                email: form.email,
                error: Some(e.user_message("Registration failed")),
            }
            .into_response()
        }
    }
}

/// POST /admin/logout
async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    let auth = AdminAuthService::new(state.api(), &session);
    if let Err(e) = auth.logout().await {
        tracing::error!(error = %e, "Failed to clear admin session");
    }
    Redirect::to(LOGIN_PATH)
}
