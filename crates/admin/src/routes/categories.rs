//! Category management routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::instrument;
use vitrine_core::CategoryId;
use vitrine_core::guard::GuardViolation;
use vitrine_core::models::{Category, CategoryInput};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::services::MultipartForm;
use crate::state::AppState;

use super::{
    AdminUserView, ConfirmDeleteTemplate, Notice, NoticeQuery, or_empty, redirect_error,
    redirect_success,
};

const CATEGORIES_PATH: &str = "/admin/categories";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(CATEGORIES_PATH, get(index).post(create))
        .route("/admin/categories/new", get(new_form))
        .route("/admin/categories/{id}", post(update))
        .route("/admin/categories/{id}/edit", get(edit_form))
        .route(
            "/admin/categories/{id}/delete",
            get(confirm_delete).post(delete),
        )
}

#[derive(Debug, Clone)]
pub struct CategoryRowView {
    pub name: String,
    pub description: String,
    pub icon_url: Option<String>,
    pub edit_href: String,
    pub delete_href: String,
}

impl From<&Category> for CategoryRowView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            icon_url: category.icon_url.clone(),
            edit_href: format!("{CATEGORIES_PATH}/{}/edit", category.id),
            delete_href: format!("{CATEGORIES_PATH}/{}/delete", category.id),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub categories: Vec<CategoryRowView>,
    pub notice: Notice,
}

#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub title: String,
    pub action: String,
    pub input: CategoryInput,
    pub notice: Notice,
}

impl CategoryFormTemplate {
    fn new(admin: &CurrentAdmin, id: Option<&CategoryId>, input: CategoryInput, notice: Notice) -> Self {
        let (title, action) = match id {
            Some(id) => ("Edit category", format!("{CATEGORIES_PATH}/{id}")),
            None => ("New category", CATEGORIES_PATH.to_string()),
        };
        Self {
            admin_user: AdminUserView::from(admin),
            current_path: CATEGORIES_PATH.to_string(),
            title: title.to_string(),
            action,
            input,
            notice,
        }
    }
}

fn read_input(form: &MultipartForm) -> CategoryInput {
    CategoryInput {
        name: form.text("name").trim().to_string(),
        description: form.text("description").trim().to_string(),
        icon_url: form.text("icon_url").trim().to_string(),
    }
}

/// GET /admin/categories
#[instrument(skip(admin, state, notice))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(notice): Query<NoticeQuery>,
) -> CategoriesIndexTemplate {
    let categories = or_empty(state.api().categories().list().await, "categories");

    CategoriesIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: CATEGORIES_PATH.to_string(),
        categories: categories.iter().map(CategoryRowView::from).collect(),
        notice: notice.into(),
    }
}

/// GET /admin/categories/new
async fn new_form(RequireAdminAuth(admin): RequireAdminAuth) -> CategoryFormTemplate {
    CategoryFormTemplate::new(&admin, None, CategoryInput::default(), Notice::default())
}

/// GET /admin/categories/{id}/edit
#[instrument(skip(admin, state))]
async fn edit_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<CategoryFormTemplate> {
    let id = CategoryId::new(id);
    let category = state
        .api()
        .categories()
        .get(&id)
        .await
        .map_err(|e| AppError::from_api(e, "Category"))?;

    Ok(CategoryFormTemplate::new(
        &admin,
        Some(&id),
        CategoryInput::from(&category),
        Notice::default(),
    ))
}

/// POST /admin/categories
async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    submit(&state, &admin, None, multipart).await
}

/// POST /admin/categories/{id}
async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    submit(&state, &admin, Some(CategoryId::new(id)), multipart).await
}

#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
async fn submit(
    state: &AppState,
    admin: &CurrentAdmin,
    id: Option<CategoryId>,
    multipart: Multipart,
) -> Result<Response> {
    let mut form = MultipartForm::read(multipart).await?;
    let icon = form.take_file("icon");
    let mut input = read_input(&form);
    let render = |input: CategoryInput, message: String| {
        CategoryFormTemplate::new(admin, id.as_ref(), input, Notice::error(message)).into_response()
    };

    if input.name.is_empty() {
        let violation = GuardViolation::invalid("name", "name is required");
        return Ok(render(input, violation.to_string()));
    }

    if let Some(icon) = icon {
        match state.api().uploads().single(icon).await {
            Ok(uploaded) => input.icon_url = uploaded.url,
            Err(e) => {
                tracing::error!(error = %e, "Icon upload failed");
                return Ok(render(input, e.user_message("Failed to upload icon")));
            }
        }
    }

    let categories = state.api().categories();
    let (result, done) = match &id {
        Some(id) => (categories.update(id, &input).await, "Category updated successfully!"),
        None => (categories.create(&input).await, "Category created successfully!"),
    };

    match result {
        Ok(category) => {
            tracing::info!(category_id = %category.id, "Category saved");
            Ok(redirect_success(CATEGORIES_PATH, done).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save category");
            Ok(render(input, e.user_message("Failed to save category")))
        }
    }
}

/// GET /admin/categories/{id}/delete
#[instrument(skip(admin, state))]
async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ConfirmDeleteTemplate> {
    let id = CategoryId::new(id);
    let category = state
        .api()
        .categories()
        .get(&id)
        .await
        .map_err(|e| AppError::from_api(e, "Category"))?;

    Ok(ConfirmDeleteTemplate::new(
        &admin,
        CATEGORIES_PATH,
        "category",
        &category.name,
        format!("{CATEGORIES_PATH}/{id}/delete"),
    ))
}

/// POST /admin/categories/{id}/delete
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = CategoryId::new(id);
    match state.api().categories().delete(&id).await {
        Ok(()) => {
            tracing::info!(category_id = %id, "Category deleted");
            redirect_success(CATEGORIES_PATH, "Category deleted successfully!").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete category");
            redirect_error(CATEGORIES_PATH, &e.user_message("Failed to delete category"))
                .into_response()
        }
    }
}
