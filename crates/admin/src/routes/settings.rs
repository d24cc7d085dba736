//! Storefront settings routes: hero banners and the WhatsApp contact.
//!
//! The hero table is also rendered on its own so HTMX requests for move and
//! toggle can swap just the table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Multipart, Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use vitrine_core::HeroImageId;
use vitrine_core::models::{HeroImage, HeroImageInput, HeroImagePatch, WhatsAppInput, WhatsAppSettings, next_order};
use vitrine_core::reorder::{Direction, plan_move, sort_by_order};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::services::MultipartForm;
use crate::state::AppState;

use super::{
    AdminUserView, ConfirmDeleteTemplate, Notice, NoticeQuery, is_htmx, or_empty, redirect_error,
    redirect_success,
};

const SETTINGS_PATH: &str = "/admin/settings";
const HERO_PATH: &str = "/admin/settings/hero-images";

/// Country codes offered in the WhatsApp form.
const COUNTRY_CODES: &[(&str, &str)] = &[
    ("+961", "Lebanon"),
    ("+1", "USA"),
    ("+44", "UK"),
    ("+971", "UAE"),
    ("+966", "Saudi Arabia"),
    ("+962", "Jordan"),
    ("+20", "Egypt"),
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route(SETTINGS_PATH, get(index))
        .route(HERO_PATH, post(create_hero))
        .route("/admin/settings/hero-images/new", get(new_hero_form))
        .route("/admin/settings/hero-images/{id}", post(update_hero))
        .route("/admin/settings/hero-images/{id}/edit", get(edit_hero_form))
        .route("/admin/settings/hero-images/{id}/move", post(move_hero))
        .route("/admin/settings/hero-images/{id}/toggle", post(toggle_hero))
        .route(
            "/admin/settings/hero-images/{id}/delete",
            get(confirm_delete_hero).post(delete_hero),
        )
        .route("/admin/settings/whatsapp", post(save_whatsapp))
}

// =============================================================================
// Views
// =============================================================================

#[derive(Debug, Clone)]
pub struct HeroRowView {
    pub image_url: String,
    pub header_text: String,
    pub order: i64,
    pub is_active: bool,
    pub overlay: String,
    pub is_first: bool,
    pub is_last: bool,
    pub edit_href: String,
    pub delete_href: String,
    pub move_action: String,
    pub toggle_action: String,
}

fn hero_rows(heroes: &[HeroImage]) -> Vec<HeroRowView> {
    let last = heroes.len().saturating_sub(1);
    heroes
        .iter()
        .enumerate()
        .map(|(index, hero)| HeroRowView {
            image_url: hero.image_url.clone(),
            header_text: hero.header_text.clone(),
            order: hero.order,
            is_active: hero.is_active,
            overlay: if hero.overlay_enabled {
                format!("{:.0}%", hero.effective_overlay() * 100.0)
            } else {
                "Off".to_string()
            },
            is_first: index == 0,
            is_last: index == last,
            edit_href: format!("{HERO_PATH}/{}/edit", hero.id),
            delete_href: format!("{HERO_PATH}/{}/delete", hero.id),
            move_action: format!("{HERO_PATH}/{}/move", hero.id),
            toggle_action: format!("{HERO_PATH}/{}/toggle", hero.id),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct CountryOptionView {
    pub code: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn country_options(selected: &str) -> Vec<CountryOptionView> {
    COUNTRY_CODES
        .iter()
        .map(|&(code, label)| CountryOptionView {
            code,
            label,
            selected: code == selected,
        })
        .collect()
}

/// Hero table fragment, also embedded in the settings page.
#[derive(Template, WebTemplate)]
#[template(path = "settings/hero_table.html")]
pub struct HeroTableTemplate {
    pub heroes: Vec<HeroRowView>,
    pub table_notice: Notice,
}

#[derive(Template, WebTemplate)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub heroes: Vec<HeroRowView>,
    pub table_notice: Notice,
    pub whatsapp: WhatsAppSettings,
    pub country_codes: Vec<CountryOptionView>,
    pub notice: Notice,
}

#[derive(Template, WebTemplate)]
#[template(path = "settings/hero_form.html")]
pub struct HeroFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub title: String,
    pub action: String,
    pub input: HeroImageInput,
    pub overlay_percent: i64,
    pub notice: Notice,
}

impl HeroFormTemplate {
    fn new(admin: &CurrentAdmin, id: Option<&HeroImageId>, input: HeroImageInput, notice: Notice) -> Self {
        let (title, action) = match id {
            Some(id) => ("Edit hero image", format!("{HERO_PATH}/{id}")),
            None => ("New hero image", HERO_PATH.to_string()),
        };
        #[allow(clippy::cast_possible_truncation)]
        let overlay_percent = (input.overlay_opacity.clamp(0.0, 1.0) * 100.0).round() as i64;
        Self {
            admin_user: AdminUserView::from(admin),
            current_path: SETTINGS_PATH.to_string(),
            title: title.to_string(),
            action,
            input,
            overlay_percent,
            notice,
        }
    }
}

// =============================================================================
// Settings page
// =============================================================================

/// Fetch hero images sorted by `order`.
async fn sorted_heroes(state: &AppState) -> std::result::Result<Vec<HeroImage>, vitrine_client::ApiError> {
    let mut heroes = state.api().settings().hero_images().await?;
    sort_by_order(&mut heroes);
    Ok(heroes)
}

/// GET /admin/settings
#[instrument(skip(admin, state, notice))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(notice): Query<NoticeQuery>,
) -> SettingsTemplate {
    let settings = state.api().settings();
    let (heroes, whatsapp) = tokio::join!(sorted_heroes(&state), settings.whatsapp());
    let heroes = or_empty(heroes, "hero images");
    let whatsapp = or_empty(whatsapp, "WhatsApp settings");

    SettingsTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: SETTINGS_PATH.to_string(),
        heroes: hero_rows(&heroes),
        table_notice: Notice::default(),
        country_codes: country_options(&whatsapp.country_code),
        whatsapp,
        notice: notice.into(),
    }
}

/// Reply to a table mutation: the fragment for HTMX, a redirect otherwise.
fn table_reply(headers: &HeaderMap, heroes: &[HeroImage], notice: Notice) -> Response {
    if is_htmx(headers) {
        return HeroTableTemplate {
            heroes: hero_rows(heroes),
            table_notice: notice,
        }
        .into_response();
    }
    match (notice.error, notice.success) {
        (Some(error), _) => redirect_error(SETTINGS_PATH, &error).into_response(),
        (None, Some(success)) => redirect_success(SETTINGS_PATH, &success).into_response(),
        (None, None) => Redirect::to(SETTINGS_PATH).into_response(),
    }
}

// =============================================================================
// Reorder and toggle
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MoveForm {
    pub direction: String,
}

/// POST /admin/settings/hero-images/{id}/move
///
/// Both order updates are sent concurrently. The swap is applied to the
/// local list first, which is then replaced by a fresh fetch; if the fetch
/// fails the local list is shown.
#[instrument(skip(admin, state, headers, form), fields(admin_id = %admin.id))]
async fn move_hero(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<MoveForm>,
) -> Result<Response> {
    let id = HeroImageId::new(id);
    let direction: Direction = form
        .direction
        .parse()
        .map_err(|e: vitrine_core::reorder::UnknownDirection| AppError::BadRequest(e.to_string()))?;

    let mut heroes = match sorted_heroes(&state).await {
        Ok(heroes) => heroes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch hero images");
            return Ok(table_reply(&headers, &[], Notice::error("Failed to update order")));
        }
    };

    let Some(plan) = plan_move(&heroes, &id, direction) else {
        // Already at the edge; nothing to send.
        return Ok(table_reply(&headers, &heroes, Notice::default()));
    };

    let settings = state.api().settings();
    let email = admin.email.as_str();
    let moved_patch = HeroImagePatch::order(plan.moved.order, email);
    let neighbour_patch = HeroImagePatch::order(plan.neighbour.order, email);
    let (moved, neighbour) = tokio::join!(
        settings.update_hero_image(&plan.moved.id, &moved_patch),
        settings.update_hero_image(&plan.neighbour.id, &neighbour_patch),
    );

    let notice = match (moved, neighbour) {
        (Ok(_), Ok(_)) => {
            plan.apply(&mut heroes);
            Notice::success("Order updated")
        }
        (moved, neighbour) => {
            for e in [moved.err(), neighbour.err()].into_iter().flatten() {
                tracing::error!(error = %e, "Failed to update hero order");
            }
            Notice::error("Failed to update order")
        }
    };

    let heroes = match sorted_heroes(&state).await {
        Ok(fresh) => fresh,
        Err(e) => {
            tracing::error!(error = %e, "Failed to refetch hero images");
            heroes
        }
    };

    Ok(table_reply(&headers, &heroes, notice))
}

/// POST /admin/settings/hero-images/{id}/toggle
#[instrument(skip(admin, state, headers), fields(admin_id = %admin.id))]
async fn toggle_hero(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let id = HeroImageId::new(id);
    let heroes = sorted_heroes(&state).await?;
    let hero = heroes
        .iter()
        .find(|h| h.id == id)
        .ok_or_else(|| AppError::NotFound("Hero image".to_string()))?;

    let patch = HeroImagePatch::active(!hero.is_active, admin.email.as_str());
    let notice = match state.api().settings().update_hero_image(&id, &patch).await {
        Ok(_) => Notice::success("Status updated"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update hero status");
            Notice::error("Failed to update status")
        }
    };

    let heroes = match sorted_heroes(&state).await {
        Ok(fresh) => fresh,
        Err(e) => {
            tracing::error!(error = %e, "Failed to refetch hero images");
            heroes
        }
    };

    Ok(table_reply(&headers, &heroes, notice))
}

// =============================================================================
// Create / edit
// =============================================================================

fn read_hero_input(form: &MultipartForm, base: HeroImageInput) -> HeroImageInput {
    let text = |name: &str, fallback: String| {
        let value = form.text(name).trim();
        if value.is_empty() { fallback } else { value.to_string() }
    };
    let overlay_opacity = form
        .text("overlay_opacity")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map_or(base.overlay_opacity, |v| v.clamp(0.0, 1.0));

    HeroImageInput {
        image_url: text("image_url", String::new()),
        header_text: form.text("header_text").trim().to_string(),
        header_color: text("header_color", base.header_color),
        description_text: form.text("description_text").trim().to_string(),
        description_color: text("description_color", base.description_color),
        text_background_color: text("text_background_color", base.text_background_color),
        link: form.text("link").trim().to_string(),
        order: base.order,
        is_active: form.checked("is_active"),
        overlay_enabled: form.checked("overlay_enabled"),
        overlay_opacity,
        created_by: base.created_by,
        updated_by: base.updated_by,
    }
}

/// GET /admin/settings/hero-images/new
async fn new_hero_form(RequireAdminAuth(admin): RequireAdminAuth) -> HeroFormTemplate {
    HeroFormTemplate::new(&admin, None, HeroImageInput::default(), Notice::default())
}

/// GET /admin/settings/hero-images/{id}/edit
///
/// The API has no single-record read; the record is taken from the list.
#[instrument(skip(admin, state))]
async fn edit_hero_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<HeroFormTemplate> {
    let id = HeroImageId::new(id);
    let heroes = sorted_heroes(&state).await?;
    let hero = heroes
        .iter()
        .find(|h| h.id == id)
        .ok_or_else(|| AppError::NotFound("Hero image".to_string()))?;

    Ok(HeroFormTemplate::new(
        &admin,
        Some(&id),
        HeroImageInput::from(hero),
        Notice::default(),
    ))
}

/// POST /admin/settings/hero-images
async fn create_hero(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    submit_hero(&state, &admin, None, multipart).await
}

/// POST /admin/settings/hero-images/{id}
async fn update_hero(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    submit_hero(&state, &admin, Some(HeroImageId::new(id)), multipart).await
}

#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
async fn submit_hero(
    state: &AppState,
    admin: &CurrentAdmin,
    id: Option<HeroImageId>,
    multipart: Multipart,
) -> Result<Response> {
    let mut form = MultipartForm::read(multipart).await?;
    let image = form.take_file("image");

    // New records go after the last one; edits keep their slot.
    let heroes = sorted_heroes(state).await?;
    let order = match &id {
        Some(id) => heroes
            .iter()
            .find(|h| &h.id == id)
            .map(|h| h.order)
            .ok_or_else(|| AppError::NotFound("Hero image".to_string()))?,
        None => next_order(&heroes),
    };

    let base = HeroImageInput {
        order,
        created_by: admin.email.to_string(),
        updated_by: admin.email.to_string(),
        ..HeroImageInput::default()
    };
    let mut input = read_hero_input(&form, base);
    let render = |input: HeroImageInput, message: String| {
        HeroFormTemplate::new(admin, id.as_ref(), input, Notice::error(message)).into_response()
    };

    if let Some(image) = image {
        match state.api().uploads().single(image).await {
            Ok(uploaded) => input.image_url = uploaded.url,
            Err(e) => {
                tracing::error!(error = %e, "Hero image upload failed");
                return Ok(render(input, e.user_message("Failed to upload image")));
            }
        }
    }

    let settings = state.api().settings();
    let (result, done) = match &id {
        Some(id) => (settings.update_hero_image(id, &input).await, "Hero image updated successfully!"),
        None => (settings.create_hero_image(&input).await, "Hero image created successfully!"),
    };

    match result {
        Ok(hero) => {
            tracing::info!(hero_id = %hero.id, "Hero image saved");
            Ok(redirect_success(SETTINGS_PATH, done).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save hero image");
            Ok(render(input, e.user_message("Failed to save hero image")))
        }
    }
}

// =============================================================================
// Delete
// =============================================================================

/// GET /admin/settings/hero-images/{id}/delete
#[instrument(skip(admin, state))]
async fn confirm_delete_hero(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ConfirmDeleteTemplate> {
    let id = HeroImageId::new(id);
    let heroes = sorted_heroes(&state).await?;
    let hero = heroes
        .iter()
        .find(|h| h.id == id)
        .ok_or_else(|| AppError::NotFound("Hero image".to_string()))?;
    let name = if hero.header_text.is_empty() {
        "this hero image"
    } else {
        hero.header_text.as_str()
    };

    let mut page = ConfirmDeleteTemplate::new(
        &admin,
        SETTINGS_PATH,
        "hero image",
        name,
        format!("{HERO_PATH}/{id}/delete"),
    );
    page.cancel_href = SETTINGS_PATH.to_string();
    Ok(page)
}

/// POST /admin/settings/hero-images/{id}/delete
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
async fn delete_hero(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = HeroImageId::new(id);
    match state.api().settings().delete_hero_image(&id).await {
        Ok(()) => {
            tracing::info!(hero_id = %id, "Hero image deleted");
            redirect_success(SETTINGS_PATH, "Hero image deleted successfully!").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete hero image");
            redirect_error(SETTINGS_PATH, "Failed to delete hero image").into_response()
        }
    }
}

// =============================================================================
// WhatsApp
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WhatsAppForm {
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub phone_number: String,
}

/// POST /admin/settings/whatsapp
#[instrument(skip(admin, state, form), fields(admin_id = %admin.id))]
async fn save_whatsapp(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<WhatsAppForm>,
) -> Response {
    let input = WhatsAppInput::from_form(&form.country_code, &form.phone_number, admin.email.as_str());
    match state.api().settings().update_whatsapp(&input).await {
        Ok(_) => redirect_success(SETTINGS_PATH, "WhatsApp number saved successfully!").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to save WhatsApp settings");
            redirect_error(SETTINGS_PATH, "Failed to save WhatsApp number").into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn hero(id: &str, order: i64) -> HeroImage {
        let json = format!(r#"{{"id":"{id}","order":{order},"headerText":"H{id}"}}"#);
        serde_json::from_str(&json).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_hero_rows_mark_edges() {
        let rows = hero_rows(&[hero("a", 1), hero("b", 2), hero("c", 3)]);
        assert!(rows[0].is_first);
        assert!(!rows[0].is_last);
        assert!(rows[2].is_last);
        assert_eq!(rows[1].move_action, "/admin/settings/hero-images/b/move");
        assert_eq!(rows[0].overlay, "40%");
    }

    #[test]
    fn test_country_options_select_current() {
        let options = country_options("+44");
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
        assert!(options.iter().any(|o| o.code == "+44" && o.selected));
    }

    #[test]
    fn test_read_hero_input_keeps_order_and_defaults() {
        let form = MultipartForm::from_fields(&[
            ("header_text", "Spring sale"),
            ("image_url", "/hero.png"),
            ("is_active", "on"),
            ("overlay_opacity", "2.5"),
        ]);
        let base = HeroImageInput {
            order: 7,
            ..HeroImageInput::default()
        };
        let input = read_hero_input(&form, base);

        assert_eq!(input.order, 7);
        assert_eq!(input.header_text, "Spring sale");
        assert_eq!(input.header_color, "#000000");
        assert!(input.is_active);
        assert!(!input.overlay_enabled);
        assert!((input.overlay_opacity - 1.0).abs() < f64::EPSILON);
    }
}
