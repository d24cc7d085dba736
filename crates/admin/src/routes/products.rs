//! Product management routes.
//!
//! The product form round-trips its whole draft on every submit. Hidden
//! fields carry the colours and images as JSON; the clicked button's
//! `action` value says what to do with the draft before re-rendering, and
//! only `save` sends it to the catalog API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use vitrine_client::ProductQuery;
use vitrine_core::draft::ProductDraft;
use vitrine_core::guard::GuardViolation;
use vitrine_core::models::{Category, Dimensions, Product, ProductImage};
use vitrine_core::pagination::{ADMIN_PAGE_SIZE, LoadMore};
use vitrine_core::{ImageId, Price, ProductId};

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

const PRODUCTS_PATH: &str = "/admin/products";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(PRODUCTS_PATH, get(index).post(create))
        .route("/admin/products/new", get(new_form))
        .route("/admin/products/{id}", post(update))
        .route("/admin/products/{id}/edit", get(edit_form))
        .route(
            "/admin/products/{id}/delete",
            get(confirm_delete).post(delete),
        )
}

// =============================================================================
// List
// =============================================================================

/// Product row in admin tables.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: i64,
    pub out_of_stock: bool,
    pub is_featured: bool,
    pub image: Option<String>,
    pub edit_href: String,
    pub delete_href: String,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            stock: product.stock,
            out_of_stock: product.is_out_of_stock(),
            is_featured: product.is_featured,
            image: product.main_image_src().map(str::to_string),
            edit_href: format!("/admin/products/{}/edit", product.id),
            delete_href: format!("/admin/products/{}/delete", product.id),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub limit: Option<String>,
    pub q: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Products list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub products: Vec<ProductRowView>,
    pub q: String,
    pub load_more_href: Option<String>,
    pub notice: Notice,
}

/// Trim the fetched page to the cursor and apply the search text.
///
/// "Load more" is offered when the API filled the whole page, whether or not
/// the search hides some of it.
fn visible_products(
    products: Vec<Product>,
    cursor: LoadMore,
    q: &str,
) -> (Vec<ProductRowView>, Option<String>) {
    let (page, has_more) = cursor.clamp(products);
    let rows = page
        .iter()
        .filter(|p| p.matches_search(q))
        .map(ProductRowView::from)
        .collect();

    let load_more_href = has_more.then(|| {
        let mut href = format!("{PRODUCTS_PATH}?limit={}", cursor.next_limit());
        if !q.is_empty() {
            href.push_str("&q=");
            href.push_str(&urlencoding::encode(q));
        }
        href
    });

    (rows, load_more_href)
}

/// GET /admin/products
#[instrument(skip(admin, state, query), fields(admin_id = %admin.id))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ProductsIndexTemplate {
    let cursor = LoadMore::from_query(ADMIN_PAGE_SIZE, query.limit.as_deref());
    let q = query.q.unwrap_or_default().trim().to_string();

    let products = state
        .api()
        .products()
        .list(&ProductQuery {
            limit: Some(cursor.limit()),
            ..ProductQuery::default()
        })
        .await;
    let (products, load_more_href) = visible_products(or_empty(products, "products"), cursor, &q);

    ProductsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: PRODUCTS_PATH.to_string(),
        products,
        q,
        load_more_href,
        notice: Notice::from(NoticeQuery {
            success: query.success,
            error: query.error,
        }),
    }
}

// =============================================================================
// Form
// =============================================================================

/// What the clicked submit button asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FormAction {
    Save,
    AddColor,
    RemoveColor(usize),
    RemoveImage(ImageId),
    SetMain(ImageId),
    /// Upload or unrecognised button; re-render the draft as is.
    Refresh,
}

impl FormAction {
    fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            None if raw.is_empty() || raw == "save" => Self::Save,
            None if raw == "add_color" => Self::AddColor,
            Some(("remove_color", index)) => index
                .parse()
                .map_or(Self::Refresh, Self::RemoveColor),
            Some(("remove_image", id)) if !id.is_empty() => Self::RemoveImage(ImageId::new(id)),
            Some(("set_main", id)) if !id.is_empty() => Self::SetMain(ImageId::new(id)),
            _ => Self::Refresh,
        }
    }
}

/// Numeric inputs exactly as typed, so a bad value is shown back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct NumberFields {
    price: String,
    stock: String,
    length: String,
    width: String,
    height: String,
    weight: String,
}

/// Draft plus the raw numeric inputs it was read from.
#[derive(Debug, Clone, Default)]
struct ProductForm {
    draft: ProductDraft,
    numbers: NumberFields,
    invalid: Option<GuardViolation>,
}

fn fmt_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_measure(field: &'static str, raw: &str) -> std::result::Result<Option<f64>, GuardViolation> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(Some)
        .ok_or_else(|| GuardViolation::invalid(field, format!("{field} must be a positive number")))
}

fn parse_stock(raw: &str) -> std::result::Result<i64, GuardViolation> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>()
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| GuardViolation::invalid("stock", "stock must be a whole number"))
}

fn json_list<T: serde::de::DeserializeOwned>(field: &str, raw: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(field, error = %e, "Discarding unreadable draft field");
        Vec::new()
    })
}

impl ProductForm {
    fn from_draft(draft: ProductDraft) -> Self {
        let numbers = NumberFields {
            price: draft.price.plain(),
            stock: draft.stock.to_string(),
            length: fmt_optional(draft.dimensions.length),
            width: fmt_optional(draft.dimensions.width),
            height: fmt_optional(draft.dimensions.height),
            weight: fmt_optional(draft.weight),
        };
        Self {
            draft,
            numbers,
            invalid: None,
        }
    }

    fn read(form: &MultipartForm) -> Self {
        let numbers = NumberFields {
            price: form.text("price").to_string(),
            stock: form.text("stock").to_string(),
            length: form.text("length").to_string(),
            width: form.text("width").to_string(),
            height: form.text("height").to_string(),
            weight: form.text("weight").to_string(),
        };
        let mut errors = Vec::new();
        let mut check = |result: std::result::Result<Option<f64>, GuardViolation>| {
            result.unwrap_or_else(|e| {
                errors.push(e);
                None
            })
        };

        let length = check(parse_measure("length", &numbers.length));
        let width = check(parse_measure("width", &numbers.width));
        let height = check(parse_measure("height", &numbers.height));
        let weight = check(parse_measure("weight", &numbers.weight));

        let price = numbers.price.parse::<Price>().unwrap_or_else(|e| {
            errors.push(GuardViolation::invalid("price", e.to_string()));
            Price::default()
        });
        let stock = parse_stock(&numbers.stock).unwrap_or_else(|e| {
            errors.push(e);
            0
        });

        let category_id = Some(form.text("category_id").trim())
            .filter(|id| !id.is_empty())
            .map(Into::into);
        let main_image_id = Some(form.text("main_image_id").trim())
            .filter(|id| !id.is_empty())
            .map(ImageId::new);

        let draft = ProductDraft {
            name: form.text("name").to_string(),
            description: form.text("description").to_string(),
            price,
            stock,
            category_id,
            is_featured: form.checked("is_featured"),
            colors: json_list("colors", form.text("colors")),
            images: json_list("images", form.text("images")),
            main_image_id,
            dimensions: Dimensions {
                length,
                width,
                height,
            },
            weight,
        };

        Self {
            draft,
            numbers,
            invalid: errors.into_iter().next(),
        }
    }
}

/// Whether the form creates a product or edits one.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FormTarget {
    Create,
    Edit(ProductId),
}

impl FormTarget {
    fn action(&self) -> String {
        match self {
            Self::Create => PRODUCTS_PATH.to_string(),
            Self::Edit(id) => format!("{PRODUCTS_PATH}/{id}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryOptionView {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct ColorView {
    pub name: String,
    pub value: String,
    pub remove_action: String,
}

#[derive(Debug, Clone)]
pub struct DraftImageView {
    pub src: String,
    pub name: String,
    pub is_main: bool,
    pub remove_action: String,
    pub main_action: String,
}

impl DraftImageView {
    fn new(image: &ProductImage, main_id: Option<&ImageId>) -> Self {
        Self {
            src: image.src().unwrap_or_default().to_string(),
            name: image.name.clone().unwrap_or_default(),
            is_main: main_id.map_or(image.is_main, |id| id == &image.id),
            remove_action: format!("remove_image:{}", image.id),
            main_action: format!("set_main:{}", image.id),
        }
    }
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub title: String,
    pub action: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub weight: String,
    pub is_featured: bool,
    pub categories: Vec<CategoryOptionView>,
    pub colors: Vec<ColorView>,
    pub images: Vec<DraftImageView>,
    pub colors_json: String,
    pub images_json: String,
    pub main_image_id: String,
    pub notice: Notice,
}

impl ProductFormTemplate {
    fn new(
        admin: &CurrentAdmin,
        target: &FormTarget,
        form: ProductForm,
        categories: &[Category],
        notice: Notice,
    ) -> Self {
        let ProductForm { draft, numbers, .. } = form;
        let selected = draft.category_id.as_ref();
        let main_id = draft.main_image_id.as_ref();

        Self {
            admin_user: AdminUserView::from(admin),
            current_path: PRODUCTS_PATH.to_string(),
            title: match target {
                FormTarget::Create => "New product".to_string(),
                FormTarget::Edit(_) => "Edit product".to_string(),
            },
            action: target.action(),
            categories: categories
                .iter()
                .map(|c| CategoryOptionView {
                    id: c.id.to_string(),
                    name: c.name.clone(),
                    selected: selected == Some(&c.id),
                })
                .collect(),
            colors: draft
                .colors
                .iter()
                .enumerate()
                .map(|(index, color)| ColorView {
                    name: color.name.clone(),
                    value: color.value.clone(),
                    remove_action: format!("remove_color:{index}"),
                })
                .collect(),
            images: draft
                .images
                .iter()
                .map(|img| DraftImageView::new(img, main_id))
                .collect(),
            colors_json: to_json(&draft.colors),
            images_json: to_json(&draft.images),
            main_image_id: main_id.map(ToString::to_string).unwrap_or_default(),
            name: draft.name,
            description: draft.description,
            is_featured: draft.is_featured,
            price: numbers.price,
            stock: numbers.stock,
            length: numbers.length,
            width: numbers.width,
            height: numbers.height,
            weight: numbers.weight,
            notice,
        }
    }
}

fn to_json<T: serde::Serialize>(value: &[T]) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// GET /admin/products/new
#[instrument(skip(admin, state))]
async fn new_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> ProductFormTemplate {
    let categories = or_empty(state.api().categories().list().await, "categories");
    ProductFormTemplate::new(
        &admin,
        &FormTarget::Create,
        ProductForm::from_draft(ProductDraft::default()),
        &categories,
        Notice::default(),
    )
}

/// GET /admin/products/{id}/edit
#[instrument(skip(admin, state))]
async fn edit_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let id = ProductId::new(id);
    let api = state.api();
    let (products_api, categories_api) = (api.products(), api.categories());
    let (product, categories) = tokio::join!(products_api.get(&id), categories_api.list());
    let product = product.map_err(|e| AppError::from_api(e, "Product"))?;
    let categories = or_empty(categories, "categories");

    Ok(ProductFormTemplate::new(
        &admin,
        &FormTarget::Edit(id),
        ProductForm::from_draft(ProductDraft::from(&product)),
        &categories,
        Notice::default(),
    ))
}

/// POST /admin/products
async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    submit(&state, &admin, FormTarget::Create, multipart).await
}

/// POST /admin/products/{id}
async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    submit(&state, &admin, FormTarget::Edit(ProductId::new(id)), multipart).await
}

#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
async fn submit(
    state: &AppState,
    admin: &CurrentAdmin,
    target: FormTarget,
    multipart: Multipart,
) -> Result<Response> {
    let mut raw = MultipartForm::read(multipart).await?;
    let uploads = raw.take_files("new_images");
    let action = FormAction::parse(raw.text("action"));
    let mut form = ProductForm::read(&raw);
    let categories = or_empty(state.api().categories().list().await, "categories");

    let render = |form: ProductForm, notice: Notice| {
        ProductFormTemplate::new(admin, &target, form, &categories, notice).into_response()
    };

    // New files are uploaded whatever button was pressed, so a later save
    // carries their URLs.
    if !uploads.is_empty() {
        match state.api().uploads().multiple(uploads).await {
            Ok(files) => form.draft.append_uploads(files),
            Err(e) => {
                tracing::error!(error = %e, "Image upload failed");
                let notice = Notice::error(e.user_message("Failed to upload images"));
                return Ok(render(form, notice));
            }
        }
    }

    match action {
        FormAction::Save => {}
        FormAction::AddColor => {
            form.draft
                .add_color(raw.text("new_color_name"), raw.text("new_color_value"));
            return Ok(render(form, Notice::default()));
        }
        FormAction::RemoveColor(index) => {
            form.draft.remove_color(index);
            return Ok(render(form, Notice::default()));
        }
        FormAction::RemoveImage(id) => {
            form.draft.remove_image(&id);
            return Ok(render(form, Notice::default()));
        }
        FormAction::SetMain(id) => {
            form.draft.set_main_image(&id);
            return Ok(render(form, Notice::default()));
        }
        FormAction::Refresh => return Ok(render(form, Notice::default())),
    }

    if let Some(violation) = form.invalid.clone() {
        return Ok(render(form, Notice::error(violation.to_string())));
    }
    let input = match form.draft.clone().into_input(&categories, admin.email.as_str()) {
        Ok(input) => input,
        Err(violation) => return Ok(render(form, Notice::error(violation.to_string()))),
    };

    let products = state.api().products();
    let (result, done) = match &target {
        FormTarget::Create => (products.create(&input).await, "Product created successfully!"),
        FormTarget::Edit(id) => (products.update(id, &input).await, "Product updated successfully!"),
    };

    match result {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product saved");
            Ok(redirect_success(PRODUCTS_PATH, done).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save product");
            Ok(render(form, Notice::error(e.user_message("Failed to save product"))))
        }
    }
}

// =============================================================================
// Delete
// =============================================================================

/// GET /admin/products/{id}/delete
#[instrument(skip(admin, state))]
async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ConfirmDeleteTemplate> {
    let id = ProductId::new(id);
    let product = state
        .api()
        .products()
        .get(&id)
        .await
        .map_err(|e| AppError::from_api(e, "Product"))?;

    Ok(ConfirmDeleteTemplate::new(
        &admin,
        PRODUCTS_PATH,
        "product",
        &product.name,
        format!("{PRODUCTS_PATH}/{id}/delete"),
    ))
}

/// POST /admin/products/{id}/delete
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = ProductId::new(id);
    match state.api().products().delete(&id).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "Product deleted");
            redirect_success(PRODUCTS_PATH, "Product deleted successfully!").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete product");
            redirect_error(PRODUCTS_PATH, &e.user_message("Failed to delete product"))
                .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str) -> Product {
        let json = format!(r#"{{"id":"{id}","name":"{name}","price":10,"stock":3}}"#);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_form_action_parse() {
        assert_eq!(FormAction::parse(""), FormAction::Save);
        assert_eq!(FormAction::parse("save"), FormAction::Save);
        assert_eq!(FormAction::parse("add_color"), FormAction::AddColor);
        assert_eq!(FormAction::parse("remove_color:2"), FormAction::RemoveColor(2));
        assert_eq!(FormAction::parse("remove_color:x"), FormAction::Refresh);
        assert_eq!(
            FormAction::parse("set_main:img-1"),
            FormAction::SetMain(ImageId::new("img-1"))
        );
        assert_eq!(
            FormAction::parse("remove_image:img-1"),
            FormAction::RemoveImage(ImageId::new("img-1"))
        );
        assert_eq!(FormAction::parse("bogus"), FormAction::Refresh);
    }

    #[test]
    fn test_form_reads_draft_and_hidden_json() {
        let raw = MultipartForm::from_fields(&[
            ("name", "Lamp"),
            ("price", "19.5"),
            ("stock", "4"),
            ("category_id", "c1"),
            ("is_featured", "on"),
            ("colors", r##"[{"name":"Sand","value":"#c2b280"}]"##),
            ("images", r#"[{"id":"i1","url":"/a.png","isMain":true}]"#),
            ("main_image_id", "i1"),
            ("width", "12"),
        ]);
        let form = ProductForm::read(&raw);

        assert!(form.invalid.is_none());
        assert_eq!(form.draft.name, "Lamp");
        assert_eq!(form.draft.price.plain(), "19.5");
        assert_eq!(form.draft.stock, 4);
        assert!(form.draft.is_featured);
        assert_eq!(form.draft.colors.len(), 1);
        assert_eq!(form.draft.images.len(), 1);
        assert_eq!(form.draft.main_image_id, Some(ImageId::new("i1")));
        assert_eq!(form.draft.dimensions.width, Some(12.0));
        assert_eq!(form.draft.dimensions.length, None);
    }

    #[test]
    fn test_form_keeps_bad_numbers_for_display() {
        let raw = MultipartForm::from_fields(&[("name", "Lamp"), ("price", "abc"), ("stock", "-1")]);
        let form = ProductForm::read(&raw);

        assert_eq!(form.numbers.price, "abc");
        assert!(matches!(
            form.invalid,
            Some(GuardViolation::InvalidField { field: "price", .. })
        ));
    }

    #[test]
    fn test_missing_category_blocks_save() {
        let raw = MultipartForm::from_fields(&[("name", "Lamp"), ("price", "1")]);
        let form = ProductForm::read(&raw);
        let result = form.draft.into_input(&[], "me@store.example");
        assert_eq!(result.unwrap_err(), GuardViolation::MissingCategory);
    }

    #[test]
    fn test_visible_products_full_page_offers_more() {
        let products = (0..10).map(|i| product(&format!("p{i}"), "Lamp")).collect();
        let (rows, more) = visible_products(products, LoadMore::admin(), "");
        assert_eq!(rows.len(), 10);
        assert_eq!(more.as_deref(), Some("/admin/products?limit=20"));
    }

    #[test]
    fn test_visible_products_search_keeps_load_more() {
        let mut products: Vec<Product> = (0..9).map(|i| product(&format!("p{i}"), "Lamp")).collect();
        products.push(product("p9", "Chair"));
        let (rows, more) = visible_products(products, LoadMore::admin(), "chair");
        assert_eq!(rows.len(), 1);
        assert_eq!(more.as_deref(), Some("/admin/products?limit=20&q=chair"));
    }

    #[test]
    fn test_visible_products_short_page_has_no_more() {
        let products = vec![product("p1", "Lamp")];
        let (rows, more) = visible_products(products, LoadMore::admin(), "");
        assert_eq!(rows.len(), 1);
        assert!(more.is_none());
    }
}
