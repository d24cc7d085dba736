//! Test harness for end-to-end tests.
//!
//! [`FakeCatalog`] stands in for the catalog API: an in-memory axum server on
//! an ephemeral port that records every request it receives. The storefront
//! and the admin panel are started against it with [`spawn_storefront`] and
//! [`spawn_admin`], and driven over real HTTP with a cookie-keeping
//! [`browser`].

#![allow(clippy::missing_panics_doc, clippy::expect_used, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Password every seeded admin logs in with.
pub const PASSWORD: &str = "correct horse";

// =============================================================================
// Fake catalog API
// =============================================================================

/// Everything the fake API knows, as the JSON it serves.
#[derive(Debug, Default)]
pub struct CatalogData {
    pub admins: Vec<Value>,
    pub categories: Vec<Value>,
    pub products: Vec<Value>,
    pub heroes: Vec<Value>,
    pub whatsapp: Value,
    /// `"METHOD /path?query"` for every request, in arrival order.
    pub requests: Vec<String>,
    /// When set, every hero image PATCH answers 500.
    pub fail_hero_patches: bool,
    next_id: u64,
}

impl CatalogData {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

/// A running fake catalog API.
#[derive(Clone)]
pub struct FakeCatalog {
    addr: SocketAddr,
    data: Arc<Mutex<CatalogData>>,
}

impl FakeCatalog {
    /// Start an empty catalog.
    pub async fn start() -> Self {
        let data = Arc::new(Mutex::new(CatalogData {
            whatsapp: json!({}),
            ..CatalogData::default()
        }));
        let addr = serve(router(Arc::clone(&data))).await;
        Self { addr, data }
    }

    /// Base URL to hand to the apps as `CATALOG_API_URL`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Lock the catalog contents for seeding or inspection.
    pub fn data(&self) -> MutexGuard<'_, CatalogData> {
        self.data.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.data().requests.clone()
    }

    /// Requests received so far that start with `prefix`, e.g. `"DELETE "`.
    #[must_use]
    pub fn requests_matching(&self, prefix: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.starts_with(prefix))
            .collect()
    }

    pub fn clear_requests(&self) {
        self.data().requests.clear();
    }

    pub fn add_admin(&self, id: &str, name: &str, email: &str) {
        self.data().admins.push(json!({
            "id": id,
            "name": name,
            "email": email,
            "createdAt": "2024-01-15T09:30:00Z",
        }));
    }

    pub fn add_category(&self, id: &str, name: &str) {
        self.data().categories.push(json!({
            "id": id,
            "name": name,
            "description": format!("All {name}"),
        }));
    }

    /// Add `count` products named `"{prefix} 1"`, `"{prefix} 2"`, ... in
    /// `category_id`.
    pub fn add_products(&self, prefix: &str, category_id: &str, count: usize) {
        let mut data = self.data();
        let category = data
            .categories
            .iter()
            .find(|c| c["id"] == category_id)
            .map(|c| c["name"].clone())
            .unwrap_or_default();
        for n in 1..=count {
            let id = data.next_id("p");
            data.products.push(json!({
                "id": id,
                "name": format!("{prefix} {n}"),
                "description": format!("{prefix} number {n}"),
                "price": 10.5,
                "stock": 3,
                "categoryId": category_id,
                "category": category,
                "isFeatured": n == 1,
                "images": [],
                "colors": [],
            }));
        }
    }

    pub fn add_hero(&self, id: &str, order: i64, active: bool) {
        self.data().heroes.push(json!({
            "id": id,
            "imageUrl": format!("/uploads/{id}.jpg"),
            "headerText": format!("Hero {id}"),
            "headerColor": "#ffffff",
            "descriptionText": "",
            "descriptionColor": "#ffffff",
            "textBackgroundColor": "rgba(0,0,0,0.4)",
            "order": order,
            "isActive": active,
            "overlayEnabled": false,
            "overlayOpacity": 0.4,
        }));
    }

    pub fn set_whatsapp(&self, country_code: &str, phone_number: &str) {
        self.data().whatsapp = json!({
            "countryCode": country_code,
            "phoneNumber": phone_number,
        });
    }

    /// Hero ids sorted by their stored `order`.
    #[must_use]
    pub fn hero_ids_by_order(&self) -> Vec<String> {
        let mut heroes = self.data().heroes.clone();
        heroes.sort_by_key(|h| h["order"].as_i64().unwrap_or_default());
        heroes
            .iter()
            .filter_map(|h| h["id"].as_str().map(str::to_string))
            .collect()
    }

    /// The stored product named `name`.
    #[must_use]
    pub fn product_named(&self, name: &str) -> Option<Value> {
        self.data()
            .products
            .iter()
            .find(|p| p["name"] == name)
            .cloned()
    }
}

type Shared = Arc<Mutex<CatalogData>>;

fn lock(data: &Shared) -> MutexGuard<'_, CatalogData> {
    data.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn router(data: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/admin/{id}", get(get_admin))
        .route("/admins", get(list_admins))
        .route("/admins/{id}", axum::routing::delete(delete_admin))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/recent-products", get(recent_products))
        .route("/dashboard/featured-products", get(featured_products))
        .route("/settings/hero-images", get(list_heroes).post(create_hero))
        .route(
            "/settings/hero-images/{id}",
            axum::routing::patch(update_hero).delete(delete_hero),
        )
        .route("/settings/whatsapp", get(get_whatsapp).post(save_whatsapp))
        .route("/upload/single", post(upload_single))
        .route("/upload/multiple", post(upload_multiple))
        .route("/public/hero-images", get(public_heroes))
        .route("/public/featured-products", get(featured_products))
        .route("/public/categories", get(list_categories))
        .route("/public/products", get(public_products))
        .route("/public/products/{id}", get(get_product))
        .route("/public/whatsapp", get(get_whatsapp))
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&data),
            record_request,
        ))
        .with_state(data)
}

async fn record_request(State(data): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri());
    lock(&data).requests.push(line);
    next.run(request).await
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response()
}

fn find(items: &[Value], id: &str) -> Option<Value> {
    items.iter().find(|item| item["id"] == id).cloned()
}

/// Shallow-merge the fields of `patch` into `target`.
fn merge(target: &mut Value, patch: Value) {
    if let (Some(target), Value::Object(patch)) = (target.as_object_mut(), patch) {
        target.extend(patch);
    }
}

fn create_in(items: &mut Vec<Value>, id: String, body: Value) -> Value {
    let mut record = Value::Object(Map::new());
    merge(&mut record, body);
    record["id"] = Value::String(id);
    record["createdAt"] = json!("2024-06-01T12:00:00Z");
    items.push(record.clone());
    record
}

fn update_in(items: &mut [Value], id: &str, body: Value) -> Response {
    match items.iter_mut().find(|item| item["id"] == id) {
        Some(item) => {
            merge(item, body);
            Json(item.clone()).into_response()
        }
        None => not_found(),
    }
}

fn delete_in(items: &mut Vec<Value>, id: &str) -> StatusCode {
    let before = items.len();
    items.retain(|item| item["id"] != id);
    if items.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// ---- auth and admins ----

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    name: String,
    email: String,
    password: String,
}

async fn login(State(data): State<Shared>, Json(body): Json<Credentials>) -> Response {
    let data = lock(&data);
    let admin = data
        .admins
        .iter()
        .find(|a| a["email"].as_str().is_some_and(|e| e.eq_ignore_ascii_case(&body.email)));
    match admin {
        Some(admin) if body.password == PASSWORD => Json(admin.clone()).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response(),
    }
}

async fn register(State(data): State<Shared>, Json(body): Json<Credentials>) -> Response {
    let mut data = lock(&data);
    if data.admins.iter().any(|a| a["email"] == body.email.as_str()) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already registered" })),
        )
            .into_response();
    }
    let id = data.next_id("a");
    let admin = create_in(
        &mut data.admins,
        id,
        json!({ "name": body.name, "email": body.email }),
    );
    (StatusCode::CREATED, Json(admin)).into_response()
}

async fn get_admin(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    find(&lock(&data).admins, &id).map_or_else(not_found, |a| Json(a).into_response())
}

async fn list_admins(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(lock(&data).admins.clone())
}

async fn delete_admin(State(data): State<Shared>, Path(id): Path<String>) -> StatusCode {
    delete_in(&mut lock(&data).admins, &id)
}

// ---- categories ----

async fn list_categories(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(lock(&data).categories.clone())
}

async fn get_category(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    find(&lock(&data).categories, &id).map_or_else(not_found, |c| Json(c).into_response())
}

async fn create_category(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut data = lock(&data);
    let id = data.next_id("c");
    let category = create_in(&mut data.categories, id, body);
    (StatusCode::CREATED, Json(category)).into_response()
}

async fn update_category(
    State(data): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    update_in(&mut lock(&data).categories, &id, body)
}

async fn delete_category(State(data): State<Shared>, Path(id): Path<String>) -> StatusCode {
    delete_in(&mut lock(&data).categories, &id)
}

// ---- products ----

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductFilter {
    category_id: Option<String>,
    search: Option<String>,
    featured: Option<bool>,
    limit: Option<usize>,
}

fn filtered(products: &[Value], filter: &ProductFilter) -> Vec<Value> {
    let search = filter.search.as_deref().map(str::to_lowercase);
    products
        .iter()
        .filter(|p| {
            filter
                .category_id
                .as_deref()
                .is_none_or(|c| p["categoryId"] == c)
        })
        .filter(|p| filter.featured.is_none_or(|f| p["isFeatured"] == f))
        .filter(|p| {
            search.as_deref().is_none_or(|s| {
                p["name"]
                    .as_str()
                    .is_some_and(|n| n.to_lowercase().contains(s))
            })
        })
        .take(filter.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

async fn list_products(
    State(data): State<Shared>,
    Query(filter): Query<ProductFilter>,
) -> Json<Vec<Value>> {
    Json(filtered(&lock(&data).products, &filter))
}

async fn public_products(
    State(data): State<Shared>,
    Query(filter): Query<ProductFilter>,
) -> Json<Vec<Value>> {
    Json(filtered(&lock(&data).products, &filter))
}

async fn featured_products(
    State(data): State<Shared>,
    Query(filter): Query<ProductFilter>,
) -> Json<Vec<Value>> {
    let filter = ProductFilter {
        featured: Some(true),
        ..filter
    };
    Json(filtered(&lock(&data).products, &filter))
}

async fn recent_products(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(lock(&data).products.iter().rev().take(5).cloned().collect())
}

async fn get_product(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    find(&lock(&data).products, &id).map_or_else(not_found, |p| Json(p).into_response())
}

async fn create_product(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut data = lock(&data);
    let id = data.next_id("p");
    let product = create_in(&mut data.products, id, body);
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update_product(
    State(data): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    update_in(&mut lock(&data).products, &id, body)
}

async fn delete_product(State(data): State<Shared>, Path(id): Path<String>) -> StatusCode {
    delete_in(&mut lock(&data).products, &id)
}

async fn stats(State(data): State<Shared>) -> Json<Value> {
    let data = lock(&data);
    Json(json!({
        "totalProducts": data.products.len(),
        "totalCategories": data.categories.len(),
        "totalAdmins": data.admins.len(),
        "featuredProducts": data.products.iter().filter(|p| p["isFeatured"] == true).count(),
        "totalHeroImages": data.heroes.len(),
    }))
}

// ---- hero images and WhatsApp ----

async fn list_heroes(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(lock(&data).heroes.clone())
}

async fn public_heroes(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(
        lock(&data)
            .heroes
            .iter()
            .filter(|h| h["isActive"] == true)
            .cloned()
            .collect(),
    )
}

async fn create_hero(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut data = lock(&data);
    let id = data.next_id("h");
    let hero = create_in(&mut data.heroes, id, body);
    (StatusCode::CREATED, Json(hero)).into_response()
}

async fn update_hero(
    State(data): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = lock(&data);
    if data.fail_hero_patches {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "database unavailable" })),
        )
            .into_response();
    }
    update_in(&mut data.heroes, &id, body)
}

async fn delete_hero(State(data): State<Shared>, Path(id): Path<String>) -> StatusCode {
    delete_in(&mut lock(&data).heroes, &id)
}

async fn get_whatsapp(State(data): State<Shared>) -> Json<Value> {
    Json(lock(&data).whatsapp.clone())
}

async fn save_whatsapp(State(data): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut data = lock(&data);
    data.whatsapp = body;
    Json(data.whatsapp.clone())
}

// ---- uploads ----

async fn read_uploads(mut multipart: Multipart) -> Vec<Value> {
    let mut files = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        files.push(json!({
            "url": format!("/uploads/{name}"),
            "name": name,
            "size": size,
            "type": content_type,
        }));
    }
    files
}

async fn upload_single(multipart: Multipart) -> Response {
    read_uploads(multipart)
        .await
        .into_iter()
        .next()
        .map_or_else(
            || (StatusCode::BAD_REQUEST, Json(json!({ "message": "No file" }))).into_response(),
            |file| Json(file).into_response(),
        )
}

async fn upload_multiple(multipart: Multipart) -> Json<Vec<Value>> {
    Json(read_uploads(multipart).await)
}

// =============================================================================
// Apps under test
// =============================================================================

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server");
    });
    addr
}

/// Start the storefront against `catalog` and return its base URL.
pub async fn spawn_storefront(catalog: &FakeCatalog) -> String {
    use vitrine_storefront::config::StorefrontConfig;

    let api_url = catalog.url();
    let config = StorefrontConfig::from_lookup(|key| {
        (key == "CATALOG_API_URL").then(|| api_url.clone())
    })
    .expect("storefront config");
    let state = vitrine_storefront::state::AppState::new(config).expect("storefront state");
    let addr = serve(vitrine_storefront::app(state)).await;
    format!("http://{addr}")
}

/// Start the admin panel against `catalog` with in-memory sessions and
/// return its base URL.
pub async fn spawn_admin(catalog: &FakeCatalog) -> String {
    use vitrine_admin::config::AdminConfig;
    use vitrine_admin::middleware::create_session_layer;

    let api_url = catalog.url();
    let config = AdminConfig::from_lookup(|key| match key {
        "CATALOG_API_URL" => Some(api_url.clone()),
        "STOREFRONT_URL" => Some("http://shop.example/".to_string()),
        _ => None,
    })
    .expect("admin config");
    let session_layer = create_session_layer(tower_sessions::MemoryStore::default(), &config);
    let state = vitrine_admin::state::AppState::new(config).expect("admin state");
    let addr = serve(vitrine_admin::app(state, session_layer)).await;
    format!("http://{addr}")
}

/// An HTTP client that keeps cookies and does not follow redirects, so
/// tests can assert on `Location`.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("HTTP client")
}

/// Log `browser` in to the admin panel at `admin_url`.
pub async fn log_in(browser: &reqwest::Client, admin_url: &str, email: &str) -> reqwest::Response {
    browser
        .post(format!("{admin_url}/admin/login"))
        .form(&[("email", email), ("password", PASSWORD)])
        .send()
        .await
        .expect("login request")
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
