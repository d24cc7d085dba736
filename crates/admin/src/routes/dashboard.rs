//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tracing::instrument;
use vitrine_core::models::{DashboardStats, Product};

use crate::{filters, middleware::RequireAdminAuth, state::AppState};

use super::products::ProductRowView;
use super::{AdminUserView, Notice, or_empty};

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub stats: DashboardStats,
    pub recent: Vec<ProductRowView>,
    pub featured: Vec<ProductRowView>,
    pub notice: Notice,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/dashboard", get(dashboard))
}

/// GET /admin/dashboard
///
/// Stats, recent products and featured products are fetched concurrently.
/// A failed read renders as zeros or an empty list.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
async fn dashboard(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> DashboardTemplate {
    let dashboard = state.api().dashboard();
    let (stats, recent, featured) = tokio::join!(
        dashboard.stats(),
        dashboard.recent_products(),
        dashboard.featured_products(),
    );

    let rows = |products: Vec<Product>| -> Vec<ProductRowView> {
        products.iter().map(ProductRowView::from).collect()
    };

    DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/admin/dashboard".to_string(),
        stats: or_empty(stats, "dashboard stats"),
        recent: rows(or_empty(recent, "recent products")),
        featured: rows(or_empty(featured, "featured products")),
        notice: Notice::default(),
    }
}
