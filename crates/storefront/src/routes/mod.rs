//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Home page (hero, featured, categories, grid)
//! GET  /product/{id}        - Product detail
//! GET  /partials/products   - Product grid fragment (HTMX)
//! GET  /health              - Health check
//! *                         - Redirect to /
//! ```

pub mod home;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the storefront page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/product/{id}", get(products::show))
        .route("/partials/products", get(products::grid))
}
