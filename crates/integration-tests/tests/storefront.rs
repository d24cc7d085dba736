//! End-to-end tests for the storefront against a fake catalog API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::json;
use vitrine_integration_tests::{FakeCatalog, browser, location, spawn_storefront};

async fn get_html(url: &str) -> String {
    let response = browser().get(url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "GET {url}");
    response.text().await.unwrap()
}

fn card_count(html: &str) -> usize {
    html.matches("class=\"product-card\"").count()
}

async fn catalog_with_products(count: usize) -> FakeCatalog {
    let catalog = FakeCatalog::start().await;
    catalog.add_category("c1", "Lamps");
    catalog.add_category("c2", "Rugs");
    catalog.add_products("Lamp", "c1", count);
    catalog
}

// ============================================================================
// Load more
// ============================================================================

#[tokio::test]
async fn test_load_more_grows_by_page_size() {
    let catalog = catalog_with_products(30).await;
    let shop = spawn_storefront(&catalog).await;

    let first = get_html(&format!("{shop}/partials/products")).await;
    assert_eq!(card_count(&first), 12);
    assert!(first.contains("/partials/products?limit=24"));

    let second = get_html(&format!("{shop}/partials/products?limit=24")).await;
    assert_eq!(card_count(&second), 24);
    assert!(second.contains("/partials/products?limit=36"));

    let last = get_html(&format!("{shop}/partials/products?limit=36")).await;
    assert_eq!(card_count(&last), 30);
    assert!(!last.contains("Load more"));

    let requested = catalog.requests_matching("GET /public/products");
    assert_eq!(
        requested,
        [
            "GET /public/products?limit=12",
            "GET /public/products?limit=24",
            "GET /public/products?limit=36",
        ]
    );
}

#[tokio::test]
async fn test_exact_page_still_offers_load_more() {
    let catalog = catalog_with_products(12).await;
    let shop = spawn_storefront(&catalog).await;

    let html = get_html(&format!("{shop}/partials/products")).await;
    assert_eq!(card_count(&html), 12);
    assert!(html.contains("Load more"));
}

#[tokio::test]
async fn test_home_page_grid_and_featured() {
    let catalog = catalog_with_products(5).await;
    let shop = spawn_storefront(&catalog).await;

    let html = get_html(&format!("{shop}/")).await;
    assert!(html.contains("id=\"product-grid\""));
    assert!(html.contains("Lamp 5"));
    assert!(!html.contains("Load more"));
    assert!(
        catalog
            .requests()
            .iter()
            .any(|r| r.starts_with("GET /public/featured-products"))
    );
}

// ============================================================================
// Filters reset the cursor
// ============================================================================

#[tokio::test]
async fn test_category_and_search_links_drop_limit() {
    let catalog = catalog_with_products(40).await;
    let shop = spawn_storefront(&catalog).await;

    let html = get_html(&format!("{shop}/?category=c1&q=Lamp&limit=36")).await;

    // The grid is expanded...
    assert!(
        catalog
            .requests()
            .contains(&"GET /public/products?categoryId=c1&search=Lamp&limit=36".to_string())
    );
    // ...but switching category starts over at the first page.
    assert!(html.contains("href=\"/?category=c2&#38;q=Lamp\""));
    assert!(html.contains("href=\"/?q=Lamp\""));
}

#[tokio::test]
async fn test_grid_fragment_refreshes_filter_controls() {
    let catalog = catalog_with_products(3).await;
    let shop = spawn_storefront(&catalog).await;

    // After picking a category, the search form must keep sending it.
    let html = get_html(&format!("{shop}/partials/products?category=c1")).await;
    assert!(html.contains(
        "id=\"catalog-category\" name=\"category\" value=\"c1\" hx-swap-oob=\"true\""
    ));
    assert!(html.contains("id=\"category-strip\""));

    // After searching, the chips must keep the search text.
    let html = get_html(&format!("{shop}/partials/products?category=c1&q=Lamp")).await;
    assert!(html.contains("hx-get=\"/partials/products?category=c2&#38;q=Lamp\""));
    assert!(html.contains("class=\"category-chip is-selected\""));

    // Back to all categories clears the hidden field.
    let html = get_html(&format!("{shop}/partials/products?q=Lamp")).await;
    assert!(html.contains("name=\"category\" value=\"\" hx-swap-oob=\"true\""));
}

#[tokio::test]
async fn test_search_narrows_grid() {
    let catalog = catalog_with_products(3).await;
    catalog.add_products("Rug", "c2", 2);
    let shop = spawn_storefront(&catalog).await;

    let html = get_html(&format!("{shop}/partials/products?q=rug")).await;
    assert_eq!(card_count(&html), 2);

    let empty = get_html(&format!("{shop}/partials/products?q=sofa")).await;
    assert!(empty.contains("No products match your search."));
}

// ============================================================================
// Hero carousel
// ============================================================================

#[tokio::test]
async fn test_hero_slides_follow_order_and_skip_inactive() {
    let catalog = FakeCatalog::start().await;
    catalog.add_hero("h1", 2, true);
    catalog.add_hero("h2", 1, true);
    catalog.add_hero("h3", 0, false);
    let shop = spawn_storefront(&catalog).await;

    let html = get_html(&format!("{shop}/")).await;
    let first = html.find("/uploads/h2.jpg").unwrap();
    let second = html.find("/uploads/h1.jpg").unwrap();
    assert!(first < second);
    assert!(!html.contains("/uploads/h3.jpg"));
}

// ============================================================================
// Product detail
// ============================================================================

#[tokio::test]
async fn test_product_page_uses_main_image_and_whatsapp() {
    let catalog = FakeCatalog::start().await;
    catalog.set_whatsapp("+961", "70 123 456");
    catalog.data().products.push(json!({
        "id": "p1",
        "name": "Brass Lamp",
        "price": 120,
        "stock": 0,
        "images": [
            { "id": "i1", "url": "/uploads/side.jpg" },
            { "id": "i2", "url": "/uploads/front.jpg" }
        ],
        "mainImageId": "i2",
    }));
    let shop = spawn_storefront(&catalog).await;

    let grid = get_html(&format!("{shop}/partials/products")).await;
    assert!(grid.contains("src=\"/uploads/front.jpg\""));
    assert!(grid.contains("Out of stock"));

    let page = get_html(&format!("{shop}/product/p1")).await;
    assert!(page.contains("Brass Lamp"));
    assert!(page.contains("https://wa.me/96170123456?text="));
    assert!(page.contains("class=\"gallery-main\""));
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let catalog = FakeCatalog::start().await;
    let shop = spawn_storefront(&catalog).await;

    let response = browser()
        .get(format!("{shop}/product/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_path_redirects_home() {
    let catalog = FakeCatalog::start().await;
    let shop = spawn_storefront(&catalog).await;

    let response = browser()
        .get(format!("{shop}/wp-admin"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}
