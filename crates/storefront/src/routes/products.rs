//! Product grid and product detail handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;
use vitrine_client::PublicProductQuery;
use vitrine_core::models::{Category, Product, WhatsAppSettings};
use vitrine_core::pagination::{LoadMore, STOREFRONT_PAGE_SIZE};
use vitrine_core::{CategoryId, ProductId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

// =============================================================================
// Catalog filter (category, search text, load-more cursor)
// =============================================================================

/// Query parameters shared by the home page and the grid fragment.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub limit: Option<String>,
    pub slide: Option<String>,
}

/// The product grid's filter and how far it has been expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: Option<CategoryId>,
    pub search: Option<String>,
    pub cursor: LoadMore,
}

impl CatalogFilter {
    #[must_use]
    pub fn from_query(query: &CatalogQuery) -> Self {
        Self {
            category: non_empty(query.category.as_deref()).map(CategoryId::new),
            search: non_empty(query.q.as_deref()).map(str::to_string),
            cursor: LoadMore::from_query(STOREFRONT_PAGE_SIZE, query.limit.as_deref()),
        }
    }

    /// Request for the public products endpoint.
    #[must_use]
    pub fn api_query(&self) -> PublicProductQuery {
        PublicProductQuery {
            category_id: self.category.clone(),
            search: self.search.clone(),
            limit: Some(self.cursor.limit()),
        }
    }

    /// Query string for this filter, with an explicit `limit` only when
    /// given. Changing the category or search text never carries a limit.
    #[must_use]
    pub fn query_string(&self, category: Option<&CategoryId>, limit: Option<u32>) -> String {
        let mut pairs = Vec::new();
        if let Some(category) = category {
            pairs.push(format!("category={}", urlencoding::encode(category.as_str())));
        }
        if let Some(search) = &self.search {
            pairs.push(format!("q={}", urlencoding::encode(search)));
        }
        if let Some(limit) = limit {
            pairs.push(format!("limit={limit}"));
        }
        pairs.join("&")
    }

    /// The cursor's limit when the grid has been expanded past the first
    /// page, for links that should keep the grid as it is.
    #[must_use]
    pub fn expanded_limit(&self) -> Option<u32> {
        let limit = self.cursor.limit();
        (limit > self.cursor.base()).then_some(limit)
    }

    /// The selected category id, or `""` for all categories.
    #[must_use]
    pub fn category_value(&self) -> &str {
        self.category.as_ref().map_or("", CategoryId::as_str)
    }

    /// Link to the home page showing this filter at `limit`.
    #[must_use]
    pub fn page_href(&self, limit: Option<u32>) -> String {
        with_query("/", &self.query_string(self.category.as_ref(), limit))
    }

    /// Link to the grid fragment showing this filter at `limit`.
    #[must_use]
    pub fn partial_href(&self, limit: Option<u32>) -> String {
        with_query(
            "/partials/products",
            &self.query_string(self.category.as_ref(), limit),
        )
    }

    /// Link that switches to `category` (or all categories), dropping the
    /// cursor.
    #[must_use]
    pub fn category_href(&self, category: Option<&CategoryId>) -> String {
        with_query("/", &self.query_string(category, None))
    }

    /// Grid fragment counterpart of [`Self::category_href`].
    #[must_use]
    pub fn category_partial_href(&self, category: Option<&CategoryId>) -> String {
        with_query("/partials/products", &self.query_string(category, None))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

// =============================================================================
// Categories strip
// =============================================================================

/// A chip in the category strip.
///
/// Rendered on the home page and again out of band with every grid fragment,
/// so its links always carry the current search text.
#[derive(Clone)]
pub struct CategoryChipView {
    pub name: String,
    pub icon_url: Option<String>,
    pub href: String,
    pub partial_href: String,
    pub selected: bool,
}

#[must_use]
pub fn category_chips(categories: &[Category], filter: &CatalogFilter) -> Vec<CategoryChipView> {
    let mut chips = vec![CategoryChipView {
        name: "All".to_string(),
        icon_url: None,
        href: filter.category_href(None),
        partial_href: filter.category_partial_href(None),
        selected: filter.category.is_none(),
    }];
    chips.extend(categories.iter().map(|c| CategoryChipView {
        name: c.name.clone(),
        icon_url: c.icon_url.clone(),
        href: filter.category_href(Some(&c.id)),
        partial_href: filter.category_partial_href(Some(&c.id)),
        selected: filter.category.as_ref() == Some(&c.id),
    }));
    chips
}

// =============================================================================
// Views
// =============================================================================

/// Product card data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub href: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image: Option<String>,
    pub is_featured: bool,
    pub out_of_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            href: format!("/product/{}", urlencoding::encode(product.id.as_str())),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            image: product.main_image_src().map(str::to_string),
            is_featured: product.is_featured,
            out_of_stock: product.is_out_of_stock(),
        }
    }
}

/// "Load more" control targets.
#[derive(Clone)]
pub struct LoadMoreLink {
    pub page_href: String,
    pub partial_href: String,
}

/// The product grid with its load-more control.
#[derive(Clone)]
pub struct ProductGrid {
    pub products: Vec<ProductCardView>,
    pub load_more: Option<LoadMoreLink>,
    pub filtered: bool,
}

impl ProductGrid {
    /// Build the grid from a fetched list, clamped to the cursor's limit.
    #[must_use]
    pub fn new(filter: &CatalogFilter, products: Vec<Product>) -> Self {
        let (products, has_more) = filter.cursor.clamp(products);
        let next = filter.cursor.next_limit();
        Self {
            products: products.iter().map(ProductCardView::from).collect(),
            load_more: has_more.then(|| LoadMoreLink {
                page_href: filter.page_href(Some(next)),
                partial_href: filter.partial_href(Some(next)),
            }),
            filtered: filter.category.is_some() || filter.search.is_some(),
        }
    }
}

/// Fetch the grid for `filter`. A failed read renders an empty grid.
pub async fn fetch_grid(state: &AppState, filter: &CatalogFilter) -> ProductGrid {
    let products = state
        .api()
        .public()
        .products(&filter.api_query())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to fetch products: {e}");
            Vec::new()
        });
    ProductGrid::new(filter, products)
}

/// Product grid fragment template (HTMX).
///
/// Besides the grid, it swaps the category strip and the search form's
/// hidden category field out of band, so the next request combines both
/// filters.
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog_update.html")]
pub struct ProductGridTemplate {
    pub grid: ProductGrid,
    pub selected_category: String,
    /// `None` when categories could not be fetched; the strip is then left
    /// as it is.
    pub categories: Option<Vec<CategoryChipView>>,
}

/// Display the product grid fragment.
///
/// Used by the search box, the category strip, and the load-more control.
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let filter = CatalogFilter::from_query(&query);
    let api = state.api().public();
    let (grid, categories) = tokio::join!(fetch_grid(&state, &filter), api.categories());
    let categories = categories
        .inspect_err(|e| tracing::error!("Failed to fetch categories: {e}"))
        .ok();

    ProductGridTemplate {
        grid,
        selected_category: filter.category_value().to_string(),
        categories: categories.map(|c| category_chips(&c, &filter)),
    }
}

// =============================================================================
// Product detail
// =============================================================================

/// Greeting for the WhatsApp button on a product page.
fn product_inquiry(product: &Product) -> String {
    format!(
        "Hello, I'm interested in the product: {}\nPrice: ${}\n\nCould I get more information?",
        product.name,
        product.price.plain()
    )
}

/// Gallery thumbnail data for templates.
#[derive(Clone)]
pub struct GalleryImageView {
    pub src: String,
    pub href: String,
    pub number: usize,
    pub active: bool,
}

/// Product detail data for templates.
pub struct ProductDetailView {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub stock: i64,
    pub out_of_stock: bool,
    pub colors: Vec<(String, String)>,
    pub gallery: Vec<GalleryImageView>,
    pub selected_image: Option<String>,
    pub dimensions: Vec<(&'static str, String)>,
    pub weight: Option<String>,
    pub whatsapp_href: Option<String>,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(product: &Product, whatsapp: Option<&WhatsAppSettings>, image: usize) -> Self {
        let sources: Vec<&str> = product.images.iter().filter_map(|i| i.src()).collect();
        let selected = if image < sources.len() { image } else { 0 };
        let base = format!("/product/{}", urlencoding::encode(product.id.as_str()));

        let gallery = sources
            .iter()
            .enumerate()
            .map(|(i, src)| GalleryImageView {
                src: (*src).to_string(),
                href: format!("{base}?image={i}"),
                number: i + 1,
                active: i == selected,
            })
            .collect();

        let mut dimensions = Vec::new();
        if let Some(d) = product.dimensions {
            for (label, value) in [("Length", d.length), ("Width", d.width), ("Height", d.height)] {
                if let Some(value) = value {
                    dimensions.push((label, value.to_string()));
                }
            }
        }

        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            stock: product.stock,
            out_of_stock: product.is_out_of_stock(),
            colors: product
                .colors
                .iter()
                .map(|c| (c.name.clone(), c.value.clone()))
                .collect(),
            gallery,
            selected_image: sources.get(selected).map(|s| (*s).to_string()),
            dimensions,
            weight: product.weight.map(|w| w.to_string()),
            whatsapp_href: whatsapp.and_then(|w| w.chat_link(&product_inquiry(product))),
        }
    }
}

/// Query parameters for the product detail page.
#[derive(Debug, Default, Deserialize)]
pub struct ShowQuery {
    pub image: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
}

/// Display product detail page.
#[instrument(skip(state, query), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ShowQuery>,
) -> Result<impl IntoResponse> {
    let id = ProductId::new(id);
    let api = state.api().public();

    let (product, whatsapp) = tokio::join!(api.product(&id), api.whatsapp());

    let product = product.map_err(|e| AppError::from_api(e, "Product"))?;
    let whatsapp = whatsapp
        .inspect_err(|e| tracing::error!("Failed to fetch WhatsApp settings: {e}"))
        .ok();

    let image = query
        .image
        .as_deref()
        .and_then(|i| i.trim().parse().ok())
        .unwrap_or(0);

    Ok(ProductShowTemplate {
        product: ProductDetailView::new(&product, whatsapp.as_ref(), image),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(json: &str) -> Product {
        serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"))
    }

    fn products(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| product(&format!(r#"{{"id":"p{i}","name":"P{i}","price":1}}"#)))
            .collect()
    }

    fn filter(category: Option<&str>, q: Option<&str>, limit: Option<&str>) -> CatalogFilter {
        CatalogFilter::from_query(&CatalogQuery {
            category: category.map(str::to_string),
            q: q.map(str::to_string),
            limit: limit.map(str::to_string),
            slide: None,
        })
    }

    #[test]
    fn test_filter_normalizes_query() {
        let f = filter(Some(" "), Some("  "), Some("junk"));
        assert!(f.category.is_none());
        assert!(f.search.is_none());
        assert_eq!(f.cursor.limit(), 12);
        assert_eq!(f.page_href(None), "/");
    }

    #[test]
    fn test_category_change_drops_limit() {
        let f = filter(Some("c1"), Some("lamp shade"), Some("36"));
        assert_eq!(f.cursor.limit(), 36);
        assert_eq!(
            f.category_href(Some(&CategoryId::new("c2"))),
            "/?category=c2&q=lamp%20shade"
        );
        assert_eq!(f.category_href(None), "/?q=lamp%20shade");
    }

    #[test]
    fn test_category_chips_mark_selection() {
        let categories: Vec<Category> = serde_json::from_value(serde_json::json!([
            {"id": "c1", "name": "Lamps"},
            {"id": "c2", "name": "Rugs", "iconUrl": "/rug.png"}
        ]))
        .unwrap_or_else(|e| panic!("{e}"));

        let chips = category_chips(&categories, &filter(Some("c2"), None, None));
        assert_eq!(chips.len(), 3);
        assert!(!chips[0].selected);
        assert_eq!(chips[0].href, "/");
        assert_eq!(chips[1].partial_href, "/partials/products?category=c1");
        assert!(chips[2].selected);
        assert_eq!(chips[2].icon_url.as_deref(), Some("/rug.png"));
    }

    #[test]
    fn test_chips_carry_search_text() {
        let categories: Vec<Category> =
            serde_json::from_value(serde_json::json!([{"id": "c1", "name": "Lamps"}]))
                .unwrap_or_else(|e| panic!("{e}"));
        let f = filter(None, Some("rug"), Some("24"));
        let chips = category_chips(&categories, &f);
        assert_eq!(chips[1].partial_href, "/partials/products?category=c1&q=rug");
        assert_eq!(f.expanded_limit(), Some(24));
        assert_eq!(filter(None, None, None).expanded_limit(), None);
        assert_eq!(f.category_value(), "");
    }

    #[test]
    fn test_grid_load_more_only_on_full_page() {
        let f = filter(None, None, None);
        let grid = ProductGrid::new(&f, products(12));
        let link = grid.load_more.as_ref().map(|l| l.partial_href.as_str());
        assert_eq!(link, Some("/partials/products?limit=24"));

        let grid = ProductGrid::new(&f, products(7));
        assert!(grid.load_more.is_none());
        assert_eq!(grid.products.len(), 7);
    }

    #[test]
    fn test_grid_clamps_oversized_response() {
        let f = filter(Some("c1"), None, Some("12"));
        let grid = ProductGrid::new(&f, products(20));
        assert_eq!(grid.products.len(), 12);
        assert!(grid.filtered);
        assert_eq!(
            grid.load_more.map(|l| l.page_href),
            Some("/?category=c1&limit=24".to_string())
        );
    }

    #[test]
    fn test_detail_view_image_selection_and_whatsapp() {
        let p = product(
            r#"{
                "id": "p1",
                "name": "Lamp",
                "price": 19.5,
                "images": [{"id": "a", "url": "/a.png"}, {"id": "b", "url": "/b.png"}],
                "dimensions": {"length": 10, "height": 2.5}
            }"#,
        );
        let whatsapp = WhatsAppSettings {
            country_code: "+961".to_string(),
            phone_number: "3 123 456".to_string(),
        };

        let view = ProductDetailView::new(&p, Some(&whatsapp), 1);
        assert_eq!(view.selected_image.as_deref(), Some("/b.png"));
        assert!(view.gallery[1].active);
        assert_eq!(view.dimensions.len(), 2);
        let href = view.whatsapp_href.unwrap_or_default();
        assert!(href.starts_with("https://wa.me/9613123456?text="));
        assert!(href.contains("Lamp"));
        assert!(href.contains("19.5"));

        let view = ProductDetailView::new(&p, None, 9);
        assert_eq!(view.selected_image.as_deref(), Some("/a.png"));
        assert!(view.whatsapp_href.is_none());
    }
}
