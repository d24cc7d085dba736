//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;
use vitrine_core::carousel::HeroRotation;
use vitrine_core::models::{HeroImage, WhatsAppSettings};
use vitrine_core::reorder::sort_by_order;

use super::products::{
    CatalogFilter, CatalogQuery, CategoryChipView, ProductCardView, ProductGrid, category_chips, fetch_grid,
};
use crate::filters;
use crate::state::AppState;

/// Number of featured products shown above the catalog.
const FEATURED_LIMIT: u32 = 8;

/// Greeting for the floating WhatsApp button.
const GENERAL_INQUIRY: &str = "Hello! I'd like to ask about your products.";

// =============================================================================
// Hero carousel
// =============================================================================

/// A single slide in the hero carousel.
#[derive(Clone)]
pub struct HeroSlideView {
    pub image_url: String,
    pub header_text: String,
    pub header_style: String,
    pub description_text: String,
    pub description_style: String,
    pub text_background: String,
    pub overlay_opacity: String,
    pub link: Option<String>,
    pub active: bool,
    pub href: String,
    pub number: usize,
}

/// Hero carousel state for templates.
///
/// Controls are plain links so the carousel works without JavaScript; the
/// rotation script only runs when `autoplay_ms` is set.
#[derive(Clone)]
pub struct HeroView {
    pub slides: Vec<HeroSlideView>,
    pub has_controls: bool,
    pub previous_href: String,
    pub next_href: String,
    pub autoplay_ms: Option<u128>,
}

impl HeroView {
    /// Build the carousel from the public hero list, starting at `slide`.
    #[must_use]
    pub fn new(mut heroes: Vec<HeroImage>, filter: &CatalogFilter, slide: usize) -> Self {
        heroes.retain(|h| h.is_active);
        sort_by_order(&mut heroes);

        let rotation = HeroRotation::with_index(heroes.len(), slide);
        let slide_href = |index: usize| {
            let query = filter.query_string(filter.category.as_ref(), filter.expanded_limit());
            if query.is_empty() {
                format!("/?slide={index}")
            } else {
                format!("/?{query}&slide={index}")
            }
        };

        let slides = heroes
            .iter()
            .enumerate()
            .map(|(i, hero)| HeroSlideView {
                image_url: hero.image_url.clone(),
                header_text: hero.header_text.clone(),
                header_style: format!("color: {}", hero.header_color),
                description_text: hero.description_text.clone(),
                description_style: format!("color: {}", hero.description_color),
                text_background: format!("background: {}", hero.text_background_color),
                overlay_opacity: format!("opacity: {}", hero.effective_overlay()),
                link: hero.link.clone(),
                active: i == rotation.index(),
                href: slide_href(i),
                number: i + 1,
            })
            .collect();

        Self {
            slides,
            has_controls: rotation.has_controls(),
            previous_href: slide_href(rotation.previous_index()),
            next_href: slide_href(rotation.next_index()),
            autoplay_ms: rotation.timer_interval().map(|d| d.as_millis()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

// =============================================================================
// Page
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub hero: HeroView,
    pub featured: Vec<ProductCardView>,
    pub categories: Vec<CategoryChipView>,
    pub search: String,
    pub selected_category: String,
    pub grid: ProductGrid,
    pub whatsapp_href: Option<String>,
}

/// Display the home page.
///
/// Every section is fetched concurrently; a failed read renders that section
/// empty.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let filter = CatalogFilter::from_query(&query);
    let slide = query
        .slide
        .as_deref()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let api = state.api().public();

    let (heroes, featured, categories, grid, whatsapp) = tokio::join!(
        api.hero_images(),
        api.featured_products(Some(FEATURED_LIMIT)),
        api.categories(),
        fetch_grid(&state, &filter),
        api.whatsapp(),
    );

    let heroes = heroes.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch hero images: {e}");
        Vec::new()
    });
    let featured = featured.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch featured products: {e}");
        Vec::new()
    });
    let categories = categories.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch categories: {e}");
        Vec::new()
    });
    let whatsapp = whatsapp.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch WhatsApp settings: {e}");
        WhatsAppSettings::default()
    });

    HomeTemplate {
        hero: HeroView::new(heroes, &filter, slide),
        featured: featured.iter().map(ProductCardView::from).collect(),
        categories: category_chips(&categories, &filter),
        search: filter.search.clone().unwrap_or_default(),
        selected_category: filter.category_value().to_string(),
        grid,
        whatsapp_href: whatsapp.chat_link(GENERAL_INQUIRY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero(id: &str, order: i64, active: bool) -> HeroImage {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "imageUrl": format!("/{id}.jpg"),
            "order": order,
            "isActive": active,
            "overlayEnabled": false,
        }))
        .unwrap_or_else(|e| panic!("{e}"))
    }

    fn filter(category: Option<&str>) -> CatalogFilter {
        CatalogFilter::from_query(&CatalogQuery {
            category: category.map(str::to_string),
            ..CatalogQuery::default()
        })
    }

    #[test]
    fn test_hero_sorted_and_inactive_dropped() {
        let view = HeroView::new(
            vec![hero("c", 3, true), hero("a", 1, true), hero("x", 2, false)],
            &filter(None),
            0,
        );
        let urls: Vec<&str> = view.slides.iter().map(|s| s.image_url.as_str()).collect();
        assert_eq!(urls, ["/a.jpg", "/c.jpg"]);
        assert!(view.slides[0].active);
        assert_eq!(view.slides[0].overlay_opacity, "opacity: 0");
        assert_eq!(view.autoplay_ms, Some(5000));
    }

    #[test]
    fn test_hero_controls_wrap_and_keep_filter() {
        let view = HeroView::new(
            vec![hero("a", 1, true), hero("b", 2, true), hero("c", 3, true)],
            &filter(Some("c1")),
            0,
        );
        assert_eq!(view.previous_href, "/?category=c1&slide=2");
        assert_eq!(view.next_href, "/?category=c1&slide=1");
    }

    #[test]
    fn test_hero_controls_keep_expanded_grid() {
        let expanded = CatalogFilter::from_query(&CatalogQuery {
            q: Some("lamp".to_string()),
            limit: Some("36".to_string()),
            ..CatalogQuery::default()
        });
        let view = HeroView::new(vec![hero("a", 1, true), hero("b", 2, true)], &expanded, 0);
        assert_eq!(view.next_href, "/?q=lamp&limit=36&slide=1");
        assert_eq!(view.slides[0].href, "/?q=lamp&limit=36&slide=0");
    }

    #[test]
    fn test_single_hero_has_no_timer_or_controls() {
        let view = HeroView::new(vec![hero("a", 1, true)], &filter(None), 4);
        assert!(!view.has_controls);
        assert!(view.autoplay_ms.is_none());
        assert!(view.slides[0].active);

        assert!(HeroView::new(Vec::new(), &filter(None), 0).is_empty());
    }

}
