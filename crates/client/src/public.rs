//! Public endpoints used by the storefront.

use serde::Serialize;
use tracing::instrument;
use vitrine_core::models::{Category, HeroImage, Product, WhatsAppSettings};
use vitrine_core::{CategoryId, ProductId};

use crate::{ApiClient, ApiError};

/// Filters for the public product list. Unset fields are left out of the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Serialize)]
struct LimitQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

/// `/public/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Public<'a> {
    client: &'a ApiClient,
}

impl<'a> Public<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Active hero images.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn hero_images(&self) -> Result<Vec<HeroImage>, ApiError> {
        self.client.get("/public/hero-images").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self, limit: Option<u32>) -> Result<Vec<Product>, ApiError> {
        self.client
            .get_with_query("/public/featured-products", &LimitQuery { limit })
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("/public/categories").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &PublicProductQuery) -> Result<Vec<Product>, ApiError> {
        self.client.get_with_query("/public/products", query).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails; a missing product is a 404
    /// [`ApiError::Server`].
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.client.get(&format!("/public/products/{id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn whatsapp(&self) -> Result<WhatsAppSettings, ApiError> {
        self.client.get("/public/whatsapp").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_query_serialization() {
        let query = PublicProductQuery {
            category_id: None,
            search: Some("lamp".to_string()),
            limit: Some(24),
        };
        let value = serde_json::to_value(&query).unwrap_or_default();
        assert_eq!(value, serde_json::json!({ "search": "lamp", "limit": 24 }));
    }

    #[test]
    fn test_limit_query_empty_when_unset() {
        let value = serde_json::to_value(LimitQuery { limit: None }).unwrap_or_default();
        assert_eq!(value, serde_json::json!({}));
    }
}
