use vitrine_core::models::{DashboardStats, Product};

use crate::{ApiClient, ApiError};

/// `/dashboard/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    client: &'a ApiClient,
}

impl<'a> Dashboard<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.client.get("/dashboard/stats").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn recent_products(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("/dashboard/recent-products").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn featured_products(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("/dashboard/featured-products").await
    }
}
