//! Category and product endpoints.

use reqwest::Method;
use serde::Serialize;
use vitrine_core::models::{Category, CategoryInput, Product, ProductInput};
use vitrine_core::{CategoryId, ProductId};

use crate::{ApiClient, ApiError};

/// `/categories` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Categories<'a> {
    client: &'a ApiClient,
}

impl<'a> Categories<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("/categories").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails; a missing category is a 404
    /// [`ApiError::Server`].
    pub async fn get(&self, id: &CategoryId) -> Result<Category, ApiError> {
        self.client.get(&format!("/categories/{id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    pub async fn create(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        self.client
            .send_json(Method::POST, "/categories", input)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    pub async fn update(
        &self,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        self.client
            .send_json(Method::PATCH, &format!("/categories/{id}"), input)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: &CategoryId) -> Result<(), ApiError> {
        self.client.delete(&format!("/categories/{id}")).await
    }
}

/// Filters for the admin product list. Unset fields are left out of the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// `/products` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a ApiClient,
}

impl<'a> Products<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        self.client.get_with_query("/products", query).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails; a missing product is a 404
    /// [`ApiError::Server`].
    pub async fn get(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.client.get(&format!("/products/{id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, ApiError> {
        self.client.send_json(Method::POST, "/products", input).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    pub async fn update(&self, id: &ProductId, input: &ProductInput) -> Result<Product, ApiError> {
        self.client
            .send_json(Method::PATCH, &format!("/products/{id}"), input)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        self.client.delete(&format!("/products/{id}")).await
    }
}
