//! Hero image and WhatsApp settings endpoints.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;
use vitrine_core::HeroImageId;
use vitrine_core::models::{HeroImage, HeroImageInput, WhatsAppInput, WhatsAppSettings};

use crate::{ApiClient, ApiError};

/// `/settings/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Settings<'a> {
    client: &'a ApiClient,
}

impl<'a> Settings<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All hero images, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn hero_images(&self) -> Result<Vec<HeroImage>, ApiError> {
        self.client.get("/settings/hero-images").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    pub async fn create_hero_image(&self, input: &HeroImageInput) -> Result<HeroImage, ApiError> {
        self.client
            .send_json(Method::POST, "/settings/hero-images", input)
            .await
    }

    /// Update a hero image with either a full [`HeroImageInput`] or a sparse
    /// [`HeroImagePatch`](vitrine_core::models::HeroImagePatch).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    #[instrument(skip(self, body), fields(hero_id = %id))]
    pub async fn update_hero_image<B>(&self, id: &HeroImageId, body: &B) -> Result<HeroImage, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.client
            .send_json(Method::PATCH, &format!("/settings/hero-images/{id}"), body)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_hero_image(&self, id: &HeroImageId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/settings/hero-images/{id}"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn whatsapp(&self) -> Result<WhatsAppSettings, ApiError> {
        self.client.get("/settings/whatsapp").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the input.
    pub async fn update_whatsapp(&self, input: &WhatsAppInput) -> Result<WhatsAppSettings, ApiError> {
        self.client
            .send_json(Method::POST, "/settings/whatsapp", input)
            .await
    }
}
