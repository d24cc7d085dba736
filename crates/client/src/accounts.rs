//! Authentication and admin account endpoints.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;
use vitrine_core::AdminId;
use vitrine_core::models::Admin;

use crate::{ApiClient, ApiError};

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// `/auth/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
    client: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Check credentials and return the admin they belong to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Server`] with the API's message for bad
    /// credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Admin, ApiError> {
        self.client
            .send_json(Method::POST, "/auth/login", &LoginBody { email, password })
            .await
    }

    /// Create an admin account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Server`] when the API rejects the registration,
    /// e.g. for an email that is already taken.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Admin, ApiError> {
        self.client
            .send_json(
                Method::POST,
                "/auth/register",
                &RegisterBody {
                    name,
                    email,
                    password,
                },
            )
            .await
    }

    /// Fetch one admin by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn admin(&self, id: &AdminId) -> Result<Admin, ApiError> {
        self.client.get(&format!("/auth/admin/{id}")).await
    }
}

/// `/admins` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Admins<'a> {
    client: &'a ApiClient,
}

impl<'a> Admins<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<Admin>, ApiError> {
        self.client.get("/admins").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: &AdminId) -> Result<(), ApiError> {
        self.client.delete(&format!("/admins/{id}")).await
    }
}
