//! Multipart upload endpoints.

use reqwest::multipart::{Form, Part};
use tracing::instrument;
use vitrine_core::models::UploadedFile;

use crate::{ApiClient, ApiError};

/// A file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    fn into_part(self) -> Result<Part, ApiError> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.content_type {
            Some(content_type) => Ok(part.mime_str(&content_type)?),
            None => Ok(part),
        }
    }
}

/// `/upload/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Uploads<'a> {
    client: &'a ApiClient,
}

impl<'a> Uploads<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Upload one file as the `file` field.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type is invalid or the request fails.
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn single(&self, file: FileUpload) -> Result<UploadedFile, ApiError> {
        let form = Form::new().part("file", file.into_part()?);
        self.client.send_multipart("/upload/single", form).await
    }

    /// Upload several files as repeated `files` fields.
    ///
    /// # Errors
    ///
    /// Returns an error if a content type is invalid or the request fails.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn multiple(&self, files: Vec<FileUpload>) -> Result<Vec<UploadedFile>, ApiError> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file.into_part()?);
        }
        self.client.send_multipart("/upload/multiple", form).await
    }
}
