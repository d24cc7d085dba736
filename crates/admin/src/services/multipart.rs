//! Multipart form reader.
//!
//! Forms with file inputs arrive as `multipart/form-data`. The whole form is
//! read into memory: text fields by name, files with their original name and
//! content type, ready to forward to the upload endpoint.

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use vitrine_client::FileUpload;

/// A fully read multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<FileUpload>>,
}

impl MultipartForm {
    /// Read every part of `multipart`.
    ///
    /// File inputs left empty by the browser (no file name, no bytes) are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid multipart data.
    pub async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                if bytes.is_empty() {
                    continue;
                }
                form.files.entry(name).or_default().push(FileUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await?;
                form.fields.entry(name).or_default().push(value);
            }
        }

        Ok(form)
    }

    /// First value of a text field, or `""` when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map_or("", String::as_str)
    }

    /// Whether a checkbox named `name` was ticked.
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        matches!(self.text(name), "on" | "true" | "1")
    }

    /// Every value submitted under `name`.
    #[must_use]
    pub fn all(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Take all files submitted under `name`.
    pub fn take_files(&mut self, name: &str) -> Vec<FileUpload> {
        self.files.remove(name).unwrap_or_default()
    }

    /// Take the first file submitted under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<FileUpload> {
        self.take_files(name).into_iter().next()
    }

    /// Build a form from text fields, for tests.
    #[cfg(test)]
    #[must_use]
    pub fn from_fields(fields: &[(&str, &str)]) -> Self {
        let mut form = Self::default();
        for (name, value) in fields {
            form.fields
                .entry((*name).to_string())
                .or_default()
                .push((*value).to_string());
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_checkbox() {
        let form = MultipartForm::from_fields(&[("name", "Lamp"), ("is_featured", "on")]);
        assert_eq!(form.text("name"), "Lamp");
        assert_eq!(form.text("missing"), "");
        assert!(form.checked("is_featured"));
        assert!(!form.checked("name"));
    }

    #[test]
    fn test_repeated_fields() {
        let form = MultipartForm::from_fields(&[("color", "a"), ("color", "b")]);
        assert_eq!(form.all("color"), ["a", "b"]);
        assert!(form.all("other").is_empty());
    }
}
