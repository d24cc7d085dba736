//! Product form draft.
//!
//! The admin product form round-trips its whole state on every action (add
//! a colour, upload images, pick the main image) until it is saved. The
//! draft is that state; [`ProductDraft::into_input`] turns it into the body
//! sent to the catalog API.

use uuid::Uuid;

use crate::guard::GuardViolation;
use crate::models::{Category, Dimensions, Product, ProductColor, ProductImage, ProductInput, UploadedFile};
use crate::types::{CategoryId, ImageId, Price};

/// Colour value used when the picker is left untouched.
pub const DEFAULT_COLOR_VALUE: &str = "#000000";

/// Everything the product form holds before it is submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: i64,
    pub category_id: Option<CategoryId>,
    pub is_featured: bool,
    pub colors: Vec<ProductColor>,
    pub images: Vec<ProductImage>,
    pub main_image_id: Option<ImageId>,
    pub dimensions: Dimensions,
    pub weight: Option<f64>,
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            category_id: product.category_id.clone(),
            is_featured: product.is_featured,
            colors: product.colors.clone(),
            images: product.images.clone(),
            main_image_id: product.main_image_id.clone(),
            dimensions: product.dimensions.unwrap_or_default(),
            weight: product.weight,
        }
    }
}

impl ProductDraft {
    /// Append a colour. Colours without a name are ignored.
    pub fn add_color(&mut self, name: &str, value: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let value = value.trim();
        self.colors.push(ProductColor {
            name: name.to_string(),
            value: if value.is_empty() {
                DEFAULT_COLOR_VALUE.to_string()
            } else {
                value.to_string()
            },
        });
        true
    }

    pub fn remove_color(&mut self, index: usize) {
        if index < self.colors.len() {
            self.colors.remove(index);
        }
    }

    /// Append freshly uploaded files as images with new ids.
    ///
    /// When the draft had no images the first upload becomes the main image.
    pub fn append_uploads(&mut self, uploads: Vec<UploadedFile>) {
        let was_empty = self.images.is_empty();
        let mut first_new = None;

        for (index, file) in uploads.into_iter().enumerate() {
            let id = ImageId::new(Uuid::new_v4().to_string());
            if index == 0 {
                first_new = Some(id.clone());
            }
            self.images.push(ProductImage {
                id,
                url: file.url,
                data: None,
                name: Some(file.name),
                size: Some(file.size),
                content_type: Some(file.content_type),
                is_main: was_empty && index == 0,
            });
        }

        if self.main_image_id.is_none() {
            self.main_image_id = first_new;
        }
    }

    /// Flag `id` as the only main image. Unknown ids are ignored.
    pub fn set_main_image(&mut self, id: &ImageId) {
        if !self.images.iter().any(|img| &img.id == id) {
            return;
        }
        for img in &mut self.images {
            img.is_main = &img.id == id;
        }
        self.main_image_id = Some(id.clone());
    }

    /// Remove an image. If it was the main one, the first remaining image
    /// takes over.
    pub fn remove_image(&mut self, id: &ImageId) {
        let was_main = self.main_image_id.as_ref() == Some(id)
            || self.images.iter().any(|img| &img.id == id && img.is_main);
        self.images.retain(|img| &img.id != id);

        if was_main {
            match self.images.first_mut() {
                Some(first) => {
                    first.is_main = true;
                    self.main_image_id = Some(first.id.clone());
                }
                None => self.main_image_id = None,
            }
        }
    }

    /// Build the request body, resolving the category name from `categories`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardViolation::MissingCategory`] when no category is
    /// selected, or [`GuardViolation::InvalidField`] when the name is empty.
    pub fn into_input(
        self,
        categories: &[Category],
        acting_email: &str,
    ) -> Result<ProductInput, GuardViolation> {
        let category_id = self
            .category_id
            .filter(|id| !id.as_str().trim().is_empty())
            .ok_or(GuardViolation::MissingCategory)?;

        if self.name.trim().is_empty() {
            return Err(GuardViolation::invalid("name", "name is required"));
        }

        let category = categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();

        Ok(ProductInput {
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            stock: self.stock,
            category_id,
            category,
            is_featured: self.is_featured,
            colors: self.colors,
            images: self.images,
            main_image_id: self.main_image_id,
            dimensions: self.dimensions,
            weight: self.weight,
            created_by: acting_email.to_string(),
            updated_by: acting_email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(url: &str) -> UploadedFile {
        UploadedFile {
            url: url.to_string(),
            name: format!("{url}.png"),
            size: 10,
            content_type: "image/png".to_string(),
        }
    }

    fn category(id: &str, name: &str) -> Category {
        let json = format!(r#"{{"id":"{id}","name":"{name}"}}"#);
        serde_json::from_str(&json).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_first_upload_becomes_main_on_empty_draft() {
        let mut draft = ProductDraft::default();
        draft.append_uploads(vec![upload("a"), upload("b")]);

        assert_eq!(draft.images.len(), 2);
        assert!(draft.images[0].is_main);
        assert!(!draft.images[1].is_main);
        assert_eq!(draft.main_image_id.as_ref(), Some(&draft.images[0].id));
        assert_ne!(draft.images[0].id, draft.images[1].id);
    }

    #[test]
    fn test_later_uploads_keep_existing_main() {
        let mut draft = ProductDraft::default();
        draft.append_uploads(vec![upload("a")]);
        let main = draft.main_image_id.clone();
        draft.append_uploads(vec![upload("b")]);

        assert_eq!(draft.main_image_id, main);
        assert!(!draft.images[1].is_main);
    }

    #[test]
    fn test_set_main_image() {
        let mut draft = ProductDraft::default();
        draft.append_uploads(vec![upload("a"), upload("b")]);
        let second = draft.images[1].id.clone();
        draft.set_main_image(&second);

        assert!(!draft.images[0].is_main);
        assert!(draft.images[1].is_main);
        assert_eq!(draft.main_image_id, Some(second));

        draft.set_main_image(&ImageId::new("missing"));
        assert!(draft.images[1].is_main);
    }

    #[test]
    fn test_remove_main_image_promotes_first_remaining() {
        let mut draft = ProductDraft::default();
        draft.append_uploads(vec![upload("a"), upload("b"), upload("c")]);
        let first = draft.images[0].id.clone();
        draft.remove_image(&first);

        assert_eq!(draft.images.len(), 2);
        assert!(draft.images[0].is_main);
        assert_eq!(draft.images[0].url, "b");
        assert_eq!(draft.main_image_id.as_ref(), Some(&draft.images[0].id));
    }

    #[test]
    fn test_remove_last_image_clears_main() {
        let mut draft = ProductDraft::default();
        draft.append_uploads(vec![upload("a")]);
        let only = draft.images[0].id.clone();
        draft.remove_image(&only);
        assert!(draft.images.is_empty());
        assert!(draft.main_image_id.is_none());
    }

    #[test]
    fn test_colors() {
        let mut draft = ProductDraft::default();
        assert!(!draft.add_color("  ", "#fff"));
        assert!(draft.add_color("Sand", ""));
        assert!(draft.add_color("Navy", "#000080"));
        assert_eq!(draft.colors[0].value, DEFAULT_COLOR_VALUE);

        draft.remove_color(0);
        assert_eq!(draft.colors.len(), 1);
        assert_eq!(draft.colors[0].name, "Navy");
        draft.remove_color(7);
        assert_eq!(draft.colors.len(), 1);
    }

    #[test]
    fn test_into_input_requires_category() {
        let draft = ProductDraft {
            name: "Lamp".to_string(),
            ..ProductDraft::default()
        };
        assert_eq!(
            draft.into_input(&[], "owner@store.example"),
            Err(GuardViolation::MissingCategory)
        );

        let draft = ProductDraft {
            name: "Lamp".to_string(),
            category_id: Some(CategoryId::new("")),
            ..ProductDraft::default()
        };
        assert_eq!(
            draft.into_input(&[], "owner@store.example"),
            Err(GuardViolation::MissingCategory)
        );
    }

    #[test]
    fn test_into_input_resolves_category_name() {
        let draft = ProductDraft {
            name: "Lamp".to_string(),
            category_id: Some(CategoryId::new("c2")),
            ..ProductDraft::default()
        };
        let categories = [category("c1", "Chairs"), category("c2", "Lighting")];
        let input = draft
            .into_input(&categories, "owner@store.example")
            .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(input.category, "Lighting");
        assert_eq!(input.created_by, "owner@store.example");
        assert_eq!(input.updated_by, "owner@store.example");
    }
}
