//! Product records and their write payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ImageId, Price, ProductId};

/// A named colour swatch, e.g. `{ "name": "Sand", "value": "#c2b280" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductColor {
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub value: String,
}

/// An image attached to a product.
///
/// Older records embed the image inline in `data` instead of `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: ImageId,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub is_main: bool,
}

impl ProductImage {
    /// URL to put in an `<img src>`, falling back to inline data.
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        if self.url.is_empty() {
            self.data.as_deref().filter(|d| !d.is_empty())
        } else {
            Some(&self.url)
        }
    }
}

/// Physical dimensions. Each side is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Dimensions {
    /// Returns `true` when no side is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub description: String,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub price: Price,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub stock: i64,
    #[serde(default, deserialize_with = "super::empty_as_none::deserialize")]
    pub category_id: Option<CategoryId>,
    /// Category name, denormalized by the API.
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub category: String,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub colors: Vec<ProductColor>,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub images: Vec<ProductImage>,
    #[serde(default, deserialize_with = "super::empty_as_none::deserialize")]
    pub main_image_id: Option<ImageId>,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub is_featured: bool,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The image shown first: the one flagged main (or referenced by
    /// `mainImageId`), otherwise the first image.
    #[must_use]
    pub fn main_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|img| img.is_main || self.main_image_id.as_ref() == Some(&img.id))
            .or_else(|| self.images.first())
    }

    /// Source URL of [`Self::main_image`].
    #[must_use]
    pub fn main_image_src(&self) -> Option<&str> {
        self.main_image().and_then(ProductImage::src)
    }

    /// Returns `true` when nothing is left in stock.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }

    /// Case-insensitive match against name, description, and category name.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query)
    }
}

/// Body for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: i64,
    pub category_id: CategoryId,
    pub category: String,
    pub is_featured: bool,
    pub colors: Vec<ProductColor>,
    pub images: Vec<ProductImage>,
    pub main_image_id: Option<ImageId>,
    pub dimensions: Dimensions,
    pub weight: Option<f64>,
    pub created_by: String,
    pub updated_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str, is_main: bool, url: &str) -> ProductImage {
        ProductImage {
            id: ImageId::new(id),
            url: url.to_string(),
            data: None,
            name: None,
            size: None,
            content_type: None,
            is_main,
        }
    }

    fn product(images: Vec<ProductImage>) -> Product {
        let json = r#"{"id":"p1","name":"Lamp"}"#;
        let mut product: Product = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        product.images = images;
        product
    }

    #[test]
    fn test_main_image_prefers_flagged_image() {
        let p = product(vec![image("1", false, "A"), image("2", true, "B")]);
        assert_eq!(p.main_image_src(), Some("B"));
    }

    #[test]
    fn test_main_image_falls_back_to_first() {
        let p = product(vec![image("1", false, "A"), image("2", false, "B")]);
        assert_eq!(p.main_image_src(), Some("A"));
    }

    #[test]
    fn test_main_image_by_main_image_id() {
        let mut p = product(vec![image("1", false, "A"), image("2", false, "B")]);
        p.main_image_id = Some(ImageId::new("2"));
        assert_eq!(p.main_image_src(), Some("B"));
    }

    #[test]
    fn test_main_image_none_without_images() {
        assert!(product(Vec::new()).main_image().is_none());
    }

    #[test]
    fn test_src_falls_back_to_data() {
        let mut img = image("1", true, "");
        img.data = Some("data:image/png;base64,AAAA".to_string());
        assert_eq!(img.src(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_deserialize_full_record() {
        let json = r##"{
            "id": "p1",
            "name": "Lamp",
            "description": "Warm light",
            "price": 19.5,
            "stock": 3,
            "categoryId": "",
            "category": "Lighting",
            "colors": [{"name": "Sand", "value": "#c2b280"}],
            "images": [{"id": "i1", "url": "/a.png", "isMain": true, "type": "image/png"}],
            "mainImageId": "i1",
            "isFeatured": true,
            "dimensions": {"length": 10, "width": null},
            "weight": null
        }"##;
        let p: Product = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert!(p.category_id.is_none());
        assert_eq!(p.price.display(), "$19.50");
        assert_eq!(p.dimensions.map(|d| d.length), Some(Some(10.0)));
        assert_eq!(p.images.first().and_then(|i| i.content_type.as_deref()), Some("image/png"));
    }

    #[test]
    fn test_null_field_does_not_fail_the_list() {
        let json = r#"[
            {"id": "p1", "name": "Lamp", "description": "Warm light"},
            {"id": "p2", "name": null, "description": null, "price": null,
             "colors": null, "images": null, "category": null, "isFeatured": null}
        ]"#;
        let products: Vec<Product> = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        let [_, p2] = products.as_slice() else {
            panic!("expected two products, got {}", products.len());
        };
        assert_eq!(p2.description, "");
        assert_eq!(p2.price, Price::default());
        assert!(p2.images.is_empty());
        assert!(!p2.is_featured);
    }

    #[test]
    fn test_matches_search() {
        let mut p = product(Vec::new());
        p.description = "Warm light".to_string();
        p.category = "Lighting".to_string();
        assert!(p.matches_search("lamp"));
        assert!(p.matches_search("WARM"));
        assert!(p.matches_search("light"));
        assert!(p.matches_search(""));
        assert!(!p.matches_search("chair"));
    }
}
