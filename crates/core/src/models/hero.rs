//! Hero banner records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::HeroImageId;

const fn default_true() -> bool {
    true
}

const fn default_overlay_opacity() -> f64 {
    0.4
}

fn default_header_color() -> String {
    "#000000".to_string()
}

fn default_description_color() -> String {
    "#ffffff".to_string()
}

fn default_text_background_color() -> String {
    "rgba(0,0,0,0.4)".to_string()
}

super::null_or!(null_or_true: bool = default_true);
super::null_or!(null_or_overlay_opacity: f64 = default_overlay_opacity);
super::null_or!(null_or_header_color: String = default_header_color);
super::null_or!(null_or_description_color: String = default_description_color);
super::null_or!(null_or_text_background_color: String = default_text_background_color);

/// A rotating promotional banner on the storefront landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImage {
    pub id: HeroImageId,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub image_url: String,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub header_text: String,
    #[serde(default = "default_header_color", deserialize_with = "null_or_header_color")]
    pub header_color: String,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub description_text: String,
    #[serde(default = "default_description_color", deserialize_with = "null_or_description_color")]
    pub description_color: String,
    #[serde(default = "default_text_background_color", deserialize_with = "null_or_text_background_color")]
    pub text_background_color: String,
    #[serde(default, deserialize_with = "super::empty_as_none::deserialize")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub order: i64,
    #[serde(default = "default_true", deserialize_with = "null_or_true")]
    pub is_active: bool,
    #[serde(default = "default_true", deserialize_with = "null_or_true")]
    pub overlay_enabled: bool,
    #[serde(default = "default_overlay_opacity", deserialize_with = "null_or_overlay_opacity")]
    pub overlay_opacity: f64,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl HeroImage {
    /// Overlay opacity clamped to `0.0..=1.0`, or zero when the overlay is off.
    #[must_use]
    pub fn effective_overlay(&self) -> f64 {
        if self.overlay_enabled {
            self.overlay_opacity.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Full hero image body, used for create and for edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImageInput {
    pub image_url: String,
    pub header_text: String,
    pub header_color: String,
    pub description_text: String,
    pub description_color: String,
    pub text_background_color: String,
    pub link: String,
    pub order: i64,
    pub is_active: bool,
    pub overlay_enabled: bool,
    pub overlay_opacity: f64,
    pub created_by: String,
    pub updated_by: String,
}

impl Default for HeroImageInput {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            header_text: String::new(),
            header_color: default_header_color(),
            description_text: String::new(),
            description_color: default_description_color(),
            text_background_color: default_text_background_color(),
            link: String::new(),
            order: 0,
            is_active: true,
            overlay_enabled: true,
            overlay_opacity: default_overlay_opacity(),
            created_by: String::new(),
            updated_by: String::new(),
        }
    }
}

impl From<&HeroImage> for HeroImageInput {
    fn from(hero: &HeroImage) -> Self {
        Self {
            image_url: hero.image_url.clone(),
            header_text: hero.header_text.clone(),
            header_color: hero.header_color.clone(),
            description_text: hero.description_text.clone(),
            description_color: hero.description_color.clone(),
            text_background_color: hero.text_background_color.clone(),
            link: hero.link.clone().unwrap_or_default(),
            order: hero.order,
            is_active: hero.is_active,
            overlay_enabled: hero.overlay_enabled,
            overlay_opacity: hero.overlay_opacity,
            created_by: hero.created_by.clone().unwrap_or_default(),
            updated_by: String::new(),
        }
    }
}

/// Sparse hero image update. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub updated_by: String,
}

impl HeroImagePatch {
    #[must_use]
    pub fn order(order: i64, updated_by: impl Into<String>) -> Self {
        Self {
            order: Some(order),
            is_active: None,
            updated_by: updated_by.into(),
        }
    }

    #[must_use]
    pub fn active(is_active: bool, updated_by: impl Into<String>) -> Self {
        Self {
            order: None,
            is_active: Some(is_active),
            updated_by: updated_by.into(),
        }
    }
}

/// Order for a newly created hero image: one past the current maximum, or 1
/// for an empty list.
#[must_use]
pub fn next_order(existing: &[HeroImage]) -> i64 {
    existing
        .iter()
        .map(|h| h.order)
        .max()
        .map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero(id: &str, order: i64) -> HeroImage {
        let json = format!(r#"{{"id":"{id}","order":{order}}}"#);
        serde_json::from_str(&json).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_defaults_applied_on_missing_fields() {
        let h = hero("h1", 1);
        assert!(h.is_active);
        assert!(h.overlay_enabled);
        assert!((h.overlay_opacity - 0.4).abs() < f64::EPSILON);
        assert_eq!(h.header_color, "#000000");
        assert_eq!(h.description_color, "#ffffff");
        assert_eq!(h.text_background_color, "rgba(0,0,0,0.4)");
    }

    #[test]
    fn test_null_fields_fall_back() {
        let json = r##"{
            "id": "h1",
            "imageUrl": "/uploads/h1.jpg",
            "headerText": null,
            "headerColor": null,
            "descriptionText": null,
            "isActive": null,
            "overlayOpacity": null,
            "order": null,
            "link": null
        }"##;
        let h: HeroImage = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(h.header_text, "");
        assert_eq!(h.header_color, "#000000");
        assert!(h.is_active);
        assert!((h.overlay_opacity - 0.4).abs() < f64::EPSILON);
        assert_eq!(h.order, 0);
        assert!(h.link.is_none());
    }

    #[test]
    fn test_next_order() {
        assert_eq!(next_order(&[]), 1);
        assert_eq!(next_order(&[hero("a", 3), hero("b", 7), hero("c", 2)]), 8);
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let body = serde_json::to_value(HeroImagePatch::active(false, "owner@store.example"))
            .unwrap_or_default();
        assert_eq!(body["isActive"], false);
        assert_eq!(body["updatedBy"], "owner@store.example");
        assert!(body.get("order").is_none());
    }

    #[test]
    fn test_effective_overlay() {
        let mut h = hero("h1", 1);
        h.overlay_opacity = 1.7;
        assert!((h.effective_overlay() - 1.0).abs() < f64::EPSILON);
        h.overlay_enabled = false;
        assert!(h.effective_overlay().abs() < f64::EPSILON);
    }

    #[test]
    fn test_input_keeps_existing_order() {
        let input = HeroImageInput::from(&hero("h1", 5));
        assert_eq!(input.order, 5);
        assert_eq!(input.link, "");
    }
}
