use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
    pub description: String,
    #[serde(default, deserialize_with = "super::empty_as_none::deserialize")]
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating or updating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
    pub icon_url: String,
}

impl From<&Category> for CategoryInput {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            icon_url: category.icon_url.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_icon_url_is_none() {
        let json = r#"{"id":"c1","name":"Lamps","iconUrl":""}"#;
        let category: Category = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert!(category.icon_url.is_none());
        assert_eq!(category.description, "");
    }

    #[test]
    fn test_null_description_is_empty() {
        let json = r#"{"id":"c1","name":"Lamps","description":null,"iconUrl":null}"#;
        let category: Category = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(category.description, "");
        assert!(category.icon_url.is_none());
    }

    #[test]
    fn test_input_seeded_from_category() {
        let json = r#"{"id":"c1","name":"Lamps","description":"Light","iconUrl":"/i.png"}"#;
        let category: Category = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        let input = CategoryInput::from(&category);
        assert_eq!(input.name, "Lamps");
        assert_eq!(input.icon_url, "/i.png");

        let body = serde_json::to_value(&input).unwrap_or_default();
        assert_eq!(body["iconUrl"], "/i.png");
    }
}
