//! Catalog records exchanged with the catalog API.
//!
//! Every record is a flat camelCase JSON object owned by the API. Fields the
//! API may omit carry a serde default so a partially filled record still
//! renders.

pub mod admin;
pub mod category;
pub mod dashboard;
pub mod hero;
pub mod product;
pub mod upload;
pub mod whatsapp;

pub use admin::Admin;
pub use category::{Category, CategoryInput};
pub use dashboard::DashboardStats;
pub use hero::{HeroImage, HeroImageInput, HeroImagePatch, next_order};
pub use product::{Dimensions, Product, ProductColor, ProductImage, ProductInput};
pub use upload::UploadedFile;
pub use whatsapp::{DEFAULT_COUNTRY_CODE, WhatsAppInput, WhatsAppSettings, sanitize_phone};

/// Lenient timestamp decoding.
///
/// The API emits RFC 3339 strings, but older records may carry an empty
/// string or some other shape. Anything that does not parse becomes `None`
/// instead of failing the whole record.
pub(crate) mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }
}

/// Treat an explicit `null` the same as a missing field.
///
/// `#[serde(default)]` alone only covers an absent key; the API also emits
/// `null` for cleared fields, which would otherwise fail the whole record.
pub(crate) mod null_as_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Like [`null_as_default`], for fields whose fallback is not `Default`.
///
/// Expands to a `deserialize_with` function named `$name` that maps `null`
/// to `$fallback()`.
macro_rules! null_or {
    ($name:ident: $ty:ty = $fallback:path) => {
        fn $name<'de, D>(deserializer: D) -> Result<$ty, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            Ok(<Option<$ty> as serde::Deserialize>::deserialize(deserializer)?.unwrap_or_else($fallback))
        }
    };
}
pub(crate) use null_or;

/// Treat `""` the same as a missing optional string.
///
/// The API stores cleared optional references (`categoryId`, `mainImageId`,
/// `link`) as empty strings.
pub(crate) mod empty_as_none {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.trim().is_empty()).map(T::from))
    }
}
