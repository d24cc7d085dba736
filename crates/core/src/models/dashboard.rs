use serde::{Deserialize, Serialize};

/// Aggregate counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_categories: u64,
    pub total_admins: u64,
    pub featured_products: u64,
    pub total_stock: i64,
    pub low_stock_products: u64,
    pub active_hero_images: u64,
    pub total_hero_images: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counters_default_to_zero() {
        let stats: DashboardStats =
            serde_json::from_str(r#"{"totalProducts":4}"#).unwrap_or_default();
        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.total_hero_images, 0);
    }
}
