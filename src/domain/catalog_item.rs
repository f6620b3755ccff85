use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A purchasable item as returned by the remote item store.
///
/// The engine only looks at the fields it needs for filtering, sorting and
/// bounds estimation; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

const fn default_in_stock() -> bool {
    true
}

impl CatalogItem {
    /// Text value of a searchable field, by the name the store uses for it.
    #[must_use]
    pub fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "title" | "name" => Some(&self.title),
            "category" => Some(&self.category),
            "description" => Some(&self.description),
            "id" => Some(&self.id),
            _ => None,
        }
    }

    /// Discount relative to the original price, rounded to whole percent.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u8> {
        let original = self.original_price?;
        if !original.is_finite() || original <= 0.0 || self.price >= original {
            return None;
        }
        let pct = ((original - self.price) / original * 100.0).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(pct.clamp(0.0, 100.0) as u8)
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Rating used for ordering; unrated items rank as zero.
    #[must_use]
    pub fn effective_rating(&self) -> f64 {
        self.rating.filter(|r| r.is_finite()).unwrap_or(0.0)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::CatalogItem;
    use chrono::{TimeZone, Utc};

    /// Builds a minimal item; `created_offset` is seconds after a fixed epoch.
    pub fn item(id: &str, title: &str, price: f64, created_offset: i64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            title: title.to_string(),
            category: "general".to_string(),
            description: String::new(),
            price,
            original_price: None,
            rating: None,
            in_stock: true,
            images: Vec::new(),
            created_at: Utc
                .timestamp_opt(1_700_000_000 + created_offset, 0)
                .single()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::item;

    #[test]
    fn test_discount_percent() {
        let mut it = item("a", "Lamp", 75.0, 0);
        assert_eq!(it.discount_percent(), None);

        it.original_price = Some(100.0);
        assert_eq!(it.discount_percent(), Some(25));

        it.original_price = Some(50.0);
        assert_eq!(it.discount_percent(), None);
    }

    #[test]
    fn test_deserialize_store_payload() {
        let json = r#"{
            "id": "p-1",
            "title": "Desk Lamp",
            "category": "lighting",
            "price": 39.5,
            "rating": 4.5,
            "images": ["https://cdn.example.com/p-1.jpg"],
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let parsed: super::CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.title, "Desk Lamp");
        assert!(parsed.in_stock);
        assert_eq!(parsed.original_price, None);
        assert_eq!(parsed.primary_image(), Some("https://cdn.example.com/p-1.jpg"));
        assert!((parsed.effective_rating() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unrated_item_ranks_as_zero() {
        let it = item("a", "Lamp", 10.0, 0);
        assert!(it.effective_rating().abs() < f64::EPSILON);
    }
}
