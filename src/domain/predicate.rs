//! Predicate object understood by the remote item store.
//!
//! The store supports equality, set membership (`in`), numeric ranges
//! (`gte`/`lte`) and case-insensitive substring matching OR-ed across named
//! fields. Absent keys mean "no restriction".

use serde::{Deserialize, Serialize};

use super::catalog_item::CatalogItem;

/// Case-insensitive substring match OR-ed across `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOrMatch {
    pub fields: Vec<String>,
    pub contains: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_or_match: Option<TextOrMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_in: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_equals: Option<bool>,
}

impl Predicate {
    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        self.text_or_match.is_none()
            && self.price_range.is_none()
            && self.category_in.is_none()
            && self.availability_equals.is_none()
    }

    /// Evaluates the predicate against one item the way the store does.
    #[must_use]
    pub fn matches(&self, item: &CatalogItem) -> bool {
        if let Some(text) = &self.text_or_match {
            let needle = text.contains.to_lowercase();
            let hit = text.fields.iter().any(|field| {
                item.text_field(field)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            });
            if !hit {
                return false;
            }
        }

        if let Some(range) = &self.price_range {
            if range.gte.is_some_and(|low| item.price < low) {
                return false;
            }
            if range.lte.is_some_and(|high| item.price > high) {
                return false;
            }
        }

        if let Some(categories) = &self.category_in {
            if !categories.iter().any(|c| c == &item.category) {
                return false;
            }
        }

        self.availability_equals
            .is_none_or(|wanted| item.in_stock == wanted)
    }
}
