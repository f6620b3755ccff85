//! User-editable filter state and the version counter that identifies each
//! logical snapshot of it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::bounds::DerivedBounds;

/// Monotonic identifier of one FilterCriteria snapshot.
///
/// Every fetch carries the version it was issued under; a completed fetch is
/// applied only while its version is still the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CriteriaVersion(pub u64);

impl CriteriaVersion {
    #[must_use]
    pub const fn initial() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for CriteriaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

/// Client-side ordering of the accumulated result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortKey {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    NameAsc,
}

/// Inclusive price interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    /// Normalizes a range so it is always renderable: non-finite values fall
    /// back to the open ends, negatives clamp to zero and swapped ends are
    /// reordered.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        let low = if low.is_finite() { low.max(0.0) } else { 0.0 };
        let high = if high.is_finite() { high.max(0.0) } else { f64::MAX };
        if low <= high {
            Self { low, high }
        } else {
            Self { low: high, high: low }
        }
    }

    /// Parses raw slider/text input.
    ///
    /// Unparsable ends default to the derived bounds (or the open range when
    /// bounds are not known yet), and the result is clamped into the bounds.
    #[must_use]
    pub fn from_inputs(low: &str, high: &str, bounds: Option<DerivedBounds>) -> Self {
        let fallback_low = bounds.map_or(0.0, |b| b.min_price);
        let fallback_high = bounds.map_or(f64::MAX, |b| b.max_price);
        let parse = |raw: &str, fallback: f64| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(fallback)
        };
        let range = Self::new(parse(low, fallback_low), parse(high, fallback_high));
        match bounds {
            Some(b) => range.clamped_to(b),
            None => range,
        }
    }

    #[must_use]
    pub fn clamped_to(self, bounds: DerivedBounds) -> Self {
        Self::new(
            self.low.clamp(bounds.min_price, bounds.max_price),
            self.high.clamp(bounds.min_price, bounds.max_price),
        )
    }

    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }
}

/// The full set of user-chosen filters for one catalog screen.
///
/// `price_range == None` means the user has not moved the slider away from
/// the full derived range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_term: String,
    pub price_range: Option<PriceRange>,
    pub categories: BTreeSet<String>,
    pub stock_status: BTreeSet<StockStatus>,
    pub sort_key: SortKey,
}

impl FilterCriteria {
    #[must_use]
    pub fn with_sort(sort_key: SortKey) -> Self {
        Self {
            sort_key,
            ..Self::default()
        }
    }

    /// Availability restriction implied by the stock-status selection.
    /// Empty or both selected means no restriction.
    #[must_use]
    pub fn availability(&self) -> Option<bool> {
        match (
            self.stock_status.contains(&StockStatus::InStock),
            self.stock_status.contains(&StockStatus::OutOfStock),
        ) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }

    /// Trimmed search term, or `None` when blank.
    #[must_use]
    pub fn normalized_search(&self) -> Option<&str> {
        let term = self.search_term.trim();
        (!term.is_empty()).then_some(term)
    }

    /// Price range the user sees: the explicit selection, else the derived
    /// bounds.
    #[must_use]
    pub fn effective_price_range(&self, bounds: Option<DerivedBounds>) -> Option<PriceRange> {
        self.price_range.or_else(|| bounds.map(DerivedBounds::full_range))
    }

    /// True when the price selection deviates from the default full range.
    #[must_use]
    pub fn has_custom_price(&self, bounds: DerivedBounds) -> bool {
        self.price_range
            .is_some_and(|range| range != bounds.full_range())
    }

    /// Resets every filter while keeping the chosen ordering.
    pub fn clear_filters(&mut self) {
        *self = Self::with_sort(self.sort_key);
    }

    pub fn toggle_category(&mut self, category: &str) {
        if !self.categories.remove(category) {
            self.categories.insert(category.to_string());
        }
    }

    pub fn toggle_stock_status(&mut self, status: StockStatus) {
        if !self.stock_status.remove(&status) {
            self.stock_status.insert(status);
        }
    }
}
