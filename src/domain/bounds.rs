//! Slider bounds derived from the first loaded batch.
//!
//! Bounds come from whatever was paged in first, not from a full-catalog
//! aggregate. Later pages or filter changes may contain prices outside them;
//! they are only recomputed on an explicit reset.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::catalog_item::CatalogItem;
use super::filter_criteria::PriceRange;

/// Absolute headroom added above the highest observed price.
const MAX_ABSOLUTE_HEADROOM: i64 = 10;

/// Largest price (2^53) below which the headroom is computed on integers.
const MAX_EXACT_PRICE: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DerivedBounds {
    pub min_price: f64,
    pub max_price: f64,
}

impl DerivedBounds {
    /// `min = floor(min)`, `max = max(ceil(max) + 10, ceil(ceil(max) * 1.1))`.
    ///
    /// Returns `None` when no item carries a usable price.
    #[must_use]
    pub fn from_items<'a, I>(items: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        let (lo, hi) = items
            .into_iter()
            .map(|item| item.price)
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            })?;

        let raw_max = hi.max(0.0).ceil();
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let max_price = if raw_max <= MAX_EXACT_PRICE {
            buffered_max(raw_max as i64) as f64
        } else {
            // beyond exact integers the absolute headroom vanishes anyway
            (raw_max * 1.1).min(f64::MAX)
        };
        Some(Self {
            min_price: lo.max(0.0).floor(),
            max_price,
        })
    }

    #[must_use]
    pub const fn full_range(self) -> PriceRange {
        PriceRange {
            low: self.min_price,
            high: self.max_price,
        }
    }
}

/// `max(raw + 10, ceil(raw * 1.1))` in integer arithmetic so that
/// `100 * 1.1` does not round up to 111.
const fn buffered_max(raw_max: i64) -> i64 {
    let relative = raw_max.saturating_mul(11).saturating_add(9).div_euclid(10);
    let absolute = raw_max.saturating_add(MAX_ABSOLUTE_HEADROOM);
    if relative > absolute { relative } else { absolute }
}

/// Holds the derived bounds for the current catalog until reset.
#[derive(Debug, Clone, Default)]
pub struct BoundsEstimator {
    bounds: Option<DerivedBounds>,
}

impl BoundsEstimator {
    #[must_use]
    pub const fn new() -> Self {
        Self { bounds: None }
    }

    #[must_use]
    pub const fn bounds(&self) -> Option<DerivedBounds> {
        self.bounds
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.bounds.is_some()
    }

    /// Computes bounds from `items` if none are held yet.
    ///
    /// Returns the bounds only when this call initialized them.
    pub fn observe<'a, I>(&mut self, items: I) -> Option<DerivedBounds>
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        if self.bounds.is_some() {
            return None;
        }
        self.bounds = DerivedBounds::from_items(items);
        self.bounds
    }

    /// Drops the held bounds and recomputes from what is currently loaded.
    pub fn reset_from<'a, I>(&mut self, items: I) -> Option<DerivedBounds>
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        self.bounds = DerivedBounds::from_items(items);
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog_item::fixtures::item;

    fn priced(prices: &[f64]) -> Vec<CatalogItem> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| item(&format!("i{i}"), "x", *p, 0))
            .collect()
    }

    #[test]
    fn test_bounds_from_first_batch() {
        let bounds = DerivedBounds::from_items(&priced(&[20.0, 45.0, 99.0])).unwrap();
        assert!((bounds.min_price - 20.0).abs() < f64::EPSILON);
        assert!((bounds.max_price - 109.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_relative_headroom_wins_for_large_prices() {
        let bounds = DerivedBounds::from_items(&priced(&[5.5, 1000.0])).unwrap();
        assert!((bounds.min_price - 5.0).abs() < f64::EPSILON);
        assert!((bounds.max_price - 1100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_hundred_is_not_over_buffered() {
        assert_eq!(buffered_max(100), 110);
        assert_eq!(buffered_max(99), 109);
        assert_eq!(buffered_max(0), 10);
        assert_eq!(buffered_max(101), 112);
    }

    #[test]
    fn test_estimator_fires_once() {
        let mut est = BoundsEstimator::new();
        assert!(est.observe(std::iter::empty()).is_none());
        assert!(!est.is_initialized());

        assert!(est.observe(&priced(&[10.0, 20.0])).is_some());
        // later batches never move the bounds
        assert!(est.observe(&priced(&[500.0])).is_none());
        assert!((est.bounds().unwrap().max_price - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_recomputes_from_loaded() {
        let mut est = BoundsEstimator::new();
        est.observe(&priced(&[10.0, 20.0]));
        let loaded = priced(&[10.0, 20.0, 300.0]);
        let reset = est.reset_from(&loaded).unwrap();
        assert!((reset.max_price - 330.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_huge_prices_do_not_overflow() {
        let bounds = DerivedBounds::from_items(&priced(&[1.0, 1e18])).unwrap();
        assert!(bounds.max_price.is_finite());
        assert!(bounds.max_price > 1e18);

        let bounds = DerivedBounds::from_items(&priced(&[f64::MAX])).unwrap();
        assert!((bounds.max_price - f64::MAX).abs() < f64::EPSILON);

        assert_eq!(buffered_max(i64::MAX), i64::MAX);
    }

    #[test]
    fn test_non_finite_prices_are_ignored() {
        let bounds = DerivedBounds::from_items(&priced(&[f64::NAN, 12.4])).unwrap();
        assert!((bounds.min_price - 12.0).abs() < f64::EPSILON);
        assert!((bounds.max_price - 23.0).abs() < f64::EPSILON);
    }
}
