//! Client-side ordering of the accumulated result set.
//!
//! All comparators are total (NaN-safe via `total_cmp`) and the sort is
//! stable, so re-sorting an already ordered sequence by the same key is a
//! no-op.

use std::cmp::Ordering;
use std::sync::Arc;

use super::catalog_item::CatalogItem;
use super::filter_criteria::SortKey;

pub struct SortEngine;

impl SortEngine {
    /// Sorts `items` in place by `key`. Stable.
    pub fn sort(items: &mut [Arc<CatalogItem>], key: SortKey) {
        items.sort_by(|a, b| Self::compare(a, b, key));
    }

    /// Returns a sorted copy of `items`, leaving the source order untouched.
    #[must_use]
    pub fn sorted(items: &[Arc<CatalogItem>], key: SortKey) -> Vec<Arc<CatalogItem>> {
        let mut view = items.to_vec();
        Self::sort(&mut view, key);
        view
    }

    #[must_use]
    pub fn compare(a: &CatalogItem, b: &CatalogItem, key: SortKey) -> Ordering {
        match key {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::PriceAsc => a.price.total_cmp(&b.price),
            SortKey::PriceDesc => b.price.total_cmp(&a.price),
            SortKey::RatingDesc => b.effective_rating().total_cmp(&a.effective_rating()),
            SortKey::NameAsc => compare_names(&a.title, &b.title),
        }
    }

    /// True when `items` is already ordered by `key`.
    #[must_use]
    pub fn is_sorted(items: &[Arc<CatalogItem>], key: SortKey) -> bool {
        items
            .windows(2)
            .all(|pair| Self::compare(&pair[0], &pair[1], key) != Ordering::Greater)
    }
}

/// Case-folded primary comparison, raw string as tiebreak so that "apple"
/// and "Apple" still order deterministically.
fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}
