//! Property-based tests for client-side ordering.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use storefront_catalog::domain::{CatalogItem, SortEngine, SortKey};

fn arb_sort_key() -> impl Strategy<Value = SortKey> {
    prop::sample::select(vec![
        SortKey::Newest,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::RatingDesc,
        SortKey::NameAsc,
    ])
}

/// Small value ranges so ties are common.
fn arb_item() -> impl Strategy<Value = CatalogItem> {
    (
        "[a-cA-C]{1,3}",
        prop_oneof![Just(f64::NAN), (0u32..20).prop_map(f64::from)],
        prop::option::of(0u8..5),
        0i64..10,
    )
        .prop_map(|(title, price, rating, created)| CatalogItem {
            id: String::new(),
            title,
            category: "general".into(),
            description: String::new(),
            price,
            original_price: None,
            rating: rating.map(f64::from),
            in_stock: true,
            images: Vec::new(),
            created_at: Utc.timestamp_opt(1_700_000_000 + created * 60, 0).unwrap(),
        })
}

fn arb_items() -> impl Strategy<Value = Vec<Arc<CatalogItem>>> {
    prop::collection::vec(arb_item(), 0..40).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, mut item)| {
                item.id = format!("i{i:02}");
                Arc::new(item)
            })
            .collect()
    })
}

fn ids(items: &[Arc<CatalogItem>]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}

proptest! {
    #[test]
    fn sorting_is_idempotent(items in arb_items(), key in arb_sort_key()) {
        let once = SortEngine::sorted(&items, key);
        let twice = SortEngine::sorted(&once, key);
        prop_assert_eq!(ids(&once), ids(&twice));
        prop_assert!(SortEngine::is_sorted(&once, key));
    }

    #[test]
    fn sorting_is_a_permutation(items in arb_items(), key in arb_sort_key()) {
        let sorted = SortEngine::sorted(&items, key);
        let mut before = ids(&items);
        let mut after = ids(&sorted);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn equal_keys_keep_insertion_order(items in arb_items(), key in arb_sort_key()) {
        let sorted = SortEngine::sorted(&items, key);
        for pair in sorted.windows(2) {
            if SortEngine::compare(&pair[0], &pair[1], key).is_eq() {
                // ids encode the original position
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    #[test]
    fn resorting_from_another_key_matches_direct_sort(
        items in arb_items(),
        first in arb_sort_key(),
        second in arb_sort_key(),
    ) {
        // stable sorts only agree if ties fall back to the same order, so
        // compare the key sequence rather than ids
        let via = SortEngine::sorted(&SortEngine::sorted(&items, first), second);
        let direct = SortEngine::sorted(&items, second);
        prop_assert_eq!(via.len(), direct.len());
        for (a, b) in via.iter().zip(direct.iter()) {
            prop_assert!(SortEngine::compare(a, b, second).is_eq());
        }
    }
}
