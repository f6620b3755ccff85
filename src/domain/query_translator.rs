//! FilterCriteria -> store predicate.

use std::collections::BTreeSet;

use super::bounds::DerivedBounds;
use super::filter_criteria::FilterCriteria;
use super::predicate::{NumericRange, Predicate, TextOrMatch};

/// Fields searched when the configuration does not name any.
pub const DEFAULT_SEARCH_FIELDS: &[&str] = &["title", "category", "description"];

/// Inputs besides the criteria themselves that shape the predicate.
#[derive(Debug, Clone, Copy)]
pub struct TranslationContext<'a> {
    /// `None` until the first batch has been loaded.
    pub bounds: Option<DerivedBounds>,
    pub search_fields: &'a [String],
    /// Categories a screen is permanently scoped to.
    pub pinned_categories: &'a BTreeSet<String>,
}

/// Maps criteria to the store predicate. Pure.
#[must_use]
pub fn translate(criteria: &FilterCriteria, ctx: &TranslationContext<'_>) -> Predicate {
    Predicate {
        text_or_match: text_clause(criteria, ctx.search_fields),
        price_range: price_clause(criteria, ctx.bounds),
        category_in: category_clause(&criteria.categories, ctx.pinned_categories),
        availability_equals: criteria.availability(),
    }
}

fn text_clause(criteria: &FilterCriteria, fields: &[String]) -> Option<TextOrMatch> {
    let term = criteria.normalized_search()?;
    let fields = if fields.is_empty() {
        DEFAULT_SEARCH_FIELDS.iter().map(ToString::to_string).collect()
    } else {
        fields.to_vec()
    };
    Some(TextOrMatch {
        fields,
        contains: term.to_string(),
    })
}

// No price clause before the bounds exist; the slider has nothing to deviate from.
fn price_clause(criteria: &FilterCriteria, bounds: Option<DerivedBounds>) -> Option<NumericRange> {
    let bounds = bounds?;
    if !criteria.has_custom_price(bounds) {
        return None;
    }
    let range = criteria.price_range?;
    Some(NumericRange {
        gte: Some(range.low),
        lte: Some(range.high),
    })
}

fn category_clause(selected: &BTreeSet<String>, pinned: &BTreeSet<String>) -> Option<Vec<String>> {
    let effective: Vec<String> = match (selected.is_empty(), pinned.is_empty()) {
        (true, true) => return None,
        (false, true) => selected.iter().cloned().collect(),
        (true, false) => pinned.iter().cloned().collect(),
        // user selection narrows within the pinned scope; may be empty on purpose
        (false, false) => selected.intersection(pinned).cloned().collect(),
    };
    Some(effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter_criteria::{PriceRange, StockStatus};
    use rstest::rstest;

    fn bounds() -> DerivedBounds {
        DerivedBounds {
            min_price: 20.0,
            max_price: 109.0,
        }
    }

    fn ctx<'a>(
        bounds: Option<DerivedBounds>,
        fields: &'a [String],
        pinned: &'a BTreeSet<String>,
    ) -> TranslationContext<'a> {
        TranslationContext {
            bounds,
            search_fields: fields,
            pinned_categories: pinned,
        }
    }

    #[test]
    fn test_default_criteria_is_unrestricted() {
        let pinned = BTreeSet::new();
        let p = translate(&FilterCriteria::default(), &ctx(Some(bounds()), &[], &pinned));
        assert!(p.is_unrestricted());
    }

    #[test]
    fn test_search_term_uses_default_fields() {
        let pinned = BTreeSet::new();
        let mut criteria = FilterCriteria::default();
        criteria.search_term = "  Lamp ".into();
        let p = translate(&criteria, &ctx(None, &[], &pinned));
        let text = p.text_or_match.unwrap();
        assert_eq!(text.contains, "Lamp");
        assert_eq!(text.fields, vec!["title", "category", "description"]);
    }

    #[test]
    fn test_blank_search_is_omitted() {
        let pinned = BTreeSet::new();
        let mut criteria = FilterCriteria::default();
        criteria.search_term = "   ".into();
        assert!(translate(&criteria, &ctx(None, &[], &pinned)).text_or_match.is_none());
    }

    #[test]
    fn test_price_waits_for_bounds() {
        let pinned = BTreeSet::new();
        let mut criteria = FilterCriteria::default();
        criteria.price_range = Some(PriceRange::new(30.0, 60.0));

        assert!(translate(&criteria, &ctx(None, &[], &pinned)).price_range.is_none());

        let p = translate(&criteria, &ctx(Some(bounds()), &[], &pinned));
        assert_eq!(
            p.price_range,
            Some(NumericRange {
                gte: Some(30.0),
                lte: Some(60.0)
            })
        );
    }

    #[test]
    fn test_full_range_price_is_omitted() {
        let pinned = BTreeSet::new();
        let mut criteria = FilterCriteria::default();
        criteria.price_range = Some(bounds().full_range());
        assert!(translate(&criteria, &ctx(Some(bounds()), &[], &pinned)).price_range.is_none());
    }

    #[rstest]
    #[case(&[], None)]
    #[case(&[StockStatus::InStock], Some(true))]
    #[case(&[StockStatus::OutOfStock], Some(false))]
    #[case(&[StockStatus::InStock, StockStatus::OutOfStock], None)]
    fn test_stock_status_translation(#[case] selected: &[StockStatus], #[case] expected: Option<bool>) {
        let pinned = BTreeSet::new();
        let criteria = FilterCriteria {
            stock_status: selected.iter().copied().collect(),
            ..FilterCriteria::default()
        };
        assert_eq!(translate(&criteria, &ctx(None, &[], &pinned)).availability_equals, expected);
    }

    #[test]
    fn test_categories_are_sorted_membership() {
        let pinned = BTreeSet::new();
        let mut criteria = FilterCriteria::default();
        criteria.toggle_category("tables");
        criteria.toggle_category("chairs");
        let p = translate(&criteria, &ctx(None, &[], &pinned));
        assert_eq!(p.category_in, Some(vec!["chairs".to_string(), "tables".to_string()]));
    }

    #[test]
    fn test_pinned_categories_scope_selection() {
        let pinned: BTreeSet<String> = ["lighting".to_string()].into_iter().collect();
        let mut criteria = FilterCriteria::default();
        let p = translate(&criteria, &ctx(None, &[], &pinned));
        assert_eq!(p.category_in, Some(vec!["lighting".to_string()]));

        criteria.toggle_category("seating");
        let p = translate(&criteria, &ctx(None, &[], &pinned));
        assert_eq!(p.category_in, Some(Vec::new()));
    }

    #[test]
    fn test_translation_is_pure() {
        let pinned = BTreeSet::new();
        let fields = vec!["title".to_string()];
        let mut criteria = FilterCriteria::default();
        criteria.search_term = "desk".into();
        let before = criteria.clone();
        let a = translate(&criteria, &ctx(Some(bounds()), &fields, &pinned));
        let b = translate(&criteria, &ctx(Some(bounds()), &fields, &pinned));
        assert_eq!(a, b);
        assert_eq!(criteria, before);
    }
}
