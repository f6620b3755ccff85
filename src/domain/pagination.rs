//! Pagination domain logic centralization.
//!
//! Responsibility:
//! - page cursor / limit bookkeeping for the cumulative result set
//! - `has_next` inference, either from explicit totals or from the
//!   full-page heuristic when the source omits them

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Items per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// How `has_next` is inferred for a given data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum HasNextStrategy {
    /// More may exist when the last page came back full (`len == limit`).
    #[default]
    FullPage,
    /// `page < total_pages` from the source metadata. Falls back to the
    /// source's own `has_next`, then to the heuristic, when metadata is absent.
    TotalPages,
}

/// Pagination metadata optionally supplied by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub has_next: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page: u32,
    pub limit: u32,
    pub has_next: bool,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// Fresh state before anything was fetched. A zero limit is bumped to 1.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            has_next: false,
            total: None,
            total_pages: None,
        }
    }

    #[must_use]
    pub const fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }

    /// Records a successfully merged page.
    pub fn record_page(
        &mut self,
        page: u32,
        fetched: usize,
        info: Option<&PageInfo>,
        strategy: HasNextStrategy,
    ) {
        self.page = page.max(1);
        self.total = info.and_then(|i| i.total);
        self.total_pages = info.and_then(|i| i.total_pages);
        self.has_next = infer_has_next(self.page, self.limit, fetched, info, strategy);
    }
}

/// Core inference rule, kept free-standing so both strategies are testable
/// in isolation.
#[must_use]
pub fn infer_has_next(
    page: u32,
    limit: u32,
    fetched: usize,
    info: Option<&PageInfo>,
    strategy: HasNextStrategy,
) -> bool {
    let full_page = fetched >= limit as usize && fetched > 0;
    match strategy {
        HasNextStrategy::FullPage => full_page,
        HasNextStrategy::TotalPages => match info {
            Some(PageInfo {
                total_pages: Some(total_pages),
                ..
            }) => page < *total_pages,
            Some(PageInfo {
                has_next: Some(has_next),
                ..
            }) => *has_next,
            _ => full_page,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(12, true)]
    #[case(5, false)]
    #[case(0, false)]
    fn test_full_page_heuristic(#[case] fetched: usize, #[case] expected: bool) {
        assert_eq!(
            infer_has_next(1, 12, fetched, None, HasNextStrategy::FullPage),
            expected
        );
    }

    #[test]
    fn test_total_pages_strategy() {
        let info = PageInfo {
            page: 2,
            limit: 12,
            total: Some(30),
            total_pages: Some(3),
            has_next: None,
        };
        assert!(infer_has_next(2, 12, 12, Some(&info), HasNextStrategy::TotalPages));
        assert!(!infer_has_next(3, 12, 6, Some(&info), HasNextStrategy::TotalPages));
    }

    #[test]
    fn test_total_pages_falls_back_without_metadata() {
        let info = PageInfo {
            page: 1,
            limit: 12,
            has_next: Some(false),
            ..PageInfo::default()
        };
        // explicit flag beats a full page
        assert!(!infer_has_next(1, 12, 12, Some(&info), HasNextStrategy::TotalPages));
        // nothing at all: heuristic
        assert!(infer_has_next(1, 12, 12, None, HasNextStrategy::TotalPages));
    }

    #[test]
    fn test_record_page_tracks_metadata() {
        let mut state = PaginationState::new(12);
        let info = PageInfo {
            page: 1,
            limit: 12,
            total: Some(13),
            total_pages: Some(2),
            has_next: Some(true),
        };
        state.record_page(1, 12, Some(&info), HasNextStrategy::TotalPages);
        assert!(state.has_next);
        assert_eq!(state.total, Some(13));
        assert_eq!(state.next_page(), 2);

        state.record_page(2, 1, None, HasNextStrategy::TotalPages);
        assert!(!state.has_next);
        assert_eq!(state.total, None);
    }

    #[test]
    fn test_zero_limit_is_bumped() {
        assert_eq!(PaginationState::new(0).limit, 1);
    }
}
