//! In-memory item store.
//!
//! Evaluates predicates locally over a fixed item list, the same way the
//! remote store does. Used by the demo binary and tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CatalogItem, FetchError, PageFetcher, PageInfo, PageRequest, PageResponse};

#[derive(Debug, Default)]
pub struct InMemoryPageFetcher {
    items: Vec<CatalogItem>,
    report_totals: bool,
    latency: Option<Duration>,
    requests: Mutex<Vec<PageRequest>>,
    scripted_failures: Mutex<VecDeque<FetchError>>,
}

impl InMemoryPageFetcher {
    /// Items are served in the order given.
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Include `total`, `total_pages` and `has_next` in every response.
    #[must_use]
    pub fn with_totals(mut self, enabled: bool) -> Self {
        self.report_totals = enabled;
        self
    }

    /// Simulated round-trip time per request.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The next request fails with `error` instead of being served.
    pub fn fail_next(&self, error: FetchError) {
        lock(&self.scripted_failures).push_back(error);
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<PageRequest> {
        lock(&self.requests).clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Answers a request synchronously.
    #[must_use]
    pub fn serve(&self, request: &PageRequest) -> PageResponse {
        let matching: Vec<&CatalogItem> = self
            .items
            .iter()
            .filter(|item| request.predicate.matches(item))
            .collect();

        let limit = request.limit.max(1) as usize;
        let start = (request.page.max(1) as usize - 1).saturating_mul(limit);
        let items = matching
            .iter()
            .skip(start)
            .take(limit)
            .map(|item| (*item).clone())
            .collect();

        let pagination = self.report_totals.then(|| {
            let total = matching.len();
            let total_pages = u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX);
            PageInfo {
                page: request.page,
                limit: request.limit,
                total: Some(total as u64),
                total_pages: Some(total_pages),
                has_next: Some(request.page < total_pages),
            }
        });

        PageResponse { items, pagination }
    }
}

#[async_trait]
impl PageFetcher for InMemoryPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        lock(&self.requests).push(request.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let scripted = lock(&self.scripted_failures).pop_front();
        if let Some(error) = scripted {
            return Err(error);
        }
        Ok(self.serve(request))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog_item::fixtures::item;
    use crate::domain::Predicate;
    use crate::domain::predicate::NumericRange;
    use tokio_test::block_on;

    fn store() -> InMemoryPageFetcher {
        InMemoryPageFetcher::new(
            (1..=30)
                .map(|i| item(&format!("p{i}"), &format!("Item {i}"), f64::from(i), i64::from(i)))
                .collect(),
        )
    }

    fn request(predicate: Predicate, page: u32) -> PageRequest {
        PageRequest {
            predicate,
            page,
            limit: 12,
        }
    }

    #[test]
    fn test_pages_are_one_based_and_disjoint() {
        let store = store();
        let first = store.serve(&request(Predicate::default(), 1));
        let third = store.serve(&request(Predicate::default(), 3));
        assert_eq!(first.items.len(), 12);
        assert_eq!(first.items[0].id, "p1");
        assert_eq!(third.items.len(), 6);
        assert_eq!(third.items[0].id, "p25");
        assert!(first.pagination.is_none());
    }

    #[test]
    fn test_predicate_is_applied_before_paging() {
        let store = store().with_totals(true);
        let predicate = Predicate {
            price_range: Some(NumericRange {
                gte: Some(10.0),
                lte: Some(20.0),
            }),
            ..Predicate::default()
        };
        let response = store.serve(&request(predicate, 1));
        assert_eq!(response.items.len(), 11);
        let info = response.pagination.unwrap();
        assert_eq!(info.total, Some(11));
        assert_eq!(info.total_pages, Some(1));
        assert_eq!(info.has_next, Some(false));
    }

    #[test]
    fn test_scripted_failure_then_recovery() {
        let store = store();
        store.fail_next(FetchError::Network("reset".into()));
        let req = request(Predicate::default(), 1);
        assert!(block_on(store.fetch_page(&req)).is_err());
        assert!(block_on(store.fetch_page(&req)).is_ok());
        assert_eq!(store.request_count(), 2);
        assert_eq!(store.requests()[1], req);
    }
}
