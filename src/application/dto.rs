//! Read-only snapshot published to presentation code.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::domain::{CatalogItem, CriteriaVersion, DerivedBounds, FilterCriteria, PaginationState, PriceRange};

/// Fetch lifecycle of the catalog.
///
/// `Idle -> LoadingFirst -> Ready`, `Ready -> LoadingMore -> Ready`; `Error`
/// keeps the last good results and accepts further fetches like `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadPhase {
    #[default]
    Idle,
    LoadingFirst,
    Ready,
    LoadingMore,
    Error,
}

impl LoadPhase {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::LoadingFirst | Self::LoadingMore)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub version: CriteriaVersion,
    pub criteria: FilterCriteria,
    /// Slider value still inside the debounce window, if any.
    pub pending_price_range: Option<PriceRange>,
    /// What the price slider should display.
    pub effective_price_range: Option<PriceRange>,
    pub bounds: Option<DerivedBounds>,
    /// Result set ordered by `criteria.sort_key`.
    pub items: Vec<Arc<CatalogItem>>,
    pub pagination: PaginationState,
    pub phase: LoadPhase,
    pub last_error: Option<String>,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self {
            version: CriteriaVersion::initial(),
            criteria: FilterCriteria::default(),
            pending_price_range: None,
            effective_price_range: None,
            bounds: None,
            items: Vec::new(),
            pagination: PaginationState::default(),
            phase: LoadPhase::Idle,
            last_error: None,
        }
    }
}

impl CatalogView {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    #[must_use]
    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }

    #[must_use]
    pub fn find_item(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().map(AsRef::as_ref).find(|item| item.id == id)
    }
}
