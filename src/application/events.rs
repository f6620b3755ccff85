//! Notifications broadcast by the catalog engine.
//!
//! Events are informational; the authoritative state is always the latest
//! `CatalogView`. Lagging subscribers simply miss events.

use serde::Serialize;
use ts_rs::TS;

use crate::domain::{CriteriaVersion, DerivedBounds};

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CatalogEvent {
    /// A page was merged into the result set.
    PageLoaded {
        version: CriteriaVersion,
        page: u32,
        count: usize,
        #[serde(rename = "hasNext")]
        has_next: bool,
    },
    /// Slider bounds were derived for the current catalog.
    BoundsInitialized { bounds: DerivedBounds },
    /// A fetch under the current version failed; the previous results stay.
    FetchFailed {
        version: CriteriaVersion,
        page: u32,
        message: String,
    },
    /// A response arrived for a version that is no longer current.
    StaleResponseDiscarded {
        issued: CriteriaVersion,
        current: CriteriaVersion,
        page: u32,
    },
}
