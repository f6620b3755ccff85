//! Storefront Catalog - incremental catalog retrieval and filter engine
//!
//! Turns user-chosen filter criteria into paginated item store queries,
//! merges pages into a growing result set and keeps a sorted, race-free view
//! for storefront browsing screens.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    CatalogEngineBuilder, CatalogEvent, CatalogHandle, CatalogView, EngineSettings, LoadPhase,
    ScreenProfile, ScrollMetrics,
};
pub use domain::{
    CatalogItem, CriteriaVersion, EngineError, FetchError, FilterCriteria, PageFetcher, PriceRange,
    SortKey, StockStatus,
};
