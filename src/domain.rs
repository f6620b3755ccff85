//! Domain module - catalog entities, filter semantics and ordering rules
//!
//! Everything here is synchronous and side-effect free; the async engine in
//! `application` drives these types.

pub mod bounds;
pub mod catalog_item;
pub mod errors;
pub mod filter_criteria;
pub mod pagination;
pub mod predicate;
pub mod query_translator;
pub mod repositories;
pub mod result_set;
pub mod sorting;

pub use bounds::{BoundsEstimator, DerivedBounds};
pub use catalog_item::CatalogItem;
pub use errors::{EngineError, FetchError};
pub use filter_criteria::{CriteriaVersion, FilterCriteria, PriceRange, SortKey, StockStatus};
pub use pagination::{HasNextStrategy, PageInfo, PaginationState};
pub use predicate::Predicate;
pub use query_translator::{translate, TranslationContext};
pub use repositories::{CartGateway, OrderGateway, PageFetcher, PageRequest, PageResponse};
pub use result_set::ResultSet;
pub use sorting::SortEngine;
