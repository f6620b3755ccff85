//! Infrastructure layer: configuration, logging and item store adapters

pub mod config;
pub mod http_page_fetcher;
pub mod logging;
pub mod memory_page_fetcher;

pub use config::{AppConfig, CatalogConfig, ConfigManager, FetcherConfig, LoggingConfig};
pub use http_page_fetcher::HttpPageFetcher;
pub use memory_page_fetcher::InMemoryPageFetcher;
