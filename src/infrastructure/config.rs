//! Configuration infrastructure
//!
//! Contains configuration loading and management for the catalog engine.
//!
//! Configuration is organized into three sections:
//! 1. `catalog`: paging, debounce, scroll and search behaviour
//! 2. `fetcher`: item store endpoint and HTTP client limits
//! 3. `logging`: subscriber setup

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

use crate::domain::{HasNextStrategy, SortKey};

const APP_DIR_NAME: &str = "storefront-catalog";
const CONFIG_FILE_NAME: &str = "catalog_config.json";

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub fetcher: FetcherConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog engine behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Items requested per page
    pub page_size: u32,

    /// Quiet window for price slider edits in milliseconds
    pub price_debounce_ms: u64,

    /// Distance from the bottom at which the next page is requested
    pub scroll_threshold: f64,

    /// How `has_next` is decided for the configured data source
    pub has_next_strategy: HasNextStrategy,

    /// Item fields searched by the free-text term
    pub search_fields: Vec<String>,

    pub default_sort: SortKey,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::PAGE_SIZE,
            price_debounce_ms: defaults::PRICE_DEBOUNCE_MS,
            scroll_threshold: defaults::SCROLL_THRESHOLD,
            has_next_strategy: HasNextStrategy::FullPage,
            search_fields: defaults::SEARCH_FIELDS.iter().map(ToString::to_string).collect(),
            default_sort: SortKey::Newest,
        }
    }
}

impl CatalogConfig {
    /// Repairs values the engine cannot work with.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.page_size == 0 {
            warn!("page_size 0 is invalid, using {}", defaults::PAGE_SIZE);
            self.page_size = defaults::PAGE_SIZE;
        }
        if !self.scroll_threshold.is_finite() || self.scroll_threshold < 0.0 {
            warn!(
                "scroll_threshold {} is invalid, using {}",
                self.scroll_threshold,
                defaults::SCROLL_THRESHOLD
            );
            self.scroll_threshold = defaults::SCROLL_THRESHOLD;
        }
        self.search_fields.retain(|field| !field.trim().is_empty());
        if self.search_fields.is_empty() {
            self.search_fields = defaults::SEARCH_FIELDS.iter().map(ToString::to_string).collect();
        }
        self
    }
}

/// Item store endpoint and HTTP client limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// URL accepting `{ predicate, page, limit }` as a JSON POST
    pub endpoint: String,

    pub request_timeout_seconds: u64,

    /// Maximum requests per second sent to the store
    pub max_requests_per_second: u32,

    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::ENDPOINT.to_string(),
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files; the platform data directory when unset
    pub log_dir: Option<PathBuf>,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let module_filters = defaults::MODULE_FILTERS
            .iter()
            .map(|(module, level)| ((*module).to_string(), (*level).to_string()))
            .collect();
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            module_filters,
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(APP_DIR_NAME);
        Ok(config_dir)
    }

    /// Get application data directory
    pub fn get_app_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .context("Failed to get user data directory")?
            .join(APP_DIR_NAME);
        Ok(data_dir)
    }

    /// Manager for the default location in the platform config directory
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(Self::get_config_dir()?.join(CONFIG_FILE_NAME)))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from file, creating default if it doesn't exist.
    ///
    /// An unparsable file is backed up next to itself with a `.corrupted`
    /// extension and replaced by defaults.
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(mut config) => {
                config.catalog = config.catalog.validated();
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration file could not be parsed: {}", parse_error);

                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    info!("Backed up corrupted config to: {:?}", backup_path);
                }

                let default_config = AppConfig::default();
                self.save_config(&default_config)
                    .await
                    .context("Failed to save default configuration")?;
                info!("✅ Reset to default configuration");
                Ok(default_config)
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Update catalog settings in place
    pub async fn update_catalog_config<F>(&self, updater: F) -> Result<AppConfig>
    where
        F: FnOnce(&mut CatalogConfig),
    {
        let mut config = self.load_config().await?;
        updater(&mut config.catalog);
        config.catalog = config.catalog.validated();
        self.save_config(&config).await?;
        Ok(config)
    }

    pub async fn reset_to_defaults(&self) -> Result<AppConfig> {
        info!("🔄 Resetting configuration to defaults");
        let default_config = AppConfig::default();
        self.save_config(&default_config).await?;
        Ok(default_config)
    }
}

/// Default configuration values
pub mod defaults {
    /// Items per page
    pub const PAGE_SIZE: u32 = 12;

    /// Price slider quiet window in milliseconds
    pub const PRICE_DEBOUNCE_MS: u64 = 500;

    /// Scroll distance from the bottom that triggers the next page
    pub const SCROLL_THRESHOLD: f64 = 100.0;

    pub const SEARCH_FIELDS: &[&str] = &["title", "category", "description"];

    pub const ENDPOINT: &str = "http://localhost:8080/api/items/query";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const MAX_REQUESTS_PER_SECOND: u32 = 10;

    pub const USER_AGENT: &str = "storefront-catalog/0.3";

    pub const LOG_LEVEL: &str = "info";

    /// Dependencies that are too chatty at the default level
    pub const MODULE_FILTERS: &[(&str, &str)] = &[
        ("reqwest", "info"),
        ("hyper", "warn"),
        ("hyper_util", "warn"),
        ("tokio", "info"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));

        let config = manager.load_config().await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(manager.config_path().exists());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));

        let mut config = AppConfig::default();
        config.catalog.page_size = 24;
        config.catalog.has_next_strategy = HasNextStrategy::TotalPages;
        config.fetcher.endpoint = "https://shop.example/api/query".into();
        manager.save_config(&config).await.unwrap();

        let loaded = manager.load_config().await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_corrupted_file_is_backed_up_and_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let manager = ConfigManager::with_path(&path);
        let config = manager.load_config().await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(dir.path().join("config.json.corrupted").exists());
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{ "catalog": { "page_size": 0 } }"#)
            .await
            .unwrap();

        let config = ConfigManager::with_path(&path).load_config().await.unwrap();
        assert_eq!(config.catalog.page_size, defaults::PAGE_SIZE);
        assert_eq!(config.catalog.price_debounce_ms, defaults::PRICE_DEBOUNCE_MS);
        assert_eq!(config.fetcher, FetcherConfig::default());
    }

    #[tokio::test]
    async fn test_update_catalog_config() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));
        manager
            .update_catalog_config(|c| c.default_sort = SortKey::PriceAsc)
            .await
            .unwrap();
        let reloaded = manager.load_config().await.unwrap();
        assert_eq!(reloaded.catalog.default_sort, SortKey::PriceAsc);
    }

    #[test]
    fn test_validated_repairs_invalid_values() {
        let config = CatalogConfig {
            page_size: 0,
            scroll_threshold: f64::NAN,
            search_fields: vec![" ".into()],
            ..CatalogConfig::default()
        }
        .validated();
        assert_eq!(config.page_size, 12);
        assert!((config.scroll_threshold - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.search_fields.len(), 3);
    }
}
