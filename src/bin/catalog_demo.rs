//! Drives a catalog engine against a generated in-memory store.
//!
//! Usage: `catalog_demo [config.json]`. Without an argument the platform
//! config directory is used.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use storefront_catalog::application::CatalogView;
use storefront_catalog::infrastructure::logging::{init_logging_with_config, log_system_info};
use storefront_catalog::infrastructure::{ConfigManager, InMemoryPageFetcher};
use storefront_catalog::{CatalogEngineBuilder, CatalogItem, ScrollMetrics, SortKey, StockStatus};
use tracing::info;

const CATEGORIES: &[&str] = &["lighting", "seating", "tables", "storage", "decor"];
const ADJECTIVES: &[&str] = &["Oak", "Walnut", "Linen", "Brass", "Marble", "Rattan"];
const NOUNS: &[&str] = &["Lamp", "Chair", "Table", "Shelf", "Vase", "Stool", "Cabinet"];

fn generate_items(count: usize, seed: u64) -> Vec<CatalogItem> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let price = f64::from(rng.u32(500..40_000)) / 100.0;
            CatalogItem {
                id: format!("item-{i:04}"),
                title: format!(
                    "{} {}",
                    ADJECTIVES[rng.usize(..ADJECTIVES.len())],
                    NOUNS[rng.usize(..NOUNS.len())]
                ),
                category: CATEGORIES[rng.usize(..CATEGORIES.len())].to_string(),
                description: String::new(),
                price,
                original_price: rng.bool().then(|| (price * 1.25).round()),
                rating: Some(f64::from(rng.u8(10..=50)) / 10.0),
                in_stock: rng.u8(..10) > 1,
                images: vec![format!("https://images.example/{i}.jpg")],
                created_at: now - ChronoDuration::hours(i64::from(rng.u32(..2_000))),
            }
        })
        .collect()
}

fn print_view(label: &str, view: &CatalogView) {
    info!(
        "[{}] {} | {:?} | {} items | page {} | has_next={} | bounds={:?}",
        label,
        view.version,
        view.phase,
        view.items.len(),
        view.pagination.page,
        view.pagination.has_next,
        view.bounds.map(|b| (b.min_price, b.max_price)),
    );
    for item in view.items.iter().take(3) {
        info!("    {:<10} {:<16} {:>8.2}", item.id, item.title, item.price);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let manager = match std::env::args().nth(1) {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let config = manager.load_config().await.context("Failed to load configuration")?;
    init_logging_with_config(&config.logging)?;
    log_system_info();

    let store = Arc::new(
        InMemoryPageFetcher::new(generate_items(80, 7))
            .with_totals(true)
            .with_latency(Duration::from_millis(40)),
    );
    let engine = CatalogEngineBuilder::new(store.clone())
        .with_config(&config.catalog)
        .spawn();

    let settle = Duration::from_millis(config.catalog.price_debounce_ms + 200);

    tokio::time::sleep(settle).await;
    print_view("initial", &engine.view());

    engine.on_scroll(ScrollMetrics::new(2400.0, 800.0, 1550.0)).await?;
    tokio::time::sleep(settle).await;
    print_view("scrolled", &engine.view());

    engine.set_search_term("lamp").await?;
    engine.toggle_stock_status(StockStatus::InStock).await?;
    tokio::time::sleep(settle).await;
    print_view("lamps in stock", &engine.view());

    for high in [300.0, 250.0, 200.0, 150.0] {
        engine.set_price_inputs("", high.to_string()).await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    tokio::time::sleep(settle).await;
    print_view("price <= 150", &engine.view());

    engine.set_sort_key(SortKey::PriceAsc).await?;
    engine.flush().await?;
    print_view("cheapest first", &engine.view());

    engine.clear_filters().await?;
    tokio::time::sleep(settle).await;
    print_view("cleared", &engine.view());

    info!("Store received {} requests", store.request_count());
    engine.shutdown().await?;
    Ok(())
}
