//! Writes TypeScript bindings for the view types consumed by the frontend.

use storefront_catalog::application::scroll_trigger::ScrollMetrics;
use storefront_catalog::application::{CatalogEvent, CatalogView, LoadPhase};
use storefront_catalog::domain::{DerivedBounds, FilterCriteria, PaginationState};
use ts_rs::TS;

fn main() {
    let results = [
        ("CatalogView", CatalogView::export_all()),
        ("CatalogEvent", CatalogEvent::export_all()),
        ("LoadPhase", LoadPhase::export_all()),
        ("FilterCriteria", FilterCriteria::export_all()),
        ("PaginationState", PaginationState::export_all()),
        ("DerivedBounds", DerivedBounds::export_all()),
        ("ScrollMetrics", ScrollMetrics::export_all()),
    ];

    let mut failed = false;
    for (name, result) in results {
        match result {
            Ok(()) => println!("{name}: exported"),
            Err(e) => {
                failed = true;
                eprintln!("{name} export error: {e}");
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
    println!("TypeScript bindings written");
}
