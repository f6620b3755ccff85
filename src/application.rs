//! Application layer module
//!
//! The catalog engine: a reducer over domain types plus the actor that runs
//! it, and the snapshot/event types published to presentation code.

pub mod catalog_actor;
pub mod catalog_state;
pub mod debouncer;
pub mod dto;
pub mod events;
pub mod scroll_trigger;

pub use catalog_actor::{CatalogEngineBuilder, CatalogHandle};
pub use catalog_state::{CatalogAction, CatalogState, Effect, EngineSettings, ScreenProfile};
pub use debouncer::Debouncer;
pub use dto::{CatalogView, LoadPhase};
pub use events::CatalogEvent;
pub use scroll_trigger::{ScrollMetrics, ScrollTrigger};
