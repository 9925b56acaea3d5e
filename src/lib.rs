// src/lib.rs
// Public library surface for the binary, integration tests and embedding callers.

pub mod api;
pub mod config;
pub mod devlog;
pub mod engine;
pub mod item;
pub mod metrics;

// Classification pipeline (indicator tables, detectors, scorer)
pub mod classify;

// Portion generation (presets, stated quantities)
pub mod portions;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, router, AppState};
pub use crate::classify::{Classification, ServingConfidence};
pub use crate::config::EngineConfig;
pub use crate::engine::{classify_and_get_portions, ClassifiedPortions, ServingEngine};
pub use crate::item::{MatchedItem, ServingUnit};
pub use crate::portions::PortionOption;
