// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cache;
pub mod classify;
pub mod config;
pub mod directory;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod sample;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::cache::SnapshotCache;
pub use crate::classify::Classifier;
pub use crate::config::AppConfig;
pub use crate::ingest::{aggregate, CycleOutcome, PipelineRunner};
pub use crate::model::{ContentItem, PartyTag, Snapshot};
