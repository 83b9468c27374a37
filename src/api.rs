//! HTTP surface. Handlers only ever read the snapshot cache (filter and
//! truncate over the already-ranked sequence, never re-sort) or serve static
//! directory tables; the one write path is the admin refresh trigger, which
//! respects the pipeline's single-flight rule.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::cache::SnapshotCache;
use crate::directory::{self, District, SeatPrediction};
use crate::ingest::PipelineRunner;
use crate::model::{ContentItem, ErrorSummary, PartyTag};

const DEFAULT_NEWS_LIMIT: usize = 20;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<SnapshotCache>,
    pub runner: Arc<PipelineRunner>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/news", get(get_news))
        .route("/api/snapshot/errors", get(get_snapshot_errors))
        .route("/api/districts", get(get_districts))
        .route("/api/predictions", get(get_predictions))
        .route("/admin/refresh", get(admin_refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct NewsQuery {
    party: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct NewsResponse {
    success: bool,
    data: Vec<ContentItem>,
    /// Size of the filtered sequence, before the limit.
    total: usize,
    generated_at: DateTime<Utc>,
    sample_data: bool,
}

/// `getSnapshot(filter)`: read the current snapshot, optionally filter by
/// party tag, truncate. `party=all` (or absent) disables the filter; an
/// unknown code matches nothing.
async fn get_news(State(state): State<AppState>, Query(q): Query<NewsQuery>) -> Json<NewsResponse> {
    let snapshot = state.cache.current();
    let limit = q.limit.unwrap_or(DEFAULT_NEWS_LIMIT);

    let filter = match q.party.as_deref() {
        None | Some("all") | Some("") => PartyFilter::All,
        Some(code) => match PartyTag::from_code(code) {
            Some(tag) => PartyFilter::Tag(tag),
            None => PartyFilter::Nothing,
        },
    };

    let filtered: Vec<&ContentItem> = snapshot
        .items
        .iter()
        .filter(|item| match filter {
            PartyFilter::All => true,
            PartyFilter::Tag(tag) => item.has_tag(tag),
            PartyFilter::Nothing => false,
        })
        .collect();

    let total = filtered.len();
    let data = filtered.into_iter().take(limit).cloned().collect();

    Json(NewsResponse {
        success: true,
        data,
        total,
        generated_at: snapshot.generated_at,
        sample_data: snapshot.sample_data,
    })
}

#[derive(Clone, Copy)]
enum PartyFilter {
    All,
    Tag(PartyTag),
    Nothing,
}

#[derive(Serialize)]
struct SnapshotErrorsResponse {
    success: bool,
    generated_at: DateTime<Utc>,
    sample_data: bool,
    source_errors: std::collections::BTreeMap<String, ErrorSummary>,
}

/// Degraded-state visibility: per-source errors of the current snapshot.
async fn get_snapshot_errors(State(state): State<AppState>) -> Json<SnapshotErrorsResponse> {
    let snapshot = state.cache.current();
    Json(SnapshotErrorsResponse {
        success: true,
        generated_at: snapshot.generated_at,
        sample_data: snapshot.sample_data,
        source_errors: snapshot.source_errors.clone(),
    })
}

#[derive(Serialize)]
struct DistrictsResponse {
    success: bool,
    data: &'static [District],
}

async fn get_districts() -> Json<DistrictsResponse> {
    Json(DistrictsResponse {
        success: true,
        data: directory::districts(),
    })
}

#[derive(Serialize)]
struct PredictionsData {
    predictions: &'static [SeatPrediction],
    last_updated: DateTime<Utc>,
}

#[derive(Serialize)]
struct PredictionsResponse {
    success: bool,
    data: PredictionsData,
}

async fn get_predictions() -> Json<PredictionsResponse> {
    Json(PredictionsResponse {
        success: true,
        data: PredictionsData {
            predictions: directory::seat_predictions(),
            last_updated: Utc::now(),
        },
    })
}

/// Force an immediate cycle. Answers `busy` without queueing when one is
/// already in flight.
async fn admin_refresh(State(state): State<AppState>) -> &'static str {
    if state.runner.trigger() {
        "triggered"
    } else {
        "busy"
    }
}
