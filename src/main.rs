//! Election News Aggregator — Binary Entrypoint
//! Boots the pipeline (registry, classifier, cache, scheduler) and the Axum
//! HTTP server that serves the published snapshots.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use election_news_aggregator::api::{self, AppState};
use election_news_aggregator::cache::SnapshotCache;
use election_news_aggregator::classify::Classifier;
use election_news_aggregator::config::AppConfig;
use election_news_aggregator::ingest::registry::SourceRegistry;
use election_news_aggregator::ingest::scheduler::RefreshScheduler;
use election_news_aggregator::ingest::PipelineRunner;
use election_news_aggregator::metrics::Metrics;
use election_news_aggregator::sample;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("election_news_aggregator=info,pipeline=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env();
    let metrics = Metrics::init(config.refresh_interval_secs);

    let registry = SourceRegistry::load();
    let classifier = Classifier::load();

    // Readers get the bootstrap sample until the first cycle publishes.
    let cache = Arc::new(SnapshotCache::new(sample::bootstrap_snapshot(&classifier)));

    let client = reqwest::Client::builder()
        .timeout(config.feed_timeout())
        .build()
        .context("building http client")?;

    let runner = Arc::new(PipelineRunner::new(
        registry,
        classifier,
        config.clone(),
        client,
        cache.clone(),
    ));

    let _scheduler = RefreshScheduler::start(runner.clone(), config.refresh_interval());

    let app = api::router(AppState {
        cache,
        runner,
    })
    .merge(metrics.router());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(addr = %addr, "serving");
    axum::serve(listener, app).await.context("serving http")?;

    Ok(())
}
