// src/ingest/mod.rs
pub mod providers;
pub mod registry;
pub mod scheduler;
pub mod types;

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use metrics::{counter, gauge};
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::cache::SnapshotCache;
use crate::classify::Classifier;
use crate::config::AppConfig;
use crate::ingest::registry::{Source, SourceRegistry, SOCIAL_PATH_ID};
use crate::ingest::types::{FetchOutcome, SourceOutput};
use crate::model::Snapshot;

/// Summary length cap in chars, shared by both paths. Text above the cap is
/// truncated with a trailing ellipsis; text at or below it is left alone.
pub const SUMMARY_CAP: usize = 200;

/// Normalize source text: decode HTML entities, strip tags, collapse
/// whitespace, trim. Keeps sentence punctuation (summaries are shown as-is).
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Cap `s` at `cap` chars, appending `...` only when something was cut.
pub fn truncate_summary(s: &str, cap: usize) -> String {
    if s.chars().count() > cap {
        let mut out: String = s.chars().take(cap).collect();
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

/// Stable id for a news item, derived from its URL so the same article
/// reported by two sources collides into one snapshot entry.
pub fn news_item_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();
    let hex = format!("{digest:x}");
    hex[..16].to_string()
}

/// Merge per-source outputs into one snapshot: dedup by id (first source in
/// registry order wins), stable sort by `published_at` descending, truncate
/// to `max_items`, carry one `ErrorSummary` per failed source.
///
/// Returns `None` iff every source failed (or there were no sources at all);
/// the caller then keeps whatever snapshot it already has.
pub fn aggregate(outputs: Vec<SourceOutput>, max_items: usize) -> Option<Snapshot> {
    crate::metrics::describe_pipeline_metrics();

    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut source_errors = BTreeMap::new();
    let mut any_succeeded = false;

    for out in outputs {
        match out.outcome {
            FetchOutcome::Items(list) => {
                any_succeeded = true;
                for item in list {
                    if seen.insert(item.id.clone()) {
                        items.push(item);
                    }
                }
            }
            FetchOutcome::Failed { .. } => {
                counter!("pipeline_source_errors_total").increment(1);
                if let Some(summary) = out.error_summary() {
                    source_errors.insert(summary.source_id.clone(), summary);
                }
            }
        }
    }

    if !any_succeeded {
        return None;
    }

    // Stable sort: registry order survives as the tie-break, so completion
    // order of the concurrent fetches cannot leak into the output.
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items.truncate(max_items);

    Some(Snapshot {
        items,
        generated_at: Utc::now(),
        source_errors,
        sample_data: false,
    })
}

/// Guard ensuring at most one cycle runs at a time. Releases on drop, so a
/// cancelled cycle never wedges a later trigger.
#[derive(Clone, Debug, Default)]
pub struct SingleFlight {
    busy: Arc<AtomicBool>,
}

pub struct InFlightGuard(Arc<AtomicBool>);

impl SingleFlight {
    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(self.busy.clone()))
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// What became of one requested cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new snapshot was published.
    Published,
    /// Every source failed; the cached snapshot was kept.
    Fallback,
    /// A cycle was already in flight; this request did nothing.
    Skipped,
}

/// Owns one full fetch→normalize→classify→aggregate cycle and the cache it
/// publishes into. Exactly one cycle runs at a time regardless of who asks
/// (scheduler tick or admin trigger).
pub struct PipelineRunner {
    registry: SourceRegistry,
    classifier: Classifier,
    config: AppConfig,
    client: reqwest::Client,
    cache: Arc<SnapshotCache>,
    single_flight: SingleFlight,
}

impl PipelineRunner {
    pub fn new(
        registry: SourceRegistry,
        classifier: Classifier,
        config: AppConfig,
        client: reqwest::Client,
        cache: Arc<SnapshotCache>,
    ) -> Self {
        crate::metrics::describe_pipeline_metrics();
        Self {
            registry,
            classifier,
            config,
            client,
            cache,
            single_flight: SingleFlight::default(),
        }
    }

    pub fn cache(&self) -> Arc<SnapshotCache> {
        self.cache.clone()
    }

    pub fn single_flight(&self) -> &SingleFlight {
        &self.single_flight
    }

    /// Run one cycle unless one is already in flight.
    pub async fn run_if_idle(&self) -> CycleOutcome {
        let Some(_guard) = self.single_flight.try_acquire() else {
            counter!("pipeline_cycles_skipped_total").increment(1);
            info!(target: "pipeline", "cycle already in flight, tick skipped");
            return CycleOutcome::Skipped;
        };
        self.run_cycle().await
    }

    /// Start a cycle in the background unless one is already in flight.
    /// Used by the admin trigger; returns immediately.
    pub fn trigger(self: &Arc<Self>) -> bool {
        let Some(guard) = self.single_flight.try_acquire() else {
            return false;
        };
        let runner = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = guard;
            runner.run_cycle().await;
        });
        true
    }

    async fn run_cycle(&self) -> CycleOutcome {
        let outputs = self.collect_outputs().await;
        let error_count = outputs
            .iter()
            .filter(|o| matches!(o.outcome, FetchOutcome::Failed { .. }))
            .count();

        match aggregate(outputs, self.config.max_items) {
            Some(snapshot) => {
                let item_count = snapshot.items.len();
                self.cache.publish(snapshot);

                counter!("pipeline_cycles_total").increment(1);
                gauge!("pipeline_snapshot_items").set(item_count as f64);
                gauge!("pipeline_last_run_ts").set(Utc::now().timestamp().max(0) as f64);
                info!(
                    target: "pipeline",
                    items = item_count,
                    source_errors = error_count,
                    "cycle published snapshot"
                );
                CycleOutcome::Published
            }
            None => {
                counter!("pipeline_fallback_total").increment(1);
                warn!(
                    target: "pipeline",
                    source_errors = error_count,
                    "every source failed, keeping cached snapshot"
                );
                CycleOutcome::Fallback
            }
        }
    }

    /// Fan out over the registry. Feeds fetch concurrently but results are
    /// collected in registry order; accounts fetch serially with the
    /// configured delay to respect external rate limits.
    async fn collect_outputs(&self) -> Vec<SourceOutput> {
        let mut outputs = Vec::new();

        let mut handles = Vec::new();
        for src in self.registry.feeds() {
            let client = self.client.clone();
            let classifier = self.classifier.clone();
            let timeout = self.config.feed_timeout();
            let src = src.clone();
            handles.push((
                src.id.clone(),
                tokio::spawn(async move { fetch_and_normalize_feed(&client, &src, timeout, &classifier).await }),
            ));
        }
        for (id, handle) in handles {
            match handle.await {
                Ok(out) => outputs.push(out),
                Err(e) => outputs.push(SourceOutput::failed(
                    id,
                    format!("fetch task failed: {e}"),
                    Utc::now(),
                )),
            }
        }

        let accounts: Vec<Source> = self.registry.accounts().cloned().collect();
        if accounts.is_empty() {
            return outputs;
        }

        let token = std::env::var(self.config.bearer_token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        let Some(token) = token else {
            // Path-level configuration error: one summary for the whole
            // path, reported under the synthetic id, never once per account.
            warn!(
                target: "pipeline",
                env = self.config.bearer_token_env,
                "bearer token not configured, social path disabled for this cycle"
            );
            outputs.push(SourceOutput::failed(
                SOCIAL_PATH_ID,
                format!("bearer token not configured ({})", self.config.bearer_token_env),
                Utc::now(),
            ));
            return outputs;
        };

        for (i, src) in accounts.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.social_delay()).await;
            }
            let raw = providers::social_api::fetch_account_posts(&self.client, src, &token).await;
            outputs.push(match raw.error {
                Some(ref msg) => SourceOutput::failed(&src.id, msg.clone(), raw.fetched_at),
                None => match providers::social_api::normalize_posts(src, &raw, &self.classifier) {
                    Ok(items) => SourceOutput::items(&src.id, items),
                    Err(e) => SourceOutput::failed(&src.id, format!("{e:#}"), raw.fetched_at),
                },
            });
        }

        outputs
    }
}

async fn fetch_and_normalize_feed(
    client: &reqwest::Client,
    src: &Source,
    timeout: std::time::Duration,
    classifier: &Classifier,
) -> SourceOutput {
    let raw = providers::feed_rss::fetch_feed(client, src, timeout).await;
    match raw.error {
        Some(ref msg) => SourceOutput::failed(&src.id, msg.clone(), raw.fetched_at),
        None => match providers::feed_rss::normalize_feed(src, &raw, classifier) {
            Ok(items) => SourceOutput::items(&src.id, items),
            Err(e) => SourceOutput::failed(&src.id, format!("{e:#}"), raw.fetched_at),
        },
    }
}
