// src/ingest/scheduler.rs
//! Periodic trigger for the pipeline: one cycle immediately on start, then
//! one per interval. Overlap is impossible by construction — the runner's
//! single-flight guard turns a tick that arrives mid-cycle into a logged
//! skip, and a failed cycle never stops the schedule.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::ingest::{CycleOutcome, PipelineRunner};

pub struct RefreshScheduler {
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Spawn the tick loop. The first tick fires immediately.
    pub fn start(runner: Arc<PipelineRunner>, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                // The cycle runs detached so the ticker stays on cadence. A
                // tick landing while a cycle is still in flight is refused by
                // the single-flight guard and logged as skipped — it is never
                // queued up behind the running cycle.
                let runner = Arc::clone(&runner);
                tokio::spawn(async move {
                    let outcome: CycleOutcome = runner.run_if_idle().await;
                    info!(target: "pipeline", outcome = ?outcome, "scheduler tick");
                });
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Abort the tick loop. An in-flight cycle's guard releases on drop, so
    /// a later manual trigger is never wedged by a stopped scheduler.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
