// src/ingest/types.rs
use chrono::{DateTime, Utc};

use crate::model::{ContentItem, ErrorSummary};

/// Raw result of one fetch attempt, before any parsing. Exactly one of
/// `payload` / `error` is set; the normalizers consume `payload`.
#[derive(Debug, Clone)]
pub struct RawFetchResult {
    pub source_id: String,
    pub payload: Option<String>,
    pub error: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl RawFetchResult {
    pub fn ok(source_id: impl Into<String>, payload: String, fetched_at: DateTime<Utc>) -> Self {
        Self {
            source_id: source_id.into(),
            payload: Some(payload),
            error: None,
            fetched_at,
        }
    }

    pub fn err(source_id: impl Into<String>, message: String, fetched_at: DateTime<Utc>) -> Self {
        Self {
            source_id: source_id.into(),
            payload: None,
            error: Some(message),
            fetched_at,
        }
    }
}

/// What one source contributed to a cycle: its normalized items, or the
/// reason it contributed nothing.
#[derive(Debug, Clone)]
pub struct SourceOutput {
    pub source_id: String,
    pub outcome: FetchOutcome,
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Items(Vec<ContentItem>),
    Failed { message: String, occurred_at: DateTime<Utc> },
}

impl SourceOutput {
    pub fn items(source_id: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            source_id: source_id.into(),
            outcome: FetchOutcome::Items(items),
        }
    }

    pub fn failed(
        source_id: impl Into<String>,
        message: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            outcome: FetchOutcome::Failed {
                message: message.into(),
                occurred_at,
            },
        }
    }

    pub fn error_summary(&self) -> Option<ErrorSummary> {
        match &self.outcome {
            FetchOutcome::Items(_) => None,
            FetchOutcome::Failed {
                message,
                occurred_at,
            } => Some(ErrorSummary {
                source_id: self.source_id.clone(),
                message: message.clone(),
                occurred_at: *occurred_at,
            }),
        }
    }
}
