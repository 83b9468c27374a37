//! # Canonical data model
//! The normalized shapes every pipeline stage hands around: party tags,
//! content items, per-source error summaries, and the published snapshot.
//!
//! Items are constructed by the normalizers, snapshots only by the
//! aggregator; everything here is plain immutable data once built.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed set of party codes plus the `other` sentinel for items that match
/// no party keyword. Codes follow the frontend convention (`ldp`, `cdp`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyTag {
    Ldp,
    Cdp,
    Komeito,
    Dpfp,
    Jcp,
    Ishin,
    Reiwa,
    Sanseito,
    Other,
}

impl PartyTag {
    /// All real parties, in evaluation order. The sentinel is excluded; it is
    /// assigned only when no entry here matches.
    pub const PARTIES: [PartyTag; 8] = [
        PartyTag::Ldp,
        PartyTag::Cdp,
        PartyTag::Komeito,
        PartyTag::Dpfp,
        PartyTag::Jcp,
        PartyTag::Ishin,
        PartyTag::Reiwa,
        PartyTag::Sanseito,
    ];

    /// Lowercase wire code, matching the serde representation.
    pub fn code(self) -> &'static str {
        match self {
            PartyTag::Ldp => "ldp",
            PartyTag::Cdp => "cdp",
            PartyTag::Komeito => "komeito",
            PartyTag::Dpfp => "dpfp",
            PartyTag::Jcp => "jcp",
            PartyTag::Ishin => "ishin",
            PartyTag::Reiwa => "reiwa",
            PartyTag::Sanseito => "sanseito",
            PartyTag::Other => "other",
        }
    }

    /// Japanese display name, as shown in the candidate directory.
    pub fn name_ja(self) -> &'static str {
        match self {
            PartyTag::Ldp => "自民党",
            PartyTag::Cdp => "立憲民主党",
            PartyTag::Komeito => "公明党",
            PartyTag::Dpfp => "国民民主党",
            PartyTag::Jcp => "共産党",
            PartyTag::Ishin => "日本維新の会",
            PartyTag::Reiwa => "れいわ新選組",
            PartyTag::Sanseito => "参政党",
            PartyTag::Other => "その他",
        }
    }

    /// Parse a wire code. Unknown strings (and `all`) return `None`.
    pub fn from_code(code: &str) -> Option<PartyTag> {
        match code {
            "ldp" => Some(PartyTag::Ldp),
            "cdp" => Some(PartyTag::Cdp),
            "komeito" => Some(PartyTag::Komeito),
            "dpfp" => Some(PartyTag::Dpfp),
            "jcp" => Some(PartyTag::Jcp),
            "ishin" => Some(PartyTag::Ishin),
            "reiwa" => Some(PartyTag::Reiwa),
            "sanseito" => Some(PartyTag::Sanseito),
            "other" => Some(PartyTag::Other),
            _ => None,
        }
    }
}

/// Public engagement counters for a social post. `shares` carries the
/// platform's repost/retweet count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u64,
    pub shares: u64,
    pub replies: u64,
}

/// One normalized unit of aggregated content, either a news article or a
/// candidate post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Stable id: news items hash the article URL, posts use
    /// `{username}-{native_id}`. Unique within a snapshot.
    pub id: String,
    pub title: String,
    /// Plain-text summary, capped at the configured length with a trailing
    /// ellipsis when the source text was longer.
    pub summary: String,
    pub url: String,
    /// Display label of the originating source (feed name or account name).
    pub source_label: String,
    pub published_at: DateTime<Utc>,
    /// Never empty: falls back to [`PartyTag::Other`] when no keyword matched.
    pub tags: BTreeSet<PartyTag>,
    /// News items passed the relevance filter, so this is `true` for them by
    /// construction; for posts it is informational and never drops the item.
    pub politically_relevant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Engagement>,
}

impl ContentItem {
    pub fn has_tag(&self, tag: PartyTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Failure record for one source within one aggregation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub source_id: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// One complete, ranked, deduplicated aggregation result. Constructed by the
/// aggregator, swapped into the cache as a whole, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ordered descending by `published_at`; ties keep source registry order.
    pub items: Vec<ContentItem>,
    pub generated_at: DateTime<Utc>,
    /// Sources that contributed no items this cycle, keyed by source id.
    /// The synthetic key `social` reports a path-level configuration error.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub source_errors: BTreeMap<String, ErrorSummary>,
    /// `true` only for the built-in bootstrap dataset, so consumers can
    /// signal degraded data to end users.
    #[serde(default)]
    pub sample_data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_codes_round_trip() {
        for tag in PartyTag::PARTIES {
            assert_eq!(PartyTag::from_code(tag.code()), Some(tag));
        }
        assert_eq!(PartyTag::from_code("other"), Some(PartyTag::Other));
        assert_eq!(PartyTag::from_code("all"), None);
        assert_eq!(PartyTag::from_code("LDP"), None); // codes are lowercase
    }

    #[test]
    fn party_tag_serializes_as_code() {
        let json = serde_json::to_string(&PartyTag::Ishin).unwrap();
        assert_eq!(json, "\"ishin\"");
        let back: PartyTag = serde_json::from_str("\"reiwa\"").unwrap();
        assert_eq!(back, PartyTag::Reiwa);
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let item = ContentItem {
            id: "abc".into(),
            title: "t".into(),
            summary: "s".into(),
            url: "https://example.com/a".into(),
            source_label: "NHKニュース".into(),
            published_at: Utc::now(),
            tags: BTreeSet::from([PartyTag::Other]),
            politically_relevant: true,
            image_url: None,
            engagement: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("image_url"));
        assert!(!json.contains("engagement"));
    }
}
