//! # Keyword classifier
//!
//! Three fixed keyword dictionaries drive the pipeline:
//!
//! - the **relevance** set gates news items before they enter the pipeline;
//! - the **party** sets map item text to zero-or-more [`PartyTag`]s;
//! - the **topic** set computes the informational relevance flag on posts.
//!
//! All matching is plain case- and form-sensitive substring search — no
//! stemming, no fuzzy matching. Every party set is evaluated independently,
//! so an article naming two parties carries both tags; an item matching
//! nothing carries exactly the `other` sentinel.
//!
//! Dictionaries ship as a built-in seed and can be replaced from a TOML file
//! (`config/classifier.toml`, path overridable via env). A section left out
//! of the file keeps its seed.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::model::PartyTag;

pub const DEFAULT_CLASSIFIER_CONFIG_PATH: &str = "config/classifier.toml";
pub const ENV_CLASSIFIER_CONFIG_PATH: &str = "CLASSIFIER_CONFIG_PATH";

#[derive(Debug, Clone, Default, Deserialize)]
struct KeywordSection {
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ClassifierFile {
    #[serde(default)]
    relevance: KeywordSection,
    #[serde(default)]
    topics: KeywordSection,
    #[serde(default)]
    parties: BTreeMap<String, Vec<String>>,
}

/// Compiled dictionaries. Cheap to clone, read-only after construction.
#[derive(Debug, Clone)]
pub struct Classifier {
    relevance_keywords: Vec<String>,
    topic_keywords: Vec<String>,
    /// In [`PartyTag::PARTIES`] order so evaluation is deterministic.
    party_keywords: Vec<(PartyTag, Vec<String>)>,
}

impl Classifier {
    /// Built-in dictionaries matching the production frontend.
    pub fn seed() -> Self {
        let relevance = [
            "選挙",
            "衆議院",
            "政党",
            "自民党",
            "立憲民主党",
            "公明党",
            "国民民主党",
            "共産党",
            "維新",
            "れいわ",
            "参政党",
            "政治",
            "国会",
            "議員",
            "候補者",
            "投票",
            "選挙区",
        ];
        let topics = [
            "政治",
            "選挙",
            "政策",
            "公約",
            "国会",
            "議会",
            "法案",
            "予算",
            "経済",
            "教育",
            "医療",
            "福祉",
            "環境",
            "外交",
            "防衛",
            "憲法",
            "税制",
            "年金",
            "子育て",
            "高齢者",
            "働き方",
            "地方創生",
        ];
        let parties: [(PartyTag, &[&str]); 8] = [
            (PartyTag::Ldp, &["自民党", "自由民主党", "LDP", "岸田", "茂木"]),
            (PartyTag::Cdp, &["立憲民主党", "立憲", "枝野", "泉"]),
            (PartyTag::Komeito, &["公明党", "山口"]),
            (PartyTag::Dpfp, &["国民民主党", "玉木"]),
            (PartyTag::Jcp, &["共産党", "日本共産党", "志位"]),
            (PartyTag::Ishin, &["日本維新の会", "維新", "馬場"]),
            (PartyTag::Reiwa, &["れいわ新選組", "れいわ", "山本太郎"]),
            (PartyTag::Sanseito, &["参政党", "神谷"]),
        ];

        Self {
            relevance_keywords: relevance.iter().map(|s| s.to_string()).collect(),
            topic_keywords: topics.iter().map(|s| s.to_string()).collect(),
            party_keywords: parties
                .iter()
                .map(|(tag, kws)| (*tag, kws.iter().map(|s| s.to_string()).collect()))
                .collect(),
        }
    }

    /// Build from a TOML string. Sections that are absent or empty keep the
    /// seed dictionaries; a `[parties]` table replaces the whole party map.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: ClassifierFile = toml::from_str(toml_str).context("parsing classifier config")?;
        let seed = Self::seed();

        let relevance_keywords = if file.relevance.keywords.is_empty() {
            seed.relevance_keywords
        } else {
            clean_keywords(file.relevance.keywords)
        };
        let topic_keywords = if file.topics.keywords.is_empty() {
            seed.topic_keywords
        } else {
            clean_keywords(file.topics.keywords)
        };

        let party_keywords = if file.parties.is_empty() {
            seed.party_keywords
        } else {
            let mut by_tag: BTreeMap<PartyTag, Vec<String>> = BTreeMap::new();
            for (code, kws) in file.parties {
                let tag = PartyTag::from_code(&code)
                    .ok_or_else(|| anyhow!("unknown party code `{code}` in classifier config"))?;
                if tag == PartyTag::Other {
                    return Err(anyhow!("the sentinel tag `other` takes no keywords"));
                }
                by_tag.insert(tag, clean_keywords(kws));
            }
            PartyTag::PARTIES
                .iter()
                .map(|tag| (*tag, by_tag.remove(tag).unwrap_or_default()))
                .collect()
        };

        Ok(Self {
            relevance_keywords,
            topic_keywords,
            party_keywords,
        })
    }

    /// Load using env path + fallbacks:
    /// 1) `$CLASSIFIER_CONFIG_PATH`
    /// 2) `config/classifier.toml`
    /// 3) built-in seed
    ///
    /// A present-but-broken file logs a warning and falls back to the seed
    /// rather than taking the service down.
    pub fn load() -> Self {
        let path = std::env::var(ENV_CLASSIFIER_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CLASSIFIER_CONFIG_PATH));
        match fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = ?e, path = %path.display(), "invalid classifier config, using seed");
                    Self::seed()
                }
            },
            Err(_) => Self::seed(),
        }
    }

    /// News-path gate: keep the item iff any relevance keyword occurs in the
    /// combined title+summary text.
    pub fn news_is_relevant(&self, text: &str) -> bool {
        self.relevance_keywords.iter().any(|kw| text.contains(kw))
    }

    /// Informational flag for posts; never used to drop items.
    pub fn post_is_relevant(&self, text: &str) -> bool {
        self.topic_keywords.iter().any(|kw| text.contains(kw))
    }

    /// Map text to its party tags. Each party's keyword list is evaluated on
    /// its own (no short-circuit across parties), so multi-tagging falls out
    /// naturally. No match at all yields exactly `{other}`.
    pub fn party_tags(&self, text: &str) -> BTreeSet<PartyTag> {
        let mut tags = BTreeSet::new();
        for (tag, keywords) in &self.party_keywords {
            if keywords.iter().any(|kw| text.contains(kw)) {
                tags.insert(*tag);
            }
        }
        if tags.is_empty() {
            tags.insert(PartyTag::Other);
        }
        tags
    }
}

fn clean_keywords(items: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && seen.insert(t.to_string()) {
            out.push(t.to_string());
        }
    }
    out
}
