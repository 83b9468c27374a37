// src/ingest/registry.rs
//! Source registry: the fixed list of feeds and tracked candidate accounts
//! a cycle fans out over. Loaded once at startup from `config/sources.toml`
//! (path overridable via `SOURCES_CONFIG_PATH`), falling back to a built-in
//! seed matching the production sources. Read-only afterwards.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::model::PartyTag;

pub const DEFAULT_SOURCES_CONFIG_PATH: &str = "config/sources.toml";
pub const ENV_SOURCES_CONFIG_PATH: &str = "SOURCES_CONFIG_PATH";

/// Synthetic source id carrying path-level social errors (e.g. a missing
/// bearer token) in a snapshot's error map.
pub const SOCIAL_PATH_ID: &str = "social";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Feed {
        url: String,
    },
    SocialAccount {
        username: String,
        display_name: String,
        party: PartyTag,
    },
}

/// One external origin of content. `id` keys the snapshot error map; `label`
/// becomes `source_label` on every item the source yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub id: String,
    pub label: String,
    pub kind: SourceKind,
}

#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    feeds: Vec<FeedEntry>,
    #[serde(default)]
    accounts: Vec<AccountEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    id: String,
    url: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    username: String,
    display_name: String,
    party: String,
}

impl SourceRegistry {
    /// Built-in seed matching the production deployment: the two politics
    /// feeds plus the five tracked candidate accounts.
    pub fn seed() -> Self {
        let feeds = [
            ("nhk", "https://www3.nhk.or.jp/rss/news/cat6.xml", "NHKニュース"),
            (
                "yahoo",
                "https://news.yahoo.co.jp/rss/topics/politics.xml",
                "Yahoo!ニュース",
            ),
        ];
        let accounts = [
            ("yamada_taro_official", "山田太郎", PartyTag::Ldp),
            ("suzuki_hanako_cdp", "鈴木花子", PartyTag::Cdp),
            ("takahashi_ishin", "高橋次郎", PartyTag::Ishin),
            ("nakamura_osaka", "中村大阪", PartyTag::Ishin),
            ("sato_hokkaido", "佐藤北海", PartyTag::Ldp),
        ];

        let mut sources = Vec::new();
        for (id, url, label) in feeds {
            sources.push(Source {
                id: id.to_string(),
                label: label.to_string(),
                kind: SourceKind::Feed {
                    url: url.to_string(),
                },
            });
        }
        for (username, display_name, party) in accounts {
            sources.push(Source {
                id: username.to_string(),
                label: display_name.to_string(),
                kind: SourceKind::SocialAccount {
                    username: username.to_string(),
                    display_name: display_name.to_string(),
                    party,
                },
            });
        }
        Self { sources }
    }

    /// Parse a TOML sources file. Invalid entries (blank fields, unknown
    /// party codes) are configuration errors: skipped with a warning, they
    /// never take the whole registry down.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: SourcesFile = toml::from_str(toml_str).context("parsing sources config")?;

        let mut sources = Vec::new();
        for f in file.feeds {
            if f.id.trim().is_empty() || f.url.trim().is_empty() || f.label.trim().is_empty() {
                warn!(id = %f.id, "skipping feed entry with blank field");
                continue;
            }
            sources.push(Source {
                id: f.id,
                label: f.label,
                kind: SourceKind::Feed { url: f.url },
            });
        }
        for a in file.accounts {
            if a.username.trim().is_empty() || a.display_name.trim().is_empty() {
                warn!(username = %a.username, "skipping account entry with blank field");
                continue;
            }
            let Some(party) = PartyTag::from_code(&a.party) else {
                warn!(username = %a.username, party = %a.party, "skipping account with unknown party code");
                continue;
            };
            sources.push(Source {
                id: a.username.clone(),
                label: a.display_name.clone(),
                kind: SourceKind::SocialAccount {
                    username: a.username,
                    display_name: a.display_name,
                    party,
                },
            });
        }
        Ok(Self { sources })
    }

    /// Load using env path + fallbacks:
    /// 1) `$SOURCES_CONFIG_PATH`
    /// 2) `config/sources.toml`
    /// 3) built-in seed
    pub fn load() -> Self {
        let path = std::env::var(ENV_SOURCES_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOURCES_CONFIG_PATH));
        match fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = ?e, path = %path.display(), "invalid sources config, using seed");
                    Self::seed()
                }
            },
            Err(_) => Self::seed(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// All sources, in registry order (feeds first, then accounts). This
    /// order is the dedup and ranking tie-break order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn feeds(&self) -> impl Iterator<Item = &Source> {
        self.sources
            .iter()
            .filter(|s| matches!(s.kind, SourceKind::Feed { .. }))
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Source> {
        self.sources
            .iter()
            .filter(|s| matches!(s.kind, SourceKind::SocialAccount { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
