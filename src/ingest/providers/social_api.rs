//! Social path: X API v2 client for the tracked candidate accounts, plus the
//! normalizer mapping one API post to one `ContentItem`. Posts are enriched
//! with the account's display name and party from the registry; nothing is
//! re-derived from post text except the party tags and the topic flag.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Deserialize;

use crate::classify::Classifier;
use crate::ingest::registry::{Source, SourceKind};
use crate::ingest::types::RawFetchResult;
use crate::ingest::{normalize_text, truncate_summary, SUMMARY_CAP};
use crate::model::{ContentItem, Engagement};

const API_BASE: &str = "https://api.twitter.com/2";
/// Per-account page size; retweets and replies are excluded at the API.
const MAX_POSTS_PER_ACCOUNT: u32 = 10;

#[derive(Debug, Deserialize)]
struct UserLookup {
    data: UserData,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    data: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: String,
    text: String,
    created_at: Option<String>,
    public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Deserialize, Default)]
struct PublicMetrics {
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    reply_count: u64,
}

/// Fetch the latest posts for one tracked account. Two requests: username →
/// user id, then the posts page. Failures come back as `error` on the result.
pub async fn fetch_account_posts(
    client: &reqwest::Client,
    source: &Source,
    bearer_token: &str,
) -> RawFetchResult {
    let SourceKind::SocialAccount { username, .. } = &source.kind else {
        return RawFetchResult::err(&source.id, "source is not an account".to_string(), Utc::now());
    };

    match fetch_posts_payload(client, username, bearer_token).await {
        Ok(body) => RawFetchResult::ok(&source.id, body, Utc::now()),
        Err(e) => RawFetchResult::err(&source.id, format!("{e:#}"), Utc::now()),
    }
}

async fn fetch_posts_payload(
    client: &reqwest::Client,
    username: &str,
    bearer_token: &str,
) -> Result<String> {
    let user_resp = client
        .get(format!("{API_BASE}/users/by/username/{username}"))
        .bearer_auth(bearer_token)
        .send()
        .await
        .context("user lookup request")?;
    if !user_resp.status().is_success() {
        return Err(anyhow!("user lookup http status {}", user_resp.status()));
    }
    let user: UserLookup = user_resp.json().await.context("user lookup body")?;

    let max_results = MAX_POSTS_PER_ACCOUNT.to_string();
    let posts_resp = client
        .get(format!("{API_BASE}/users/{}/tweets", user.data.id))
        .bearer_auth(bearer_token)
        .query(&[
            ("tweet.fields", "created_at,public_metrics"),
            ("max_results", max_results.as_str()),
            ("exclude", "retweets,replies"),
        ])
        .send()
        .await
        .context("posts request")?;
    if !posts_resp.status().is_success() {
        return Err(anyhow!("posts http status {}", posts_resp.status()));
    }
    posts_resp.text().await.context("posts body")
}

/// Parse a fetched posts payload. One API post maps to exactly one item; the
/// topic flag is informational and never drops a post.
pub fn normalize_posts(
    source: &Source,
    raw: &RawFetchResult,
    classifier: &Classifier,
) -> Result<Vec<ContentItem>> {
    let SourceKind::SocialAccount {
        username,
        display_name,
        party,
    } = &source.kind
    else {
        return Err(anyhow!("source {} is not an account", source.id));
    };
    let payload = raw
        .payload
        .as_deref()
        .context("normalize_posts called without payload")?;

    let resp: PostsResponse = serde_json::from_str(payload)
        .with_context(|| format!("parsing posts json from {username}"))?;

    let mut out = Vec::with_capacity(resp.data.len());
    for post in resp.data {
        // Even an empty-text post (say, image-only) maps to an item; the
        // title still carries the account.
        let text = normalize_text(&post.text);

        let published_at = post
            .created_at
            .as_deref()
            .and_then(parse_rfc3339)
            .unwrap_or(raw.fetched_at);

        // The account's affiliation always rides along with text matches.
        // The sentinel only survives when it is the whole tag set.
        let mut tags = classifier.party_tags(&text);
        tags.insert(*party);
        if tags.len() > 1 {
            tags.remove(&crate::model::PartyTag::Other);
        }

        let engagement = post.public_metrics.map(|m| Engagement {
            likes: m.like_count,
            shares: m.retweet_count,
            replies: m.reply_count,
        });

        out.push(ContentItem {
            id: format!("{username}-{}", post.id),
            title: format!("{display_name} (@{username})"),
            summary: truncate_summary(&text, SUMMARY_CAP),
            url: format!("https://twitter.com/{username}/status/{}", post.id),
            source_label: display_name.clone(),
            published_at,
            tags,
            politically_relevant: classifier.post_is_relevant(&text),
            image_url: None,
            engagement,
        });
    }

    counter!("pipeline_items_parsed_total").increment(out.len() as u64);
    Ok(out)
}

fn parse_rfc3339(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
