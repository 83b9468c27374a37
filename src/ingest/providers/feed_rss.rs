//! RSS feed path: fetch a feed with timeout isolation, then normalize its
//! entries into `ContentItem`s. Entries missing title or link are dropped;
//! irrelevant entries are gated out before classification.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::classify::Classifier;
use crate::ingest::registry::{Source, SourceKind};
use crate::ingest::types::RawFetchResult;
use crate::ingest::{news_item_id, normalize_text, truncate_summary, SUMMARY_CAP};
use crate::model::ContentItem;

/// UA the original crawler identified itself with; some feeds 403 without one.
pub const FEED_USER_AGENT: &str = "Mozilla/5.0 (compatible; Election-Site-Bot/1.0)";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    enclosure: Option<Enclosure>,
}

#[derive(Debug, Deserialize)]
struct Enclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    mime: Option<String>,
}

/// Download one feed. All transport/timeout/status failures come back as
/// `error` on the result, never as `Err`.
pub async fn fetch_feed(
    client: &reqwest::Client,
    source: &Source,
    timeout: std::time::Duration,
) -> RawFetchResult {
    let SourceKind::Feed { url } = &source.kind else {
        return RawFetchResult::err(&source.id, "source is not a feed".to_string(), Utc::now());
    };

    let resp = client
        .get(url)
        .timeout(timeout)
        .header(reqwest::header::USER_AGENT, FEED_USER_AGENT)
        .send()
        .await;

    let fetched_at = Utc::now();
    match resp {
        Ok(resp) => {
            if !resp.status().is_success() {
                return RawFetchResult::err(
                    &source.id,
                    format!("http status {}", resp.status()),
                    fetched_at,
                );
            }
            match resp.text().await {
                Ok(body) => RawFetchResult::ok(&source.id, body, fetched_at),
                Err(e) => RawFetchResult::err(&source.id, format!("reading body: {e}"), fetched_at),
            }
        }
        Err(e) => RawFetchResult::err(&source.id, format!("fetch failed: {e}"), fetched_at),
    }
}

/// Parse a fetched feed payload into content items.
///
/// Returns `Err` only when the payload as a whole is unparsable; a malformed
/// single entry is dropped and the rest of the feed survives.
pub fn normalize_feed(
    source: &Source,
    raw: &RawFetchResult,
    classifier: &Classifier,
) -> Result<Vec<ContentItem>> {
    let payload = raw
        .payload
        .as_deref()
        .context("normalize_feed called without payload")?;

    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(payload);
    let rss: Rss = from_str(&xml_clean)
        .with_context(|| format!("parsing rss xml from {}", source.id))?;

    let mut out = Vec::with_capacity(rss.channel.item.len());
    for it in rss.channel.item {
        // Required fields; an entry without them is dropped, not substituted.
        let (Some(title_raw), Some(link)) = (it.title, it.link) else {
            continue;
        };
        let title = normalize_text(&title_raw);
        if title.is_empty() {
            continue;
        }

        let description_raw = it.description.unwrap_or_default();
        let summary_full = normalize_text(&description_raw);

        // Relevance gate runs before classification and before dedup.
        let combined = format!("{title} {summary_full}");
        if !classifier.news_is_relevant(&combined) {
            continue;
        }

        let published_at = it
            .pub_date
            .as_deref()
            .and_then(parse_rfc2822)
            .unwrap_or(raw.fetched_at);

        out.push(ContentItem {
            id: news_item_id(&link),
            title,
            summary: truncate_summary(&summary_full, SUMMARY_CAP),
            url: link,
            source_label: source.label.clone(),
            published_at,
            tags: classifier.party_tags(&combined),
            politically_relevant: true,
            image_url: extract_image_url(it.enclosure.as_ref(), &description_raw),
            engagement: None,
        });
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("pipeline_parse_ms").record(ms);
    counter!("pipeline_items_parsed_total").increment(out.len() as u64);
    Ok(out)
}

// Feeds in the wild carry HTML entities that are undefined in XML and would
// abort the whole parse; replace them up front.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    let dt = OffsetDateTime::parse(ts, &Rfc2822).ok()?;
    DateTime::from_timestamp(dt.to_offset(UtcOffset::UTC).unix_timestamp(), 0)
}

/// Prefer an image enclosure; otherwise the first `<img src>` embedded in the
/// raw description markup; otherwise none.
fn extract_image_url(enclosure: Option<&Enclosure>, description_raw: &str) -> Option<String> {
    if let Some(enc) = enclosure {
        if let Some(url) = &enc.url {
            let is_image = enc
                .mime
                .as_deref()
                .map(|m| m.starts_with("image"))
                .unwrap_or(true);
            if is_image && !url.is_empty() {
                return Some(url.clone());
            }
        }
    }

    static RE_IMG: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src="([^">]+)""#).unwrap());
    RE_IMG
        .captures(description_raw)
        .map(|c| c[1].to_string())
}
