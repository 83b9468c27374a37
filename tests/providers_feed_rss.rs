// tests/providers_feed_rss.rs
//
// Feed normalizer against a fixture: required-field drops, the relevance
// gate, party tagging, summary truncation, image preference, date fallback.

use chrono::{TimeZone, Utc};

use election_news_aggregator::classify::Classifier;
use election_news_aggregator::ingest::providers::feed_rss::normalize_feed;
use election_news_aggregator::ingest::registry::{Source, SourceKind};
use election_news_aggregator::ingest::types::RawFetchResult;
use election_news_aggregator::model::PartyTag;

const FIXTURE: &str = include_str!("fixtures/politics_rss.xml");

fn feed_source() -> Source {
    Source {
        id: "nhk".into(),
        label: "NHKニュース".into(),
        kind: SourceKind::Feed {
            url: "https://example.jp/rss.xml".into(),
        },
    }
}

fn fixture_raw() -> RawFetchResult {
    let fetched_at = Utc.with_ymd_and_hms(2025, 1, 23, 0, 0, 0).unwrap();
    RawFetchResult::ok("nhk", FIXTURE.to_string(), fetched_at)
}

#[test]
fn keeps_relevant_entries_and_drops_the_rest() {
    let items = normalize_feed(&feed_source(), &fixture_raw(), &Classifier::seed()).unwrap();

    // Six entries in the fixture: one irrelevant (baseball), one without a
    // link, one without a title. Three survive.
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.politically_relevant));
    assert!(items.iter().all(|i| i.source_label == "NHKニュース"));
}

#[test]
fn ruling_party_article_is_tagged_ldp_only() {
    let items = normalize_feed(&feed_source(), &fixture_raw(), &Classifier::seed()).unwrap();
    let item = items
        .iter()
        .find(|i| i.title == "自民党が新政策を発表")
        .unwrap();
    assert!(item.has_tag(PartyTag::Ldp));
    assert!(!item.has_tag(PartyTag::Cdp));
    assert_eq!(item.tags.len(), 1);
}

#[test]
fn article_naming_two_parties_is_multi_tagged() {
    let items = normalize_feed(&feed_source(), &fixture_raw(), &Classifier::seed()).unwrap();
    let item = items
        .iter()
        .find(|i| i.url == "https://example.jp/articles/diet-debate")
        .unwrap();
    assert!(item.has_tag(PartyTag::Cdp));
    assert!(item.has_tag(PartyTag::Ishin));
}

#[test]
fn unmatched_article_falls_back_to_the_sentinel() {
    let items = normalize_feed(&feed_source(), &fixture_raw(), &Classifier::seed()).unwrap();
    let item = items
        .iter()
        .find(|i| i.url == "https://example.jp/articles/redistricting")
        .unwrap();
    assert!(item.has_tag(PartyTag::Other));
    assert_eq!(item.tags.len(), 1);
}

#[test]
fn long_summaries_are_capped_with_an_ellipsis() {
    let items = normalize_feed(&feed_source(), &fixture_raw(), &Classifier::seed()).unwrap();
    let long = items
        .iter()
        .find(|i| i.url == "https://example.jp/articles/redistricting")
        .unwrap();
    assert_eq!(long.summary.chars().count(), 203);
    assert!(long.summary.ends_with("..."));

    let short = items
        .iter()
        .find(|i| i.title == "自民党が新政策を発表")
        .unwrap();
    assert!(!short.summary.ends_with("..."));
}

#[test]
fn image_prefers_enclosure_then_embedded_img() {
    let items = normalize_feed(&feed_source(), &fixture_raw(), &Classifier::seed()).unwrap();

    let with_enclosure = items
        .iter()
        .find(|i| i.title == "自民党が新政策を発表")
        .unwrap();
    assert_eq!(
        with_enclosure.image_url.as_deref(),
        Some("https://example.jp/images/ldp.jpg")
    );

    let with_img = items
        .iter()
        .find(|i| i.url == "https://example.jp/articles/diet-debate")
        .unwrap();
    assert_eq!(
        with_img.image_url.as_deref(),
        Some("https://example.jp/images/diet.png")
    );

    let without = items
        .iter()
        .find(|i| i.url == "https://example.jp/articles/redistricting")
        .unwrap();
    assert!(without.image_url.is_none());
}

#[test]
fn missing_pub_date_falls_back_to_fetch_time() {
    let raw = fixture_raw();
    let items = normalize_feed(&feed_source(), &raw, &Classifier::seed()).unwrap();

    let dated = items
        .iter()
        .find(|i| i.title == "自民党が新政策を発表")
        .unwrap();
    // Wed, 22 Jan 2025 10:30:00 +0900 == 01:30 UTC.
    assert_eq!(
        dated.published_at,
        Utc.with_ymd_and_hms(2025, 1, 22, 1, 30, 0).unwrap()
    );

    let undated = items
        .iter()
        .find(|i| i.url == "https://example.jp/articles/redistricting")
        .unwrap();
    assert_eq!(undated.published_at, raw.fetched_at);
}

#[test]
fn normalization_is_deterministic() {
    let classifier = Classifier::seed();
    let raw = fixture_raw();
    let first = normalize_feed(&feed_source(), &raw, &classifier).unwrap();
    let second = normalize_feed(&feed_source(), &raw, &classifier).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unparsable_payload_is_a_source_level_error() {
    let raw = RawFetchResult::ok("nhk", "this is not xml at all".to_string(), Utc::now());
    assert!(normalize_feed(&feed_source(), &raw, &Classifier::seed()).is_err());
}

#[test]
fn html_in_summaries_is_stripped_and_decoded() {
    let items = normalize_feed(&feed_source(), &fixture_raw(), &Classifier::seed()).unwrap();
    let item = items
        .iter()
        .find(|i| i.url == "https://example.jp/articles/diet-debate")
        .unwrap();
    assert_eq!(item.summary, "予算委員会で両党の議員が質疑に立った。");
}
