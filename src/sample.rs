//! sample.rs — built-in bootstrap dataset: six party-tagged sample articles
//! plus five sample candidate posts. Serves as the first-ever snapshot and
//! as the fallback when total failure happens before any success; always
//! flagged `sample_data: true`.
//!
//! Items run through the normal classifier, so the tag invariant holds for
//! the sample exactly as it does for live data.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::classify::Classifier;
use crate::ingest::{news_item_id, truncate_summary, SUMMARY_CAP};
use crate::model::{ContentItem, Engagement, PartyTag, Snapshot};

struct SampleArticle {
    title: &'static str,
    summary: &'static str,
    url: &'static str,
    source: &'static str,
    date: &'static str,
}

struct SamplePost {
    native_id: &'static str,
    text: &'static str,
    created_at: &'static str,
    username: &'static str,
    display_name: &'static str,
    party: PartyTag,
    likes: u64,
    shares: u64,
    replies: u64,
}

const ARTICLES: [SampleArticle; 6] = [
    SampleArticle {
        title: "自民党、次期衆院選に向けて候補者調整を本格化",
        summary: "自民党は2025年2月の衆議院選挙に向けて、各選挙区での候補者調整を本格化させている。特に激戦区では現職議員の再選に向けた戦略を練り直している。",
        url: "https://example.com/news/1",
        source: "政治新聞",
        date: "2025-01-22T09:00:00+09:00",
    },
    SampleArticle {
        title: "立憲民主党、野党共闘の枠組み構築を急ぐ",
        summary: "立憲民主党は他の野党との選挙協力について協議を重ねており、候補者の一本化に向けた調整を進めている。",
        url: "https://example.com/news/2",
        source: "朝日新聞",
        date: "2025-01-21T18:00:00+09:00",
    },
    SampleArticle {
        title: "公明党、重点政策として子育て支援を前面に",
        summary: "公明党は次期衆院選の重点政策として、子育て支援の拡充を掲げる方針を固めた。教育費の負担軽減などを具体的な政策として打ち出す。",
        url: "https://example.com/news/3",
        source: "読売新聞",
        date: "2025-01-21T10:00:00+09:00",
    },
    SampleArticle {
        title: "日本維新の会、関西圏での議席拡大を目指す",
        summary: "日本維新の会は関西圏を中心に議席の拡大を図る戦略を発表。地方分権の推進を主要な争点として位置づけている。",
        url: "https://example.com/news/4",
        source: "毎日新聞",
        date: "2025-01-20T15:00:00+09:00",
    },
    SampleArticle {
        title: "国民民主党、エネルギー政策で独自色を強調",
        summary: "国民民主党は原発政策について現実的なアプローチを取る姿勢を示し、他党との差別化を図っている。",
        url: "https://example.com/news/5",
        source: "日経新聞",
        date: "2025-01-20T09:00:00+09:00",
    },
    SampleArticle {
        title: "共産党、格差是正を最重要課題に位置づけ",
        summary: "日本共産党は所得格差の是正を最重要課題として掲げ、富裕層への課税強化などの政策を提案している。",
        url: "https://example.com/news/6",
        source: "しんぶん赤旗",
        date: "2025-01-19T12:00:00+09:00",
    },
];

const POSTS: [SamplePost; 5] = [
    SamplePost {
        native_id: "1234567890",
        text: "本日、地元の商店街を視察しました。中小企業支援の重要性を改めて実感。具体的な政策を検討中です。 #地方創生 #中小企業支援",
        created_at: "2025-01-22T10:30:00+09:00",
        username: "yamada_taro_official",
        display_name: "山田太郎",
        party: PartyTag::Ldp,
        likes: 45,
        shares: 12,
        replies: 8,
    },
    SamplePost {
        native_id: "1234567891",
        text: "子育て支援の拡充について、保育園の待機児童問題解決に向けた具体案を発表しました。すべての子どもが安心して成長できる社会を目指します。",
        created_at: "2025-01-22T09:15:00+09:00",
        username: "suzuki_hanako_cdp",
        display_name: "鈴木花子",
        party: PartyTag::Cdp,
        likes: 67,
        shares: 23,
        replies: 15,
    },
    SamplePost {
        native_id: "1234567892",
        text: "行政のデジタル化推進について議論しました。効率的な行政サービスで市民の皆様の利便性向上を図ります。 #DX #行政改革",
        created_at: "2025-01-22T08:45:00+09:00",
        username: "takahashi_ishin",
        display_name: "高橋次郎",
        party: PartyTag::Ishin,
        likes: 34,
        shares: 9,
        replies: 6,
    },
    SamplePost {
        native_id: "1234567893",
        text: "地域経済の活性化について地元企業の皆様と意見交換。関西経済圏の発展に向けた取り組みを強化していきます。",
        created_at: "2025-01-21T16:20:00+09:00",
        username: "nakamura_osaka",
        display_name: "中村大阪",
        party: PartyTag::Ishin,
        likes: 28,
        shares: 7,
        replies: 4,
    },
    SamplePost {
        native_id: "1234567894",
        text: "農業支援政策について農家の皆様からご意見をいただきました。持続可能な農業の発展に向けて全力で取り組みます。 #農業 #地方創生",
        created_at: "2025-01-21T14:10:00+09:00",
        username: "sato_hokkaido",
        display_name: "佐藤北海",
        party: PartyTag::Ldp,
        likes: 52,
        shares: 18,
        replies: 11,
    },
];

fn parse_date(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build the bootstrap snapshot. Deterministic apart from `generated_at`.
pub fn bootstrap_snapshot(classifier: &Classifier) -> Snapshot {
    let mut items = Vec::with_capacity(ARTICLES.len() + POSTS.len());

    for a in &ARTICLES {
        let combined = format!("{} {}", a.title, a.summary);
        items.push(ContentItem {
            id: news_item_id(a.url),
            title: a.title.to_string(),
            summary: truncate_summary(a.summary, SUMMARY_CAP),
            url: a.url.to_string(),
            source_label: a.source.to_string(),
            published_at: parse_date(a.date),
            tags: classifier.party_tags(&combined),
            politically_relevant: true,
            image_url: None,
            engagement: None,
        });
    }

    for p in &POSTS {
        // Same rule as the live social path: the account's affiliation
        // always rides along with any text-matched tags.
        let mut tags = classifier.party_tags(p.text);
        tags.insert(p.party);
        if tags.len() > 1 {
            tags.remove(&PartyTag::Other);
        }
        items.push(ContentItem {
            id: format!("{}-{}", p.username, p.native_id),
            title: format!("{} (@{})", p.display_name, p.username),
            summary: truncate_summary(p.text, SUMMARY_CAP),
            url: format!("https://twitter.com/{}/status/{}", p.username, p.native_id),
            source_label: p.display_name.to_string(),
            published_at: parse_date(p.created_at),
            tags,
            politically_relevant: classifier.post_is_relevant(p.text),
            image_url: None,
            engagement: Some(Engagement {
                likes: p.likes,
                shares: p.shares,
                replies: p.replies,
            }),
        });
    }

    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    Snapshot {
        items,
        generated_at: Utc::now(),
        source_errors: BTreeMap::new(),
        sample_data: true,
    }
}
