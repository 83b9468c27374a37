//! directory.rs — hardcoded electoral-district/candidate records and the
//! stub per-party seat-prediction table. Pure static data served read-only
//! by the HTTP layer; nothing here is computed from live content.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::model::PartyTag;

#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub id: u32,
    pub name: &'static str,
    pub party: PartyTag,
    pub age: u32,
    pub experience: &'static str,
    pub policies: &'static [&'static str],
    pub twitter: &'static str,
    pub is_incumbent: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct District {
    pub id: u32,
    pub name: &'static str,
    pub prefecture: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SeatPrediction {
    pub party: PartyTag,
    pub current_seats: u32,
    pub predicted_seats: u32,
    pub confidence: f64,
}

static DISTRICTS: Lazy<Vec<District>> = Lazy::new(|| {
    vec![
        District {
            id: 1,
            name: "北海道1区",
            prefecture: "北海道",
            lat: 43.0642,
            lng: 141.3469,
            candidates: vec![
                Candidate {
                    id: 101,
                    name: "佐藤北海",
                    party: PartyTag::Ldp,
                    age: 52,
                    experience: "元道議会議員",
                    policies: &["地域経済活性化", "農業支援", "観光振興"],
                    twitter: "@sato_hokkaido",
                    is_incumbent: true,
                },
                Candidate {
                    id: 102,
                    name: "田中雪子",
                    party: PartyTag::Cdp,
                    age: 45,
                    experience: "元市議会議員",
                    policies: &["子育て支援", "環境保護", "格差是正"],
                    twitter: "@tanaka_yukiko",
                    is_incumbent: false,
                },
            ],
        },
        District {
            id: 2,
            name: "東京1区",
            prefecture: "東京都",
            lat: 35.6762,
            lng: 139.6503,
            candidates: vec![
                Candidate {
                    id: 201,
                    name: "山田太郎",
                    party: PartyTag::Ldp,
                    age: 48,
                    experience: "元官僚",
                    policies: &["経済成長", "規制改革", "デジタル化推進"],
                    twitter: "@yamada_taro_official",
                    is_incumbent: true,
                },
                Candidate {
                    id: 202,
                    name: "鈴木花子",
                    party: PartyTag::Cdp,
                    age: 42,
                    experience: "弁護士",
                    policies: &["人権保護", "司法制度改革", "女性活躍推進"],
                    twitter: "@suzuki_hanako_cdp",
                    is_incumbent: false,
                },
                Candidate {
                    id: 203,
                    name: "高橋次郎",
                    party: PartyTag::Ishin,
                    age: 39,
                    experience: "元起業家",
                    policies: &["行政改革", "スタートアップ支援", "教育改革"],
                    twitter: "@takahashi_ishin",
                    is_incumbent: false,
                },
            ],
        },
        District {
            id: 3,
            name: "大阪1区",
            prefecture: "大阪府",
            lat: 34.6937,
            lng: 135.5023,
            candidates: vec![
                Candidate {
                    id: 301,
                    name: "中村大阪",
                    party: PartyTag::Ishin,
                    age: 44,
                    experience: "元府議会議員",
                    policies: &["地方分権", "関西経済圏", "万博成功"],
                    twitter: "@nakamura_osaka",
                    is_incumbent: true,
                },
                Candidate {
                    id: 302,
                    name: "伊藤関西",
                    party: PartyTag::Ldp,
                    age: 50,
                    experience: "元商工会議所職員",
                    policies: &["中小企業支援", "商業振興", "インバウンド"],
                    twitter: "@ito_kansai",
                    is_incumbent: false,
                },
            ],
        },
        District {
            id: 4,
            name: "愛知1区",
            prefecture: "愛知県",
            lat: 35.1815,
            lng: 136.9066,
            candidates: vec![
                Candidate {
                    id: 401,
                    name: "加藤製造",
                    party: PartyTag::Ldp,
                    age: 55,
                    experience: "元経営者",
                    policies: &["製造業支援", "技術革新", "輸出促進"],
                    twitter: "@kato_seizo",
                    is_incumbent: true,
                },
                Candidate {
                    id: 402,
                    name: "渡辺労働",
                    party: PartyTag::Cdp,
                    age: 47,
                    experience: "元労働組合幹部",
                    policies: &["労働者保護", "賃金向上", "働き方改革"],
                    twitter: "@watanabe_rodo",
                    is_incumbent: false,
                },
            ],
        },
        District {
            id: 5,
            name: "福岡1区",
            prefecture: "福岡県",
            lat: 33.5904,
            lng: 130.4017,
            candidates: vec![
                Candidate {
                    id: 501,
                    name: "松本九州",
                    party: PartyTag::Ldp,
                    age: 49,
                    experience: "元県議会議員",
                    policies: &["九州経済圏", "アジア交流", "地方創生"],
                    twitter: "@matsumoto_kyushu",
                    is_incumbent: true,
                },
                Candidate {
                    id: 502,
                    name: "林アジア",
                    party: PartyTag::Cdp,
                    age: 43,
                    experience: "元国際機関職員",
                    policies: &["国際協力", "多文化共生", "平和外交"],
                    twitter: "@hayashi_asia",
                    is_incumbent: false,
                },
            ],
        },
    ]
});

/// Stub table; not computed from polling data.
static PREDICTIONS: Lazy<Vec<SeatPrediction>> = Lazy::new(|| {
    vec![
        SeatPrediction {
            party: PartyTag::Ldp,
            current_seats: 247,
            predicted_seats: 220,
            confidence: 0.85,
        },
        SeatPrediction {
            party: PartyTag::Cdp,
            current_seats: 98,
            predicted_seats: 115,
            confidence: 0.80,
        },
        SeatPrediction {
            party: PartyTag::Ishin,
            current_seats: 41,
            predicted_seats: 48,
            confidence: 0.75,
        },
        SeatPrediction {
            party: PartyTag::Komeito,
            current_seats: 32,
            predicted_seats: 30,
            confidence: 0.82,
        },
        SeatPrediction {
            party: PartyTag::Jcp,
            current_seats: 10,
            predicted_seats: 11,
            confidence: 0.78,
        },
        SeatPrediction {
            party: PartyTag::Dpfp,
            current_seats: 10,
            predicted_seats: 14,
            confidence: 0.72,
        },
    ]
});

pub fn districts() -> &'static [District] {
    &DISTRICTS
}

pub fn seat_predictions() -> &'static [SeatPrediction] {
    &PREDICTIONS
}
