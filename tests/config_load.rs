// tests/config_load.rs
//
// Env-path loading for the sources and classifier config files. These tests
// mutate process env, so they are serialized.

use std::fs;

use election_news_aggregator::classify::{Classifier, ENV_CLASSIFIER_CONFIG_PATH};
use election_news_aggregator::ingest::registry::{SourceRegistry, ENV_SOURCES_CONFIG_PATH};
use election_news_aggregator::model::PartyTag;

#[serial_test::serial]
#[test]
fn sources_env_path_takes_precedence() {
    let path = std::env::temp_dir().join("ena_sources_env_test.toml");
    fs::write(
        &path,
        r#"
            [[feeds]]
            id = "local"
            url = "https://example.jp/rss.xml"
            label = "ローカルテスト"
        "#,
    )
    .unwrap();

    std::env::set_var(ENV_SOURCES_CONFIG_PATH, &path);
    let reg = SourceRegistry::load();
    std::env::remove_var(ENV_SOURCES_CONFIG_PATH);
    let _ = fs::remove_file(&path);

    assert_eq!(reg.sources().len(), 1);
    assert_eq!(reg.sources()[0].id, "local");
}

#[serial_test::serial]
#[test]
fn sources_fall_back_to_seed_when_env_points_nowhere() {
    std::env::set_var(ENV_SOURCES_CONFIG_PATH, "/definitely/not/here.toml");
    let reg = SourceRegistry::load();
    std::env::remove_var(ENV_SOURCES_CONFIG_PATH);

    // Seed: two feeds + five accounts.
    assert_eq!(reg.sources().len(), 7);
    assert_eq!(reg.feeds().count(), 2);
}

#[serial_test::serial]
#[test]
fn broken_sources_file_falls_back_to_seed() {
    let path = std::env::temp_dir().join("ena_sources_broken_test.toml");
    fs::write(&path, "feeds = 12").unwrap();

    std::env::set_var(ENV_SOURCES_CONFIG_PATH, &path);
    let reg = SourceRegistry::load();
    std::env::remove_var(ENV_SOURCES_CONFIG_PATH);
    let _ = fs::remove_file(&path);

    assert_eq!(reg.sources().len(), 7);
}

#[serial_test::serial]
#[test]
fn classifier_env_path_takes_precedence() {
    let path = std::env::temp_dir().join("ena_classifier_env_test.toml");
    fs::write(
        &path,
        r#"
            [parties]
            reiwa = ["れいわ"]
        "#,
    )
    .unwrap();

    std::env::set_var(ENV_CLASSIFIER_CONFIG_PATH, &path);
    let classifier = Classifier::load();
    std::env::remove_var(ENV_CLASSIFIER_CONFIG_PATH);
    let _ = fs::remove_file(&path);

    // The party map was replaced wholesale: ldp no longer matches.
    let tags = classifier.party_tags("自民党とれいわ新選組");
    assert!(tags.contains(&PartyTag::Reiwa));
    assert!(!tags.contains(&PartyTag::Ldp));
}

#[serial_test::serial]
#[test]
fn repo_config_files_match_the_built_in_seeds() {
    std::env::remove_var(ENV_SOURCES_CONFIG_PATH);
    std::env::remove_var(ENV_CLASSIFIER_CONFIG_PATH);

    // `cargo test` runs from the crate root, so the shipped config/ files
    // load here; they are expected to mirror the seeds.
    let reg = SourceRegistry::load();
    assert_eq!(reg.sources().len(), SourceRegistry::seed().sources().len());

    let classifier = Classifier::load();
    let seeded = Classifier::seed();
    assert_eq!(
        classifier.party_tags("自民党と立憲民主党"),
        seeded.party_tags("自民党と立憲民主党")
    );
}
