//! Filesystem tests for `MemoryStore` against a temporary directory.

use buywise_core::{AnalysisResult, PriceRange, ProductData, UserPreferences};
use buywise_memory::{MemoryStore, PREFERENCES_FILE};
use chrono::{NaiveDate, NaiveDateTime};

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid timestamp")
}

fn product(title: &str, url: &str) -> ProductData {
    ProductData {
        title: title.to_owned(),
        site: "amazon.com".to_owned(),
        url: url.to_owned(),
        reviews: vec!["Great sound.".to_owned()],
        full_details: true,
        ..ProductData::default()
    }
}

fn analysis(sentiment: &str, confidence: f64) -> AnalysisResult {
    AnalysisResult {
        overall_sentiment: sentiment.to_owned(),
        confidence_score: confidence,
        review_count: 1,
        pros: vec!["Great sound.".to_owned()],
        ..AnalysisResult::default()
    }
}

#[tokio::test]
async fn store_then_retrieve_round_trips_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path().join("memory"));

    let entry = store
        .store_at(
            &product("Bose QuietComfort 45", "https://amazon.com/dp/B098FKXT8L"),
            &analysis("Positive", 78.0),
            None,
            at(10, 15),
        )
        .await
        .expect("store should succeed");

    assert_eq!(entry.product_id, "Bose QuietComfort 45_20250301_101500");
    assert_eq!(
        entry.analysis_results.product_id.as_deref(),
        Some("Bose QuietComfort 45_20250301_101500")
    );
    assert!(dir
        .path()
        .join("memory/Bose_QuietComfort_45_20250301_101500.json")
        .exists());

    let loaded = store
        .retrieve(&entry.product_id)
        .await
        .expect("retrieve should succeed")
        .expect("entry should exist");
    assert_eq!(loaded, entry);
}

#[tokio::test]
async fn same_title_in_same_second_gets_distinct_ids() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path());
    let speaker = product("JBL Flip 6", "https://www.amazon.com/dp/B09GJVTRNZ");

    let first = store
        .store_at(&speaker, &analysis("Negative", 30.0), None, at(12, 0))
        .await
        .expect("first store");
    let second = store
        .store_at(&speaker, &analysis("Positive", 90.0), None, at(12, 0))
        .await
        .expect("second store");
    let third = store
        .store_at(&speaker, &analysis("Neutral", 50.0), None, at(12, 0))
        .await
        .expect("third store");

    assert_eq!(first.product_id, "JBL Flip 6_20250301_120000");
    assert_eq!(second.product_id, "JBL Flip 6_20250301_120000_2");
    assert_eq!(third.product_id, "JBL Flip 6_20250301_120000_3");
    assert_eq!(
        second.analysis_results.product_id.as_deref(),
        Some("JBL Flip 6_20250301_120000_2")
    );

    let kept = store
        .retrieve(&first.product_id)
        .await
        .expect("retrieve")
        .expect("first entry survives");
    assert_eq!(kept.analysis_results.overall_sentiment, "Negative");
    let later = store
        .retrieve(&second.product_id)
        .await
        .expect("retrieve")
        .expect("second entry stored");
    assert_eq!(later.analysis_results.overall_sentiment, "Positive");
    assert_eq!(store.recent(10).await.expect("recent").len(), 3);
}

#[tokio::test]
async fn retrieve_unknown_id_is_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path());
    let loaded = store.retrieve("missing_20250101_000000").await.expect("no io error");
    assert!(loaded.is_none());
}

#[tokio::test]
async fn find_match_uses_canonical_url_and_prefers_newest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path());
    let url = "https://www.amazon.com/dp/B0BLP2PY6W";

    store
        .store_at(&product("Galaxy S23", url), &analysis("Neutral", 40.0), None, at(9, 0))
        .await
        .expect("store");
    let newest = store
        .store_at(&product("Galaxy S23", url), &analysis("Positive", 80.0), None, at(11, 0))
        .await
        .expect("store");

    let lookup = product("Galaxy S23 (renamed)", "https://www.amazon.com/dp/B0BLP2PY6W/?th=1");
    let found = store
        .find_match(&lookup)
        .await
        .expect("lookup")
        .expect("match");
    assert_eq!(found.product_id, newest.product_id);

    let other = product("Galaxy S23", "https://www.amazon.com/dp/OTHER");
    assert!(store.find_match(&other).await.expect("lookup").is_none());
}

#[tokio::test]
async fn recent_is_newest_first_and_skips_preferences() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path());

    for (i, title) in ["Alpha", "Bravo", "Charlie"].iter().enumerate() {
        let minute = u32::try_from(i).expect("small index");
        store
            .store_at(&product(title, ""), &analysis("Positive", 70.0), None, at(8, minute))
            .await
            .expect("store");
    }
    store
        .store_preferences(&UserPreferences::default())
        .await
        .expect("preferences");
    assert!(dir.path().join(PREFERENCES_FILE).exists());

    let recent = store.recent(2).await.expect("recent");
    let titles: Vec<&str> = recent
        .iter()
        .map(|e| e.product_data.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Charlie", "Bravo"]);

    assert_eq!(store.recent(10).await.expect("recent").len(), 3);
}

#[tokio::test]
async fn recent_on_missing_directory_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path().join("never-created"));
    assert!(store.recent(5).await.expect("recent").is_empty());
}

#[tokio::test]
async fn search_matches_title_then_analysis_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path());

    store
        .store_at(&product("Kindle Paperwhite", ""), &analysis("Positive", 70.0), None, at(8, 0))
        .await
        .expect("store");
    store
        .store_at(&product("Echo Dot", ""), &analysis("Negative", 30.0), None, at(9, 0))
        .await
        .expect("store");

    let by_title = store.search("kindle").await.expect("search");
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].product_data.title, "Kindle Paperwhite");

    let by_field = store.search("NEGATIVE").await.expect("search");
    assert_eq!(by_field.len(), 1);
    assert_eq!(by_field[0].product_data.title, "Echo Dot");

    let by_pros = store.search("great sound").await.expect("search");
    assert_eq!(by_pros.len(), 2);
}

#[tokio::test]
async fn corrupt_files_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path());
    store
        .store_at(&product("Valid", ""), &analysis("Positive", 70.0), None, at(8, 0))
        .await
        .expect("store");
    std::fs::write(dir.path().join("broken.json"), "{ not json").expect("write");

    assert_eq!(store.recent(10).await.expect("recent").len(), 1);
}

#[tokio::test]
async fn preferences_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path());
    assert!(store.preferences().await.expect("read").is_none());

    let prefs = UserPreferences {
        price_range: PriceRange {
            min: 50.0,
            max: Some(200.0),
        },
        review_threshold: 25,
        ..UserPreferences::default()
    };
    store.store_preferences(&prefs).await.expect("write");
    assert_eq!(store.preferences().await.expect("read"), Some(prefs));
}

#[tokio::test]
async fn existing_analysis_summarizes_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::new(dir.path());
    let entry = store
        .store_at(&product("Echo Dot", ""), &analysis("Positive", 82.0), None, at(10, 15))
        .await
        .expect("store");

    let existing = entry.existing_analysis();
    assert_eq!(existing.product_id, "Echo Dot_20250301_101500");
    assert_eq!(existing.timestamp.as_deref(), Some("2025-03-01T10:15:00"));
    assert_eq!(
        existing.summary.as_deref(),
        Some("Positive sentiment across 1 reviews, confidence 82")
    );
}
