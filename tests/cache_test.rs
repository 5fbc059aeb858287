//! FileCache behavior: round trips, misses, and corruption tolerance.

use serde_json::json;

use adad_core::cache::{FileCache, StatsCache};

#[test]
fn file_cache_round_trips_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = FileCache::new(dir.path().to_path_buf());

    let payload = json!([{"schemeId": 1, "schemeName": "Madani"}]);
    cache.put("scheme_stats_data", &payload).unwrap();
    assert_eq!(cache.get("scheme_stats_data"), Some(payload));
}

#[test]
fn file_cache_misses_on_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(dir.path().to_path_buf());
    assert_eq!(cache.get("never_written"), None);
}

#[test]
fn file_cache_treats_corruption_as_a_miss() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = FileCache::new(dir.path().to_path_buf());

    cache.put("ayah_schemes_data", &json!({"ok": true})).unwrap();
    std::fs::write(dir.path().join("ayah_schemes_data.json"), "{not json").unwrap();
    assert_eq!(cache.get("ayah_schemes_data"), None);
}
