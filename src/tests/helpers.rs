//! Shared test utilities for scheme hierarchy testing

use std::collections::BTreeMap;

use crate::properties::{AyahStatRecord, SchemeId, SchemeRecord};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn record(
    id: u32,
    name: &str,
    parent: Option<u32>,
    min_count: u32,
    max_count: u32,
) -> SchemeRecord {
    SchemeRecord {
        scheme_id: SchemeId(id),
        scheme_name: name.to_string(),
        parent_scheme_id: parent.map(SchemeId),
        min_count,
        max_count,
    }
}

/// The fixture used across hierarchy and closure tests:
///
/// ```text
/// Madani (1)
/// ├── Madani Awwal (2)
/// │   └── Madani Awwal - Shaybah (8)
/// └── Madani Thani (3)
/// ```
pub fn sample_records() -> Vec<SchemeRecord> {
    init_logging();
    vec![
        record(1, "Madani", None, 6210, 6217),
        record(2, "Madani Awwal", Some(1), 6217, 6217),
        record(3, "Madani Thani", Some(1), 6214, 6214),
        record(8, "Madani Awwal - Shaybah", Some(2), 6210, 6210),
    ]
}

pub fn ids(raw: &[u32]) -> Vec<SchemeId> {
    raw.iter().copied().map(SchemeId).collect()
}

pub fn ayah_entry(
    seq_no: u32,
    surah_no: u16,
    ayah_no: u16,
    text: &str,
    counts: &[u32],
    khulf: &[u32],
    does_not_count: &[u32],
) -> AyahStatRecord {
    AyahStatRecord {
        seq_no,
        surah_no,
        ayah_no_within_surah: ayah_no,
        ayah_text: text.to_string(),
        ayah_serial_no: seq_no,
        schemes_that_count: ids(counts),
        schemes_that_have_khulf: ids(khulf),
        schemes_that_do_not_count: ids(does_not_count),
    }
}

pub fn surah_names() -> BTreeMap<u16, String> {
    BTreeMap::from([
        (1, "Al-Fatihah".to_string()),
        (2, "Al-Baqarah".to_string()),
    ])
}
