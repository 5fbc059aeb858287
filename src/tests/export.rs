//! Tests for export preparation and serialization

use serde_json::Value;
use std::collections::BTreeSet;

use super::helpers::{ayah_entry, ids, record, sample_records, surah_names};
use crate::{
    export::{
        ayah_stats_export, projection_to_csv, scheme_stats_export, surah_stats_export,
        to_pretty_json,
    },
    index::SchemeIndex,
    projection::project_aggregate,
    properties::{SchemeId, SurahStats},
};

#[test]
fn scheme_stats_export_collapses_totals_and_resolves_parents() {
    let records = sample_records();
    let index = SchemeIndex::build(&records).unwrap();

    let export = scheme_stats_export(&records, &index);
    assert_eq!(export.len(), 4);

    // Root: range total, no parent.
    assert_eq!(export[0]["schemeName"], "Madani");
    assert_eq!(export[0]["totalVerses"], Value::from("6210-6217"));
    assert_eq!(export[0]["parentSchemeName"], "N/A");

    // Collapsed count renders as the bare number.
    assert_eq!(export[1]["totalVerses"], Value::from(6217u32));
    assert_eq!(export[1]["parentSchemeName"], "Madani");
}

#[test]
fn ayah_stats_export_emits_membership_labels_only() {
    let records = sample_records();
    let index = SchemeIndex::build(&records).unwrap();

    let stats = vec![ayah_entry(1, 1, 1, "بسم الله", &[2], &[3], &[])];
    let export = ayah_stats_export(&stats, &index, &surah_names());

    assert_eq!(export[0]["surah"], "1 - Al-Fatihah");
    assert_eq!(export[0]["ayahNumber"], Value::from(1u16));
    let schemes = export[0]["schemes"].as_object().unwrap();
    assert_eq!(schemes.get("Madani Awwal"), Some(&Value::from("Counts")));
    assert_eq!(schemes.get("Madani Thani"), Some(&Value::from("Has Khulf")));
    // Unlisted schemes get no sentinel entry in the export shape.
    assert_eq!(schemes.get("Madani"), None);
}

#[test]
fn surah_stats_export_keys_by_number_and_name() {
    let records = sample_records();
    let index = SchemeIndex::build(&records).unwrap();

    let stats = SurahStats(
        [(2u16, vec![record(2, "Madani Awwal", Some(1), 286, 286)])]
            .into_iter()
            .collect(),
    );
    let export = surah_stats_export(&stats, &index, &surah_names());
    let entries = export["2 - Al-Baqarah"].as_array().unwrap();
    assert_eq!(entries[0]["schemeName"], "Madani Awwal");
    assert_eq!(entries[0]["parentSchemeName"], "Madani");
}

#[test]
fn csv_renders_header_and_cells_through_column_fields() {
    let records = sample_records();
    let index = SchemeIndex::build(&records).unwrap();
    let closed: BTreeSet<SchemeId> = ids(&[1, 2]).into_iter().collect();

    let table = project_aggregate(&index, &closed, &records);
    let csv = projection_to_csv(&table);
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Madani,Madani Awwal"));
    assert_eq!(lines.next(), Some("6210 - 6217,6217"));
    assert_eq!(lines.next(), None);
}

#[test]
fn csv_quotes_cells_containing_delimiters_and_quotes() {
    let records = vec![
        record(1, "Scheme, With Comma", None, 1, 1),
        record(2, "Quoted \"Scheme\"", Some(1), 2, 3),
    ];
    let index = SchemeIndex::build(&records).unwrap();
    let closed: BTreeSet<SchemeId> = ids(&[1, 2]).into_iter().collect();

    let table = project_aggregate(&index, &closed, &records);
    let csv = projection_to_csv(&table);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("\"Scheme, With Comma\",\"Quoted \"\"Scheme\"\"\"")
    );
    assert_eq!(lines.next(), Some("1,2 - 3"));
}

#[test]
fn csv_renders_missing_fields_as_empty_cells() {
    let records = sample_records();
    let index = SchemeIndex::build(&records).unwrap();

    let stats = SurahStats(
        [
            (1u16, vec![record(2, "Madani Awwal", Some(1), 7, 7)]),
            (2u16, vec![record(3, "Madani Thani", Some(1), 286, 286)]),
        ]
        .into_iter()
        .collect(),
    );
    let closed: BTreeSet<SchemeId> = ids(&[2, 3]).into_iter().collect();
    let table = crate::projection::project_per_surah(&index, &closed, &stats, &surah_names());

    let csv = projection_to_csv(&table);
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Surah,Madani Awwal,Madani Thani"));
    assert_eq!(lines.next(), Some("1 (Al-Fatihah),7,"));
    assert_eq!(lines.next(), Some("2 (Al-Baqarah),,286"));
}

#[test]
fn pretty_json_is_indented_and_ordered() {
    let records = sample_records();
    let index = SchemeIndex::build(&records).unwrap();
    let export = scheme_stats_export(&records, &index);

    let json = to_pretty_json(&export).unwrap();
    assert!(json.starts_with("[\n"));
    let name_pos = json.find("schemeName").unwrap();
    let parent_pos = json.find("parentSchemeName").unwrap();
    assert!(name_pos < parent_pos, "field order follows the export shape");
}

#[test]
fn ayah_details_url_targets_the_mushaf_dashboard() {
    let entry = ayah_entry(1, 1, 7, "text", &[], &[], &[]);
    let url = entry.details_url().unwrap();
    assert_eq!(
        url.as_str(),
        "https://hawsabah.org/?ojr=dashboard&mushaf=1&surah=1&ayah=7"
    );
}
