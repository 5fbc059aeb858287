//! Table projection.
//!
//! Turns a closed selection plus statistic records into display rows and
//! column descriptors. Columns always follow the DFS pre-order of the scheme
//! hierarchy, so a parent column precedes its child columns no matter what
//! order the selection arrived in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    index::SchemeIndex,
    properties::{surah_display_name, AyahStatRecord, SchemeId, SchemeRecord, SurahStats},
};

/// One table column. Field names mirror the rendering layer's contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub header_text: String,
    pub field: String,
    pub sortable: bool,
}

impl ColumnSpec {
    fn new(header: &str, field: &str, sortable: bool) -> Self {
        ColumnSpec {
            header_text: header.to_string(),
            field: field.to_string(),
            sortable,
        }
    }
}

/// One display row: insertion-ordered fields keyed by display title, so JSON
/// export preserves column order.
pub type Row = Map<String, Value>;

/// Rows plus column descriptors, ready for the rendering collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub rows: Vec<Row>,
    pub columns: Vec<ColumnSpec>,
}

/// Aggregate overview: exactly one row, one field per selected scheme.
///
/// A scheme whose statistic collapses to a single count renders as that
/// number; a genuine range renders as `"{min} - {max}"`; a selected scheme
/// with no statistic record renders as `"N/A"`.
pub fn project_aggregate(
    index: &SchemeIndex,
    closed: &BTreeSet<SchemeId>,
    stats: &[SchemeRecord],
) -> Projection {
    if closed.is_empty() {
        return Projection::default();
    }

    let by_id: BTreeMap<SchemeId, &SchemeRecord> =
        stats.iter().map(|record| (record.scheme_id, record)).collect();

    let mut row = Row::new();
    let mut columns = Vec::new();
    for node in index.flattened().iter().filter(|n| closed.contains(&n.id)) {
        let value = match by_id.get(&node.id) {
            Some(record) => count_value(record.min_count, record.max_count),
            None => Value::from("N/A"),
        };
        insert_field(&mut row, &node.title, value, node.id);
        columns.push(ColumnSpec::new(&node.title, &node.title, false));
    }

    Projection {
        rows: vec![row],
        columns,
    }
}

/// Per-ayah breakdown: one row per ayah, base columns followed by a
/// categorical label column per selected scheme.
pub fn project_per_ayah(
    index: &SchemeIndex,
    closed: &BTreeSet<SchemeId>,
    stats: &[AyahStatRecord],
    surah_names: &BTreeMap<u16, String>,
) -> Projection {
    if closed.is_empty() {
        return Projection::default();
    }

    let selected: Vec<_> = index
        .flattened()
        .iter()
        .filter(|n| closed.contains(&n.id))
        .collect();

    let mut columns = vec![
        ColumnSpec::new("Surah", "surahNo", true),
        ColumnSpec::new("Ayah No", "ayahNoWithinSurah", true),
        ColumnSpec::new("Ayah Text", "ayahText", false),
        ColumnSpec::new("Ayah Serial No", "ayahSerialNo", false),
    ];
    columns.extend(
        selected
            .iter()
            .map(|node| ColumnSpec::new(&node.title, &node.title, true)),
    );

    let rows = stats
        .iter()
        .map(|entry| {
            let mut row = Row::new();
            row.insert("seqNo".to_string(), Value::from(entry.seq_no));
            row.insert(
                "surahNo".to_string(),
                Value::from(format!(
                    "{} ({})",
                    entry.surah_no,
                    surah_display_name(surah_names, entry.surah_no)
                )),
            );
            row.insert(
                "ayahNoWithinSurah".to_string(),
                Value::from(entry.ayah_no_within_surah),
            );
            row.insert("ayahText".to_string(), Value::from(entry.ayah_text.clone()));
            row.insert(
                "ayahSerialNo".to_string(),
                Value::from(entry.ayah_serial_no),
            );
            for node in &selected {
                insert_field(
                    &mut row,
                    &node.title,
                    Value::from(entry.classify(node.id).as_str()),
                    node.id,
                );
            }
            row
        })
        .collect();

    Projection { rows, columns }
}

/// Per-surah breakdown: one row per surah with at least one selected scheme.
/// Schemes absent from a surah's statistics simply do not appear in its row.
pub fn project_per_surah(
    index: &SchemeIndex,
    closed: &BTreeSet<SchemeId>,
    stats: &SurahStats,
    surah_names: &BTreeMap<u16, String>,
) -> Projection {
    if closed.is_empty() {
        return Projection::default();
    }

    let mut columns = vec![ColumnSpec::new("Surah", "surahId", true)];
    columns.extend(
        index
            .flattened()
            .iter()
            .filter(|n| closed.contains(&n.id))
            .map(|node| ColumnSpec::new(&node.title, &node.title, true)),
    );

    let mut rows = Vec::new();
    for (surah_no, schemes) in &stats.0 {
        let matching: Vec<_> = schemes
            .iter()
            .filter(|scheme| closed.contains(&scheme.scheme_id))
            .collect();
        if matching.is_empty() {
            continue;
        }

        let mut row = Row::new();
        row.insert(
            "surahId".to_string(),
            Value::from(format!(
                "{} ({})",
                surah_no,
                surah_display_name(surah_names, *surah_no)
            )),
        );
        for scheme in matching {
            insert_field(
                &mut row,
                &index.scheme_name(scheme.scheme_id),
                count_value(scheme.min_count, scheme.max_count),
                scheme.scheme_id,
            );
        }
        rows.push(row);
    }

    Projection { rows, columns }
}

/// A collapsed count renders as the bare number, a range as `"{min} - {max}"`.
pub fn count_value(min_count: u32, max_count: u32) -> Value {
    if min_count == max_count {
        Value::from(min_count)
    } else {
        Value::from(format!("{min_count} - {max_count}"))
    }
}

/// Rows are keyed by display title; two schemes resolving to the same title
/// collide last-write-wins, which is diagnosable but not fatal.
fn insert_field(row: &mut Row, title: &str, value: Value, id: SchemeId) {
    if row.insert(title.to_string(), value).is_some() {
        tracing::warn!("Duplicate display title '{title}': scheme {id} overwrites earlier field");
    }
}
