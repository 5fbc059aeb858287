//! Export preparation and serialization.
//!
//! The download shapes mirror the reference tool: pretty-printed JSON of the
//! prepared records, or CSV of a projected table. CSV quoting follows RFC
//! 4180: cells containing the delimiter, a quote, or a newline are wrapped in
//! double quotes with internal quotes doubled.

use serde::Serialize;
use serde_json::{json, Value};
use std::{collections::BTreeMap, path::Path};

use crate::{
    error::Error,
    index::SchemeIndex,
    projection::Projection,
    properties::{surah_display_name, AyahStatRecord, SchemeRecord, SurahStats},
};

/// Scheme overview export: one entry per raw record, with the collapsed
/// `totalVerses` rendering and the parent resolved to a display name.
pub fn scheme_stats_export(records: &[SchemeRecord], index: &SchemeIndex) -> Vec<Value> {
    records
        .iter()
        .map(|record| {
            let total_verses = if record.min_count == record.max_count {
                Value::from(record.min_count)
            } else {
                Value::from(format!("{}-{}", record.min_count, record.max_count))
            };
            let parent_scheme_name = record
                .parent_scheme_id
                .map(|parent_id| index.scheme_name(parent_id))
                .unwrap_or_else(|| "N/A".to_string());
            json!({
                "schemeName": record.scheme_name,
                "minCount": record.min_count,
                "maxCount": record.max_count,
                "totalVerses": total_verses,
                "parentSchemeName": parent_scheme_name,
            })
        })
        .collect()
}

/// Per-ayah export: one entry per ayah with scheme labels derived from the
/// entry's membership lists (no sentinel entries for unlisted schemes).
pub fn ayah_stats_export(
    stats: &[AyahStatRecord],
    index: &SchemeIndex,
    surah_names: &BTreeMap<u16, String>,
) -> Vec<Value> {
    stats
        .iter()
        .map(|entry| {
            let mut schemes = serde_json::Map::new();
            for (ids, label) in [
                (&entry.schemes_that_count, "Counts"),
                (&entry.schemes_that_have_khulf, "Has Khulf"),
                (&entry.schemes_that_do_not_count, "Doesn't Count"),
            ] {
                for id in ids {
                    schemes.insert(index.scheme_name(*id), Value::from(label));
                }
            }
            json!({
                "surah": format!(
                    "{} - {}",
                    entry.surah_no,
                    surah_display_name(surah_names, entry.surah_no)
                ),
                "ayahNumber": entry.ayah_no_within_surah,
                "ayahSerialNo": entry.ayah_serial_no,
                "ayahText": entry.ayah_text,
                "schemes": schemes,
            })
        })
        .collect()
}

/// Per-surah export: an object keyed `"{no} - {name}"`, each holding that
/// surah's scheme count ranges.
pub fn surah_stats_export(
    stats: &SurahStats,
    index: &SchemeIndex,
    surah_names: &BTreeMap<u16, String>,
) -> Value {
    let mut out = serde_json::Map::new();
    for (surah_no, schemes) in &stats.0 {
        let key = format!("{} - {}", surah_no, surah_display_name(surah_names, *surah_no));
        let entries: Vec<Value> = schemes
            .iter()
            .map(|scheme| {
                let parent_scheme_name = scheme
                    .parent_scheme_id
                    .map(|parent_id| index.scheme_name(parent_id))
                    .unwrap_or_else(|| "N/A".to_string());
                json!({
                    "schemeName": scheme.scheme_name,
                    "minCount": scheme.min_count,
                    "maxCount": scheme.max_count,
                    "parentSchemeName": parent_scheme_name,
                })
            })
            .collect();
        out.insert(key, Value::from(entries));
    }
    Value::Object(out)
}

/// Pretty-printed JSON, the shape the download sink serves.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a projected table as CSV: header row of column titles, then one
/// line per row with cells resolved through each column's field key.
pub fn projection_to_csv(projection: &Projection) -> String {
    let mut out = String::new();
    let header: Vec<String> = projection
        .columns
        .iter()
        .map(|column| csv_quote(&column.header_text))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in &projection.rows {
        let cells: Vec<String> = projection
            .columns
            .iter()
            .map(|column| csv_quote(&cell_text(row.get(&column.field))))
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn csv_quote(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Write serialized export contents to disk.
pub fn write_export<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), Error> {
    tracing::debug!("Writing export to {:?}", path.as_ref());
    std::fs::write(path, contents)?;
    Ok(())
}
