//! [crate::properties] contains the basic building blocks for assembling and
//! manipulating counting-scheme hierarchies and their statistics.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};
use url::Url;

use crate::error::Error;

/// Base URL of the public reference site, used for row-navigation links.
pub const SITE_BASE_URL: &str = "https://hawsabah.org/";

/// Identifier of a counting scheme, as assigned by the remote API.
///
/// Scheme ids are plain integers on the wire. They are only guaranteed unique
/// within one fetched scheme set; nothing persists across refreshes.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord, Default,
)]
#[serde(transparent)]
pub struct SchemeId(pub u32);

impl Display for SchemeId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SchemeId {
    fn from(raw: u32) -> Self {
        SchemeId(raw)
    }
}

/// One scheme record as delivered by the API.
///
/// `parent_scheme_id` references another record's `scheme_id` in the same
/// payload, forward or backward; `None` marks a forest root. The same shape is
/// reused by the per-surah statistics payload, where `min_count`/`max_count`
/// carry that surah's ayah count range under the scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeRecord {
    pub scheme_id: SchemeId,
    pub scheme_name: String,
    #[serde(default)]
    pub parent_scheme_id: Option<SchemeId>,
    pub min_count: u32,
    pub max_count: u32,
}

/// A scheme situated in the hierarchy, carrying its children.
///
/// Built from [SchemeRecord] by an explicit mapping; the wire record and the
/// presentation node are deliberately separate types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeTreeNode {
    pub id: SchemeId,
    pub title: String,
    pub parent_id: Option<SchemeId>,
    pub min_count: u32,
    pub max_count: u32,
    pub children: Vec<SchemeTreeNode>,
}

impl SchemeTreeNode {
    pub fn from_record(record: &SchemeRecord) -> Self {
        SchemeTreeNode {
            id: record.scheme_id,
            title: record.scheme_name.clone(),
            parent_id: record.parent_scheme_id,
            min_count: record.min_count,
            max_count: record.max_count,
            children: Vec::new(),
        }
    }
}

/// One entry of the DFS pre-order flattening of the scheme forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatScheme {
    pub id: SchemeId,
    pub title: String,
    pub parent_id: Option<SchemeId>,
    pub parent_title: Option<String>,
}

/// Per-ayah statistics entry.
///
/// Scheme classification is membership-based: a scheme id appears in at most
/// one of the three lists. Ids absent from all three are reported as
/// [CountLabel::NotAvailable].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AyahStatRecord {
    pub seq_no: u32,
    pub surah_no: u16,
    pub ayah_no_within_surah: u16,
    #[serde(rename = "ayah")]
    pub ayah_text: String,
    pub ayah_serial_no: u32,
    #[serde(default)]
    pub schemes_that_count: Vec<SchemeId>,
    #[serde(default)]
    pub schemes_that_have_khulf: Vec<SchemeId>,
    #[serde(default)]
    pub schemes_that_do_not_count: Vec<SchemeId>,
}

impl AyahStatRecord {
    /// How `scheme` treats this ayah. Membership is checked in the order
    /// counts, khulf, does-not-count; the lists are expected to be disjoint.
    pub fn classify(&self, scheme: SchemeId) -> CountLabel {
        if self.schemes_that_count.contains(&scheme) {
            CountLabel::Counts
        } else if self.schemes_that_have_khulf.contains(&scheme) {
            CountLabel::HasKhulf
        } else if self.schemes_that_do_not_count.contains(&scheme) {
            CountLabel::DoesNotCount
        } else {
            CountLabel::NotAvailable
        }
    }

    /// Deep link to this ayah on the reference site's mushaf dashboard.
    pub fn details_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(SITE_BASE_URL)?;
        url.query_pairs_mut()
            .append_pair("ojr", "dashboard")
            .append_pair("mushaf", "1")
            .append_pair("surah", &self.surah_no.to_string())
            .append_pair("ayah", &self.ayah_no_within_surah.to_string());
        Ok(url)
    }
}

/// Wire shape of the per-surah statistics payload: a JSON object keyed by
/// surah number rendered as a string.
pub type SurahStatsWire = BTreeMap<String, Vec<SchemeRecord>>;

/// Per-surah statistics with numeric keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurahStats(pub BTreeMap<u16, Vec<SchemeRecord>>);

impl SurahStats {
    /// Parse the string-keyed wire map. Keys that fail numeric parse are
    /// skipped with a warning rather than failing the whole payload.
    pub fn from_wire(wire: SurahStatsWire) -> Self {
        let mut stats = BTreeMap::new();
        for (key, schemes) in wire {
            match key.parse::<u16>() {
                Ok(surah_no) => {
                    stats.insert(surah_no, schemes);
                }
                Err(_) => {
                    tracing::warn!("Skipping per-surah entry with non-numeric key '{key}'");
                }
            }
        }
        SurahStats(stats)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Categorical label for a scheme's treatment of one ayah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CountLabel {
    Counts,
    DoesNotCount,
    HasKhulf,
    NotAvailable,
}

impl CountLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountLabel::Counts => "Counts",
            CountLabel::DoesNotCount => "Doesn't Count",
            CountLabel::HasKhulf => "Has Khulf",
            CountLabel::NotAvailable => "N/A",
        }
    }
}

impl Display for CountLabel {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three statistics granularities served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsKind {
    Aggregate,
    PerAyah,
    PerSurah,
}

impl StatsKind {
    /// Key under which this payload is cached between refreshes.
    pub fn cache_key(&self) -> &'static str {
        match self {
            StatsKind::Aggregate => "scheme_stats_data",
            StatsKind::PerAyah => "ayah_schemes_data",
            StatsKind::PerSurah => "surah_schemes_data",
        }
    }

    /// API operation name relative to the service base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            StatsKind::Aggregate => "GetCountingSchemeStats",
            StatsKind::PerAyah => "GetCountingSchemeStatsPerAyah",
            StatsKind::PerSurah => "GetCountingSchemeStatsPerSurah",
        }
    }
}

impl Display for StatsKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            StatsKind::Aggregate => write!(f, "aggregate"),
            StatsKind::PerAyah => write!(f, "per-ayah"),
            StatsKind::PerSurah => write!(f, "per-surah"),
        }
    }
}

/// Placeholder used when a scheme id cannot be resolved to a display name.
pub const UNKNOWN_SCHEME: &str = "Unknown";

/// Resolve a surah number to a display name, falling back to `Surah {n}`.
pub fn surah_display_name(names: &BTreeMap<u16, String>, surah_no: u16) -> String {
    names
        .get(&surah_no)
        .cloned()
        .unwrap_or_else(|| format!("Surah {surah_no}"))
}
