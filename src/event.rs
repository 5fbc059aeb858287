use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::properties::StatsKind;

/// Notifications emitted by [crate::service::SchemeService] so embedding UIs
/// can refresh views when data versions change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemeEvent {
    /// A new scheme index version was built; payload is the tree member count.
    SchemesLoaded(usize),
    /// A statistics payload finished loading, from cache or the remote API.
    StatsLoaded(StatsKind),
    /// The surah name map was replaced.
    SurahNamesLoaded(usize),
}

impl Display for SchemeEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            SchemeEvent::SchemesLoaded(count) => write!(f, "SchemesLoaded({count})"),
            SchemeEvent::StatsLoaded(kind) => write!(f, "StatsLoaded({kind})"),
            SchemeEvent::SurahNamesLoaded(count) => write!(f, "SurahNamesLoaded({count})"),
        }
    }
}
