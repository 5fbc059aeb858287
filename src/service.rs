//! Orchestration of fetch, cache, index versioning, and projection.
//!
//! [SchemeService] replaces the reference UI's shared mutable model object
//! with single ownership: each successful [SchemeService::load_schemes] call
//! builds a fresh immutable [SchemeIndex] version behind an `Arc`, and
//! callers hold whichever version they obtained. Projection accessors are
//! gated on data having loaded — there is no retry-until-ready dance; a
//! caller that has not loaded yet gets [Error::NotLoaded].

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::{
    cache::StatsCache,
    error::Error,
    event::SchemeEvent,
    index::SchemeIndex,
    projection::{project_aggregate, project_per_ayah, project_per_surah, Projection},
    properties::{
        surah_display_name, AyahStatRecord, SchemeId, SchemeRecord, StatsKind, SurahStats,
    },
    selection::Expansion,
    source::SchemeSource,
};

pub struct SchemeService<S: SchemeSource> {
    source: S,
    cache: Option<Box<dyn StatsCache>>,
    index: Option<Arc<SchemeIndex>>,
    scheme_stats: Vec<SchemeRecord>,
    ayah_stats: Option<Vec<AyahStatRecord>>,
    surah_stats: Option<SurahStats>,
    surah_names: BTreeMap<u16, String>,
    event_tx: Option<UnboundedSender<SchemeEvent>>,
}

impl<S: SchemeSource> SchemeService<S> {
    pub fn new(source: S) -> Self {
        SchemeService {
            source,
            cache: None,
            index: None,
            scheme_stats: Vec::new(),
            ayah_stats: None,
            surah_stats: None,
            surah_names: BTreeMap::new(),
            event_tx: None,
        }
    }

    pub fn with_cache(mut self, cache: Box<dyn StatsCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_events(mut self, event_tx: UnboundedSender<SchemeEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Fetch (or read back from cache) the scheme payload and build a new
    /// index version. `force` bypasses the cache.
    pub async fn load_schemes(&mut self, force: bool) -> Result<Arc<SchemeIndex>, Error> {
        let records = match self.cached_payload(StatsKind::Aggregate, force) {
            Some(records) => records,
            None => {
                let fetched = self.source.fetch_schemes().await?;
                self.store_payload(StatsKind::Aggregate, &fetched);
                fetched
            }
        };

        let index = Arc::new(SchemeIndex::build(&records)?);
        self.scheme_stats = records;
        self.index = Some(index.clone());
        self.emit(SchemeEvent::SchemesLoaded(index.len()));
        Ok(index)
    }

    /// Fetch (or read back from cache) the per-ayah statistics payload.
    pub async fn load_ayah_stats(&mut self, force: bool) -> Result<(), Error> {
        let stats = match self.cached_payload(StatsKind::PerAyah, force) {
            Some(stats) => stats,
            None => {
                let fetched = self.source.fetch_ayah_stats().await?;
                self.store_payload(StatsKind::PerAyah, &fetched);
                fetched
            }
        };
        self.ayah_stats = Some(stats);
        self.emit(SchemeEvent::StatsLoaded(StatsKind::PerAyah));
        Ok(())
    }

    /// Fetch (or read back from cache) the per-surah statistics payload.
    pub async fn load_surah_stats(&mut self, force: bool) -> Result<(), Error> {
        let wire = match self.cached_payload(StatsKind::PerSurah, force) {
            Some(wire) => wire,
            None => {
                let fetched = self.source.fetch_surah_stats().await?;
                self.store_payload(StatsKind::PerSurah, &fetched);
                fetched
            }
        };
        self.surah_stats = Some(SurahStats::from_wire(wire));
        self.emit(SchemeEvent::StatsLoaded(StatsKind::PerSurah));
        Ok(())
    }

    /// Replace the surah display-name map used by the projections.
    pub fn set_surah_names(&mut self, names: BTreeMap<u16, String>) {
        self.emit(SchemeEvent::SurahNamesLoaded(names.len()));
        self.surah_names = names;
    }

    /// The current scheme index version.
    pub fn index(&self) -> Result<Arc<SchemeIndex>, Error> {
        self.index
            .clone()
            .ok_or_else(|| Error::NotLoaded("Scheme hierarchy".to_string()))
    }

    /// Every tree member id, in DFS order — the default "everything selected"
    /// state of the tree widget.
    pub fn all_scheme_ids(&self) -> Result<Vec<SchemeId>, Error> {
        Ok(self.index()?.flattened().iter().map(|n| n.id).collect())
    }

    /// Selection closure over the current index version.
    pub fn close_selection(
        &self,
        selected: &[SchemeId],
        expansion: Expansion,
    ) -> Result<BTreeSet<SchemeId>, Error> {
        self.index()?.close_selection(selected, expansion)
    }

    /// Aggregate overview table for `selected` (closure applied).
    pub fn aggregate_table(
        &self,
        selected: &[SchemeId],
        expansion: Expansion,
    ) -> Result<Projection, Error> {
        let index = self.index()?;
        let closed = index.close_selection(selected, expansion)?;
        Ok(project_aggregate(&index, &closed, &self.scheme_stats))
    }

    /// Per-ayah breakdown table for `selected` (closure applied).
    pub fn ayah_table(
        &self,
        selected: &[SchemeId],
        expansion: Expansion,
    ) -> Result<Projection, Error> {
        let index = self.index()?;
        let stats = self
            .ayah_stats
            .as_deref()
            .ok_or_else(|| Error::NotLoaded("Per-ayah statistics".to_string()))?;
        let closed = index.close_selection(selected, expansion)?;
        Ok(project_per_ayah(&index, &closed, stats, &self.surah_names))
    }

    /// Per-surah breakdown table for `selected` (closure applied).
    pub fn surah_table(
        &self,
        selected: &[SchemeId],
        expansion: Expansion,
    ) -> Result<Projection, Error> {
        let index = self.index()?;
        let stats = self
            .surah_stats
            .as_ref()
            .ok_or_else(|| Error::NotLoaded("Per-surah statistics".to_string()))?;
        let closed = index.close_selection(selected, expansion)?;
        Ok(project_per_surah(&index, &closed, stats, &self.surah_names))
    }

    /// Deep link for the ayah row keyed by `seq_no`.
    pub fn ayah_details_url(&self, seq_no: u32) -> Result<Url, Error> {
        let stats = self
            .ayah_stats
            .as_deref()
            .ok_or_else(|| Error::NotLoaded("Per-ayah statistics".to_string()))?;
        let entry = stats
            .iter()
            .find(|entry| entry.seq_no == seq_no)
            .ok_or_else(|| Error::NotFound(format!("No ayah entry with seqNo {seq_no}")))?;
        entry.details_url()
    }

    pub fn scheme_stats(&self) -> &[SchemeRecord] {
        &self.scheme_stats
    }

    pub fn ayah_stats(&self) -> Option<&[AyahStatRecord]> {
        self.ayah_stats.as_deref()
    }

    pub fn surah_stats(&self) -> Option<&SurahStats> {
        self.surah_stats.as_ref()
    }

    pub fn surah_name(&self, surah_no: u16) -> String {
        surah_display_name(&self.surah_names, surah_no)
    }

    pub fn surah_names(&self) -> &BTreeMap<u16, String> {
        &self.surah_names
    }

    fn cached_payload<T: serde::de::DeserializeOwned>(
        &self,
        kind: StatsKind,
        force: bool,
    ) -> Option<T> {
        if force {
            return None;
        }
        let value = self.cache.as_ref()?.get(kind.cache_key())?;
        match serde_json::from_value(value) {
            Ok(payload) => {
                tracing::debug!("Using cached {kind} payload");
                Some(payload)
            }
            Err(err) => {
                tracing::warn!("Cached {kind} payload does not deserialize: {err}; refetching");
                None
            }
        }
    }

    fn store_payload<T: serde::Serialize>(&mut self, kind: StatsKind, payload: &T) {
        let Some(cache) = self.cache.as_mut() else {
            return;
        };
        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Could not serialize {kind} payload for caching: {err}");
                return;
            }
        };
        if let Err(err) = cache.put(kind.cache_key(), &value) {
            tracing::warn!("Cache write for {kind} failed: {err}");
        }
    }

    fn emit(&self, event: SchemeEvent) {
        if let Some(tx) = &self.event_tx {
            if tx.send(event.clone()).is_err() {
                tracing::debug!("Event listener gone, dropping {event}");
            }
        }
    }
}
