//! Statistics payload caching.
//!
//! The reference UI cached raw API payloads for the lifetime of a browser
//! session so switching views did not refetch. [MemoryCache] is the direct
//! analog; [FileCache] persists payloads as JSON files for CLI runs. A cache
//! is strictly an optimization: corruption or I/O failure degrades to a miss.

use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs::{read_to_string, write},
    path::PathBuf,
};

use crate::error::Error;

pub trait StatsCache: Send {
    /// Fetch a previously stored payload. Any failure is a miss.
    fn get(&self, key: &str) -> Option<Value>;
    fn put(&mut self, key: &str, value: &Value) -> Result<(), Error>;
}

/// Process-lifetime cache, dropped with the service.
#[derive(Debug, Default)]
pub struct MemoryCache(BTreeMap<String, Value>);

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.0.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &Value) -> Result<(), Error> {
        self.0.insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// One JSON file per cache key under a caller-chosen directory.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: PathBuf) -> Self {
        FileCache { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StatsCache for FileCache {
    fn get(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        tracing::debug!("Attempting cache read from {:?}", path);
        if !path.exists() {
            return None;
        }
        let content = match read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Cache read failed for {:?}: {err}; treating as miss", path);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Corrupt cache entry {:?}: {err}; treating as miss", path);
                None
            }
        }
    }

    fn put(&mut self, key: &str, value: &Value) -> Result<(), Error> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        tracing::debug!("Writing cache entry to {:?}", path);
        write(&path, serde_json::to_string(value)?)?;
        Ok(())
    }
}
