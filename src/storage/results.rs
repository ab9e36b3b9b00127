//! Puzzle results
//!
//! One entry per map: the score and time of the most recent completed run.
//! A new result overwrites the old one, better or not.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{LocalStorage, StorageError};

/// Default results file name inside the storage base dir
pub const RESULTS_FILE: &str = "results.ron";

/// Where finished runs are reported
pub trait ResultSink {
    fn save_result(&mut self, map_id: &str, score: i32, time_seconds: f32) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapResult {
    pub score: i32,
    pub time_seconds: f32,
}

/// Results persisted as a RON map keyed by map id
#[derive(Debug)]
pub struct ResultStore {
    storage: LocalStorage,
    path: String,
    results: BTreeMap<String, MapResult>,
}

impl ResultStore {
    /// Load the results file, starting empty if it does not exist yet
    pub fn open(storage: LocalStorage) -> Result<Self, StorageError> {
        Self::open_at(storage, RESULTS_FILE)
    }

    pub fn open_at(storage: LocalStorage, path: impl Into<String>) -> Result<Self, StorageError> {
        let path = path.into();
        let results = match storage.read(&path) {
            Ok(bytes) => {
                let text = String::from_utf8(bytes).map_err(|e| StorageError::Serde(e.to_string()))?;
                ron::from_str(&text).map_err(|e| StorageError::Serde(e.to_string()))?
            }
            Err(StorageError::NotFound(_)) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        Ok(Self { storage, path, results })
    }

    /// Score of the last saved run, 0 if the map was never finished
    pub fn best_score(&self, map_id: &str) -> i32 {
        self.results.get(map_id).map(|r| r.score).unwrap_or(0)
    }

    /// Time of the last saved run, 0.0 if the map was never finished
    pub fn best_time(&self, map_id: &str) -> f32 {
        self.results.get(map_id).map(|r| r.time_seconds).unwrap_or(0.0)
    }

    fn flush(&self) -> Result<(), StorageError> {
        let text = ron::ser::to_string_pretty(&self.results, ron::ser::PrettyConfig::default())
            .map_err(|e| StorageError::Serde(e.to_string()))?;
        self.storage.write(&self.path, text.as_bytes())
    }
}

impl ResultSink for ResultStore {
    fn save_result(&mut self, map_id: &str, score: i32, time_seconds: f32) -> Result<(), StorageError> {
        if let Some(old) = self.results.get(map_id) {
            if old.score > score {
                warn!(map_id, old = old.score, new = score, "overwriting a higher score");
            }
        }
        self.results.insert(map_id.to_string(), MapResult { score, time_seconds });
        self.flush()?;
        info!(map_id, score, time_seconds, "result saved");
        Ok(())
    }
}
