// src/store.rs
//
// Rolling, date-keyed history of snapshots.
//
// On disk: one pretty-printed JSON object at `<store_dir>/history.json`,
//   { "2026-10-16": { "macOS": { "stable": ..., ... }, ... }, ... }
// Keys sort lexically == chronologically, so the file reads oldest → newest.
//
// Load never fails (missing/corrupt → empty). Save fails loudly: losing a
// day silently would poison every diff after it.

use std::{collections::BTreeMap, fs, io, path::{Path, PathBuf}};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::file::{ensure_directory, write_atomic};
use crate::model::Snapshot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not create store directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not encode history: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not write history to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(BTreeMap<NaiveDate, Snapshot>);

impl History {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Snapshot> {
        self.0.get(&date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dates held, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    /// Insert or overwrite `date`, then drop the oldest dates until at most
    /// `keep_days` remain. Returns the evicted dates.
    pub fn record(&mut self, date: NaiveDate, snapshot: Snapshot, keep_days: usize) -> Vec<NaiveDate> {
        self.0.insert(date, snapshot);
        let mut evicted = Vec::new();
        while self.0.len() > keep_days {
            match self.0.pop_first() {
                Some((d, _)) => evicted.push(d),
                None => break,
            }
        }
        evicted
    }
}

impl FromIterator<(NaiveDate, Snapshot)> for History {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Snapshot)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// File-backed history. One per run; no locking (one run at a time).
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
    keep_days: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, keep_days: usize) -> Self {
        Self { path: path.into(), keep_days }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.history_path(), cfg.keep_days)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> History {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                logf!("No history at {}, starting fresh", self.path.display());
                return History::new();
            }
            Err(e) => {
                logw!("History at {} unreadable ({e}); treating as empty", self.path.display());
                return History::new();
            }
        };

        match serde_json::from_str::<History>(&text) {
            Ok(h) => {
                logd!("Loaded {} day(s) of history", h.len());
                h
            }
            Err(e) => {
                logw!("History at {} is corrupt ({e}); treating as empty", self.path.display());
                History::new()
            }
        }
    }

    /// Record `snapshot` under `today`, enforce retention, persist atomically.
    /// On error `history` already holds the new entry but the file on disk is
    /// the previous valid version.
    pub fn save(&self, history: &mut History, today: NaiveDate, snapshot: Snapshot) -> Result<(), StoreError> {
        let evicted = history.record(today, snapshot, self.keep_days);
        for d in &evicted {
            logd!("Evicted {d} from history");
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent)
                    .map_err(|source| StoreError::CreateDir { path: parent.to_path_buf(), source })?;
            }
        }

        let mut body = serde_json::to_vec_pretty(history)?;
        body.push(b'\n');
        write_atomic(&self.path, &body)
            .map_err(|source| StoreError::Write { path: self.path.clone(), source })?;

        logf!("Saved history ({} day(s)) to {}", history.len(), self.path.display());
        Ok(())
    }
}
