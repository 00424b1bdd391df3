// src/diff.rs
//! Day-over-day change detection.
//!
//! The baseline is the entry for exactly `today - 1`. A gap in history (first
//! run, skipped day) falls back to an all-sentinel baseline, so everything
//! observed reads as changed instead of being silently skipped.
//!
//! Output order is platform order, then field order. Identical inputs give
//! identical output.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::config::Config;
use crate::model::{Field, FieldSet, Platform, Snapshot};
use crate::store::History;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub platform: Platform,
    pub field: Field,
    pub previous: String,
    pub current: String,
}

pub fn diff(cfg: &Config, history: &History, current: &Snapshot, today: NaiveDate) -> Vec<ChangeRecord> {
    match today.checked_sub_days(Days::new(1)) {
        Some(yesterday) => diff_against(cfg, history, current, yesterday),
        None => compare(cfg, None, current),
    }
}

/// Same as [`diff`] with an explicit baseline date.
pub fn diff_against(cfg: &Config, history: &History, current: &Snapshot, baseline: NaiveDate) -> Vec<ChangeRecord> {
    let base = history.get(baseline);
    if base.is_none() {
        logf!("No snapshot for {baseline}; comparing against unknown baseline");
    }
    compare(cfg, base, current)
}

fn compare(cfg: &Config, base: Option<&Snapshot>, current: &Snapshot) -> Vec<ChangeRecord> {
    let unknown = FieldSet::unknown(&cfg.sentinel);
    let mut out = Vec::new();

    for &platform in &cfg.platforms {
        let prev = base.and_then(|b| b.get(platform)).unwrap_or(&unknown);
        let cur = current.get(platform).unwrap_or(&unknown);
        for field in Field::ALL {
            let (p, c) = (prev.get(field), cur.get(field));
            if p != c {
                out.push(ChangeRecord { platform, field, previous: s!(p), current: s!(c) });
            }
        }
    }
    out
}
