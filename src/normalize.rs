// src/normalize.rs
//! Raw fetcher output → canonical [`Snapshot`].
//!
//! Never fails. Anything that cannot be trusted collapses to the sentinel:
//! - platform absent from the input,
//! - platform-level fetch error,
//! - field missing, error-marked, or blank after whitespace cleanup.
//!
//! Release dates are normalized to `DD Mon YYYY` on a best-effort basis; an
//! unparseable date passes through as the cleaned raw string.

use chrono::{DateTime, NaiveDate};

use crate::config::{Config, consts::DATE_FORMAT};
use crate::core::sanitize::normalize_ws;
use crate::model::{Field, FieldSet, Observations, Platform, RawObservation, RawValue, Snapshot};

/// Input layouts seen on the tracked pages, most common first.
const DATE_INPUTS: &[&str] = &[
    "%B %d, %Y", // September 15, 2025
    "%b %d, %Y", // Sep 15, 2025
    "%d %B %Y",  // 15 September 2025
    "%d %b %Y",  // 15 Sep 2025
    "%Y-%m-%d",  // 2025-09-15
];

pub fn normalize(cfg: &Config, raw: &Observations) -> Snapshot {
    cfg.platforms
        .iter()
        .map(|&platform| (platform, normalize_platform(cfg, platform, raw.get(&platform))))
        .collect()
}

fn normalize_platform(cfg: &Config, platform: Platform, raw: Option<&RawObservation>) -> FieldSet {
    let sentinel = cfg.sentinel.as_str();

    let Some(obs) = raw else {
        logw!("{platform}: no observation, using sentinels");
        return FieldSet::unknown(sentinel);
    };
    if let Some(reason) = &obs.fetch_error {
        logw!("{platform}: fetch failed ({reason}), using sentinels");
        return FieldSet::unknown(sentinel);
    }

    let mut out = FieldSet::unknown(sentinel);
    for field in Field::ALL {
        let value = match obs.get(field) {
            None => None,
            Some(RawValue::Error(e)) => {
                logd!("{platform}: {} unreadable: {e}", field.label());
                None
            }
            Some(RawValue::Value(v)) => clean_value(field, v),
        };
        if let Some(v) = value {
            *slot(&mut out, field) = v;
        }
    }
    out
}

fn slot(fs: &mut FieldSet, field: Field) -> &mut String {
    match field {
        Field::Stable => &mut fs.stable,
        Field::Beta => &mut fs.beta,
        Field::BetaReleaseDate => &mut fs.beta_release_date,
    }
}

fn clean_value(field: Field, raw: &str) -> Option<String> {
    let v = normalize_ws(raw);
    if v.is_empty() {
        return None;
    }
    match field {
        Field::BetaReleaseDate => Some(normalize_date(&v)),
        _ => Some(v),
    }
}

/// `DD Mon YYYY` if any known layout matches, otherwise the input unchanged.
pub fn normalize_date(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| {
            logd!("date not recognised, keeping raw: {raw:?}");
            s!(raw)
        })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let t = raw.trim();
    DATE_INPUTS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(t).ok().map(|dt| dt.date_naive()))
}
