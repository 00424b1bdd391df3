// src/specs/windows.rs
// learn.microsoft.com/windows/release-health: lists every serviced
// "Windows 11, version YYH#". The highest one is the current stable feature
// update. No beta channel is published there.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::html::text_nodes;
use crate::model::{RawObservation, RawValue};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bWindows\s+11,?\s+version\s+(\d{2})H([12])\b").expect("static regex")
});

/// Highest `(year, half)` feature update mentioned anywhere in the page text.
pub fn latest_feature_update(doc: &str) -> Option<String> {
    text_nodes(doc)
        .iter()
        .flat_map(|t| VERSION_RE.captures_iter(t).collect::<Vec<_>>())
        .filter_map(|c| Some((c[1].parse::<u32>().ok()?, c[2].parse::<u32>().ok()?)))
        .max()
        .map(|(yy, h)| format!("Windows 11, version {yy:02}H{h}"))
}

pub fn extract(doc: &str) -> RawObservation {
    let stable = latest_feature_update(doc)
        .or_else(|| {
            // page wording changed: first text that at least names the product
            text_nodes(doc).into_iter().find(|t| t.starts_with("Windows 11"))
        })
        .map(RawValue::Value)
        .unwrap_or_else(|| RawValue::Error(s!("no Windows 11 version on page")));

    RawObservation {
        stable: Some(stable),
        ..RawObservation::default()
    }
}
