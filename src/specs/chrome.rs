// src/specs/chrome.rs
// developer.chrome.com/release-notes: headings like "Chrome 141" and
// "Chrome 142 beta". Highest number per channel wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::html::text_nodes;
use crate::model::{RawObservation, RawValue};

static MILESTONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bChrome\s+(\d{2,4})\b(?:\s+(beta|dev|canary)\b)?").expect("static regex")
});

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Milestones {
    pub stable: Option<u32>,
    pub beta: Option<u32>,
}

pub fn milestones(doc: &str) -> Milestones {
    let mut m = Milestones::default();
    for text in text_nodes(doc) {
        for caps in MILESTONE_RE.captures_iter(&text) {
            let Ok(n) = caps[1].parse::<u32>() else { continue };
            match caps.get(2).map(|c| c.as_str().to_ascii_lowercase()) {
                None => m.stable = m.stable.max(Some(n)),
                Some(ch) if ch == "beta" => m.beta = m.beta.max(Some(n)),
                Some(_) => {} // dev / canary not tracked
            }
        }
    }
    m
}

pub fn extract(doc: &str) -> RawObservation {
    let m = milestones(doc);
    RawObservation {
        stable: Some(match m.stable {
            Some(n) => RawValue::Value(format!("Chrome {n}")),
            None => RawValue::Error(s!("no stable milestone on page")),
        }),
        beta: Some(match m.beta {
            Some(n) => RawValue::Value(format!("Chrome {n} Beta")),
            None => RawValue::Error(s!("no beta milestone on page")),
        }),
        ..RawObservation::default()
    }
}
