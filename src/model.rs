// src/model.rs
//
// Canonical record shapes shared by the whole pipeline.
//
// - Platform / Field: closed, ordered sets. Declaration order IS the report order.
// - FieldSet: the three canonical fields, always present (sentinel when unknown).
// - Snapshot: Platform -> FieldSet for one run.
// - RawObservation: what a fetcher hands over before normalization.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::consts::SENTINEL;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "macOS")]
    MacOs,
    #[serde(rename = "iPadOS")]
    IpadOs,
    #[serde(rename = "Windows")]
    Windows,
    #[serde(rename = "ChromeOS")]
    ChromeOs,
}

impl Platform {
    pub const ALL: [Platform; 4] = [Platform::MacOs, Platform::IpadOs, Platform::Windows, Platform::ChromeOs];

    pub fn name(self) -> &'static str {
        match self {
            Platform::MacOs => "macOS",
            Platform::IpadOs => "iPadOS",
            Platform::Windows => "Windows",
            Platform::ChromeOs => "ChromeOS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = String;

    /// Case-insensitive on the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(t))
            .ok_or_else(|| format!("Unknown platform: {t}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Stable,
    Beta,
    BetaReleaseDate,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Stable, Field::Beta, Field::BetaReleaseDate];

    /// Human label used in summary lines.
    pub fn label(self) -> &'static str {
        match self {
            Field::Stable => "stable",
            Field::Beta => "beta",
            Field::BetaReleaseDate => "beta release date",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    pub stable: String,
    pub beta: String,
    pub beta_release_date: String,
}

impl FieldSet {
    /// Every field set to `sentinel`.
    pub fn unknown(sentinel: &str) -> Self {
        Self {
            stable: s!(sentinel),
            beta: s!(sentinel),
            beta_release_date: s!(sentinel),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Stable => &self.stable,
            Field::Beta => &self.beta,
            Field::BetaReleaseDate => &self.beta_release_date,
        }
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::unknown(SENTINEL)
    }
}

/// One run's canonical state. Ordered by `Platform` declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<Platform, FieldSet>);

impl Snapshot {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// All listed platforms with fully-sentinel fields.
    pub fn unknown(platforms: &[Platform], sentinel: &str) -> Self {
        platforms.iter().map(|&p| (p, FieldSet::unknown(sentinel))).collect()
    }

    pub fn insert(&mut self, platform: Platform, fields: FieldSet) {
        self.0.insert(platform, fields);
    }

    pub fn get(&self, platform: Platform) -> Option<&FieldSet> {
        self.0.get(&platform)
    }

    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, &FieldSet)> {
        self.0.iter().map(|(p, f)| (*p, f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Platform, FieldSet)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (Platform, FieldSet)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single scraped value, or the reason it could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawValue {
    Value(String),
    Error(String),
}

impl RawValue {
    pub fn value(v: impl Into<String>) -> Self {
        RawValue::Value(v.into())
    }
}

/// Partial field set as produced by a fetcher. Any field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawObservation {
    pub stable: Option<RawValue>,
    pub beta: Option<RawValue>,
    pub beta_release_date: Option<RawValue>,
    /// Set when the whole fetch for this platform failed.
    pub fetch_error: Option<String>,
}

impl RawObservation {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self { fetch_error: Some(reason.into()), ..Self::default() }
    }

    pub fn get(&self, field: Field) -> Option<&RawValue> {
        match field {
            Field::Stable => self.stable.as_ref(),
            Field::Beta => self.beta.as_ref(),
            Field::BetaReleaseDate => self.beta_release_date.as_ref(),
        }
    }
}

/// Fetcher output for one run. Any platform may be absent.
pub type Observations = BTreeMap<Platform, RawObservation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_order_is_declaration_order() {
        let mut v = vec![Platform::ChromeOs, Platform::MacOs, Platform::Windows, Platform::IpadOs];
        v.sort();
        assert_eq!(v, Platform::ALL.to_vec());
    }

    #[test]
    fn platform_parses_case_insensitive() {
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::MacOs);
        assert_eq!(" ChromeOS ".parse::<Platform>().unwrap(), Platform::ChromeOs);
        assert!("linux".parse::<Platform>().is_err());
    }

    #[test]
    fn snapshot_serializes_with_display_names() {
        let snap = Snapshot::unknown(&[Platform::IpadOs], "-");
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"iPadOS":{"stable":"-","beta":"-","beta_release_date":"-"}}"#);
    }
}
