// src/config/options.rs
use std::path::PathBuf;

use thiserror::Error;

use super::consts::*;
use crate::model::Platform;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("keep-days must be at least 1")]
    ZeroRetention,
    #[error("platform list is empty")]
    NoPlatforms,
    #[error("platform listed twice: {0}")]
    DuplicatePlatform(Platform),
    #[error("sentinel must not be empty")]
    EmptySentinel,
    #[error("outbox requires both a sender and a recipient address")]
    IncompleteMail,
}

/// Run configuration. Built once at startup, read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Fixed, ordered platform list. Report order follows this list.
    pub platforms: Vec<Platform>,
    pub keep_days: usize,
    pub sentinel: String,
    pub store_dir: PathBuf,
    pub notify: NotifyOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            keep_days: KEEP_DAYS,
            sentinel: s!(SENTINEL),
            store_dir: PathBuf::from(STORE_DIR),
            notify: NotifyOptions::default(),
        }
    }
}

impl Config {
    pub fn history_path(&self) -> PathBuf {
        self.store_dir.join(HISTORY_FILE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keep_days == 0 {
            return Err(ConfigError::ZeroRetention);
        }
        if self.platforms.is_empty() {
            return Err(ConfigError::NoPlatforms);
        }
        for (i, p) in self.platforms.iter().enumerate() {
            if self.platforms[..i].contains(p) {
                return Err(ConfigError::DuplicatePlatform(*p));
            }
        }
        if self.sentinel.trim().is_empty() {
            return Err(ConfigError::EmptySentinel);
        }
        if let Some(mail) = &self.notify.outbox {
            if mail.from.trim().is_empty() || mail.to.trim().is_empty() {
                return Err(ConfigError::IncompleteMail);
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotifyOptions {
    pub console: bool,
    pub outbox: Option<OutboxOptions>,
    pub export: Option<ExportOptions>,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self { console: true, outbox: None, export: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboxOptions {
    pub dir: PathBuf,
    pub from: String,
    pub to: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub include_headers: bool,
}
