// src/runner.rs
use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    config::{Config, ConfigError},
    core::Http,
    diff::{self, ChangeRecord},
    model::{Observations, Snapshot},
    normalize::normalize,
    notify::{ConsoleNotifier, ExportNotifier, Notifier, NotifyError, OutboxNotifier},
    progress::Progress,
    report::{self, Report},
    scrape,
    store::{History, HistoryStore, StoreError},
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{sink} notifier failed: {source}")]
    Notify { sink: &'static str, source: NotifyError },
}

/// Per-invocation options that are not part of the long-lived config.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub today: NaiveDate,
    /// Compare against this date instead of yesterday.
    pub since: Option<NaiveDate>,
    /// `false` skips the network and normalizes an empty observation set.
    /// Such a run is a dry run: the report is built, history is not written.
    pub fetch: bool,
}

/// What one run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub today: NaiveDate,
    pub snapshot: Snapshot,
    pub changes: Vec<ChangeRecord>,
    pub report: Report,
    pub history_len: usize,
}

/// Top-level: fetch → reconcile → notify.
pub fn run(
    cfg: &Config,
    opts: &RunOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, RunError> {
    cfg.validate()?;

    let store = HistoryStore::from_config(cfg);
    let summary = if opts.fetch {
        let raw = fetch(cfg, progress);
        reconcile(cfg, &store, &raw, opts.today, opts.since)?
    } else {
        logf!("Fetch skipped; history at {} left untouched", store.path().display());
        preview(cfg, &store, &Observations::new(), opts.today, opts.since)
    };

    let mut sinks = notifiers(cfg, opts.today);
    notify_all(&mut sinks, &summary.report)?;
    Ok(summary)
}

fn fetch(cfg: &Config, progress: Option<&mut dyn Progress>) -> Observations {
    match Http::new() {
        Ok(http) => scrape::collect(&scrape::default_sources(&cfg.platforms), &http, progress),
        Err(e) => {
            // every platform degrades to sentinels downstream
            loge!("{e}");
            Observations::new()
        }
    }
}

/// The core pipeline: normalize, diff against history, persist, build report.
/// A store write failure is the only error.
pub fn reconcile(
    cfg: &Config,
    store: &HistoryStore,
    raw: &Observations,
    today: NaiveDate,
    since: Option<NaiveDate>,
) -> Result<RunSummary, RunError> {
    let mut history = store.load();
    let mut summary = evaluate(cfg, &history, raw, today, since);

    store.save(&mut history, today, summary.snapshot.clone())?;
    summary.history_len = history.len();
    Ok(summary)
}

/// Same as [`reconcile`] without the save. Never touches the store file.
pub fn preview(
    cfg: &Config,
    store: &HistoryStore,
    raw: &Observations,
    today: NaiveDate,
    since: Option<NaiveDate>,
) -> RunSummary {
    evaluate(cfg, &store.load(), raw, today, since)
}

fn evaluate(
    cfg: &Config,
    history: &History,
    raw: &Observations,
    today: NaiveDate,
    since: Option<NaiveDate>,
) -> RunSummary {
    let snapshot = normalize(cfg, raw);
    let changes = match since {
        Some(base) => diff::diff_against(cfg, history, &snapshot, base),
        None => diff::diff(cfg, history, &snapshot, today),
    };
    logf!("{} field change(s) for {today}", changes.len());

    let report = report::build(cfg, &snapshot, &changes);
    RunSummary { today, snapshot, changes, report, history_len: history.len() }
}

pub fn notifiers(cfg: &Config, today: NaiveDate) -> Vec<Box<dyn Notifier>> {
    let mut out: Vec<Box<dyn Notifier>> = Vec::new();
    if cfg.notify.console {
        out.push(Box::new(ConsoleNotifier::stdout()));
    }
    if let Some(mail) = &cfg.notify.outbox {
        out.push(Box::new(OutboxNotifier::new(mail.clone(), today)));
    }
    if let Some(export) = &cfg.notify.export {
        out.push(Box::new(ExportNotifier::new(export.clone())));
    }
    out
}

/// Every sink gets a turn; the first failure is returned afterwards.
pub fn notify_all(sinks: &mut [Box<dyn Notifier>], report: &Report) -> Result<(), RunError> {
    let mut first_err = None;
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.notify(report) {
            loge!("{} notifier: {e}", sink.name());
            first_err.get_or_insert(RunError::Notify { sink: sink.name(), source: e });
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
