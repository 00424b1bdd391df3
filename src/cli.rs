// src/cli.rs
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use color_eyre::eyre::{self, WrapErr};
use thiserror::Error;

use crate::config::{
    Config, ConfigError, ExportFormat, ExportOptions, OutboxOptions,
    consts::{ENV_MAIL_FROM, ENV_MAIL_TO},
};
use crate::model::Platform;
use crate::progress::LogProgress;
use crate::runner::{self, RunOptions};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("Missing value for {0}")]
    MissingValue(&'static str),
    #[error("Invalid value for {flag}: {value} ({reason})")]
    Invalid { flag: &'static str, value: String, reason: String },
    #[error("Unknown arg: {0}")]
    Unknown(String),
    #[error("--mail-from/--mail-to need --outbox")]
    MailWithoutOutbox,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub enum Command {
    Run(Params),
    Help,
}

#[derive(Clone, Debug)]
pub struct Params {
    pub config: Config,
    /// Overrides the local calendar date.
    pub date: Option<NaiveDate>,
    pub since: Option<NaiveDate>,
    pub fetch: bool,
    pub verbose: bool,
}

pub fn run() -> eyre::Result<()> {
    let params = match parse_args(std::env::args().skip(1), |k| std::env::var(k).ok())? {
        Command::Help => {
            eprintln!(include_str!("cli_help.txt"));
            return Ok(());
        }
        Command::Run(p) => p,
    };

    crate::log::init(params.verbose);

    let opts = RunOptions {
        today: params.date.unwrap_or_else(|| Local::now().date_naive()),
        since: params.since,
        fetch: params.fetch,
    };
    let mut progress = LogProgress::default();
    let summary = runner::run(&params.config, &opts, Some(&mut progress))
        .wrap_err_with(|| format!("run for {} failed", opts.today))?;

    logf!(
        "Done: {} platform(s) changed, {} day(s) of history",
        summary.report.changed_platforms(),
        summary.history_len
    );
    Ok(())
}

/// Parse flags into a validated [`Params`]. `env` is consulted for mail
/// addresses that were not given on the command line.
pub fn parse_args<I, E>(args: I, env: E) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
    E: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default();
    let mut date = None;
    let mut since = None;
    let mut fetch = true;
    let mut verbose = false;

    let mut outbox_dir: Option<PathBuf> = None;
    let mut mail_from: Option<String> = None;
    let mut mail_to: Option<String> = None;

    let mut export_path: Option<PathBuf> = None;
    let mut format = ExportFormat::Csv;
    let mut include_headers = false;

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str()
        {
            "--store-dir" => cfg.store_dir = PathBuf::from(value(&mut args, "--store-dir")?),
            "--keep-days" => {
                let v = value(&mut args, "--keep-days")?;
                cfg.keep_days = v.parse().map_err(|e: std::num::ParseIntError| invalid("--keep-days", &v, e))?;}
            "--platforms" => {
                let v = value(&mut args, "--platforms")?;
                cfg.platforms = parse_platforms(&v)?;}
            "--date" => date = Some(parse_date("--date", &value(&mut args, "--date")?)?),
            "--since" => since = Some(parse_date("--since", &value(&mut args, "--since")?)?),
            "--no-fetch" => fetch = false,
            "--quiet" | "-q" => cfg.notify.console = false,
            "--outbox" => outbox_dir = Some(PathBuf::from(value(&mut args, "--outbox")?)),
            "--mail-from" => mail_from = Some(value(&mut args, "--mail-from")?),
            "--mail-to" => mail_to = Some(value(&mut args, "--mail-to")?),
            "--export" => export_path = Some(PathBuf::from(value(&mut args, "--export")?)),
            "--format" => {
                let v = value(&mut args, "--format")?;
                format = match v.to_ascii_lowercase().as_str() {
                    "csv" => ExportFormat::Csv,
                    "tsv" => ExportFormat::Tsv,
                    _ => return Err(invalid("--format", &v, "expected csv or tsv")),
                };}
            "--include-headers" => include_headers = true,
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(CliError::Unknown(a)),
        }
    }

    match outbox_dir {
        Some(dir) => {
            cfg.notify.outbox = Some(OutboxOptions {
                dir,
                from: mail_from.or_else(|| env(ENV_MAIL_FROM)).unwrap_or_default(),
                to: mail_to.or_else(|| env(ENV_MAIL_TO)).unwrap_or_default(),
            });
        }
        None if mail_from.is_some() || mail_to.is_some() => return Err(CliError::MailWithoutOutbox),
        None => {}
    }

    cfg.notify.export = export_path.map(|path| ExportOptions { path, format, include_headers });

    cfg.validate()?;
    Ok(Command::Run(Params { config: cfg, date, since, fetch, verbose }))
}

fn value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, CliError> {
    args.next().ok_or(CliError::MissingValue(flag))
}

fn invalid(flag: &'static str, value: &str, reason: impl ToString) -> CliError {
    CliError::Invalid { flag, value: s!(value), reason: reason.to_string() }
}

fn parse_date(flag: &'static str, s: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| invalid(flag, s, e))
}

fn parse_platforms(s: &str) -> Result<Vec<Platform>, CliError> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() { continue; }
        let p: Platform = part.parse().map_err(|e: String| invalid("--platforms", part, e))?;
        if !out.contains(&p) { out.push(p); }
    }
    Ok(out)
}
