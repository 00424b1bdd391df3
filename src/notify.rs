// src/notify.rs
//! Report sinks. The core hands over a finished [`Report`]; what happens to
//! it (terminal, mail outbox, CSV on disk) is decided here.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::{ExportOptions, OutboxOptions, consts::OUTBOX_EXT};
use crate::file::{ensure_directory, write_atomic, write_table_export};
use crate::report::Report;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("could not write report to console: {0}")]
    Console(#[source] io::Error),
    #[error("could not write {path}: {source}")]
    File { path: PathBuf, source: io::Error },
}

pub trait Notifier {
    /// Short name for logs.
    fn name(&self) -> &'static str;
    fn notify(&mut self, report: &Report) -> Result<(), NotifyError>;
}

/// Plaintext report to any writer (stdout by default).
pub struct ConsoleNotifier<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleNotifier {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn name(&self) -> &'static str { "console" }

    fn notify(&mut self, report: &Report) -> Result<(), NotifyError> {
        self.out
            .write_all(report.to_text().as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(NotifyError::Console)
    }
}

/// Drops a complete RFC 5322 message into a directory; delivery is left to
/// whatever mailer watches it.
pub struct OutboxNotifier {
    opts: OutboxOptions,
    date: NaiveDate,
}

impl OutboxNotifier {
    pub fn new(opts: OutboxOptions, date: NaiveDate) -> Self {
        Self { opts, date }
    }

    pub fn message_path(&self) -> PathBuf {
        self.opts.dir.join(format!("{}.{OUTBOX_EXT}", self.date.format("%Y-%m-%d")))
    }
}

impl Notifier for OutboxNotifier {
    fn name(&self) -> &'static str { "outbox" }

    fn notify(&mut self, report: &Report) -> Result<(), NotifyError> {
        let path = self.message_path();
        let file_err = |source| NotifyError::File { path: path.clone(), source };

        ensure_directory(&self.opts.dir).map_err(file_err)?;
        let msg = email::render(report, &self.opts.from, &self.opts.to, self.date);
        write_atomic(&path, msg.as_bytes()).map_err(file_err)?;
        logf!("Queued mail for {} at {}", self.opts.to, path.display());
        Ok(())
    }
}

/// Status table as CSV/TSV.
pub struct ExportNotifier {
    opts: ExportOptions,
}

impl ExportNotifier {
    pub fn new(opts: ExportOptions) -> Self {
        Self { opts }
    }
}

impl Notifier for ExportNotifier {
    fn name(&self) -> &'static str { "export" }

    fn notify(&mut self, report: &Report) -> Result<(), NotifyError> {
        let path = write_table_export(&self.opts, report)
            .map_err(|source| NotifyError::File { path: self.opts.path.clone(), source })?;
        logf!("Wrote {}", path.display());
        Ok(())
    }
}

pub mod email {
    use chrono::NaiveDate;

    use crate::report::Report;

    pub fn subject(report: &Report) -> String {
        match report.changed_platforms() {
            0 => s!("OS version update: no changes"),
            n => format!("OS version update: {n} platform(s) changed"),
        }
    }

    /// Plaintext message with CRLF line endings.
    pub fn render(report: &Report, from: &str, to: &str, date: NaiveDate) -> String {
        let stamp = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().to_rfc2822())
            .unwrap_or_default();
        let subj = subject(report);

        let mut msg = String::new();
        for (k, v) in [
            ("From", from),
            ("To", to),
            ("Subject", subj.as_str()),
            ("Date", stamp.as_str()),
            ("MIME-Version", "1.0"),
            ("Content-Type", "text/plain; charset=utf-8"),
            ("Content-Transfer-Encoding", "8bit"),
        ] {
            msg.push_str(&format!("{k}: {v}\r\n"));
        }
        msg.push_str("\r\n");
        for line in report.to_text().lines() {
            msg.push_str(line);
            msg.push_str("\r\n");
        }
        msg
    }
}
