// src/report.rs
//! Presentation-agnostic summary handed to notifiers.
//!
//! A [`Report`] is two things:
//! - `summary_lines`: one line per changed platform (or a single "no changes" line),
//! - `table_rows`: the full status of every configured platform, changed or not.
//!
//! Renderers here are pure string builders; sinks live in `notify`.

use serde::Serialize;

use crate::config::Config;
use crate::csv;
use crate::diff::ChangeRecord;
use crate::model::{FieldSet, Platform, Snapshot};

pub const NO_CHANGES: &str = "No changes detected.";
pub const TABLE_HEADERS: [&str; 4] = ["Platform", "Stable", "Beta", "Beta release date"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub platform: Platform,
    pub stable: String,
    pub beta: String,
    pub beta_release_date: String,
}

impl TableRow {
    fn cells(&self) -> [&str; 4] {
        [self.platform.name(), &self.stable, &self.beta, &self.beta_release_date]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub summary_lines: Vec<String>,
    pub table_rows: Vec<TableRow>,
}

pub fn build(cfg: &Config, current: &Snapshot, changes: &[ChangeRecord]) -> Report {
    Report {
        summary_lines: summarize(cfg, changes),
        table_rows: table(cfg, current),
    }
}

fn summarize(cfg: &Config, changes: &[ChangeRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    for &platform in &cfg.platforms {
        let parts: Vec<String> = changes
            .iter()
            .filter(|c| c.platform == platform)
            .map(|c| format!("{} {} -> {}", c.field.label(), c.previous, c.current))
            .collect();
        if !parts.is_empty() {
            lines.push(format!("{platform}: {}", parts.join("; ")));
        }
    }
    // changes for platforms outside the config count as none
    if lines.is_empty() {
        lines.push(s!(NO_CHANGES));
    }
    lines
}

fn table(cfg: &Config, current: &Snapshot) -> Vec<TableRow> {
    let unknown = FieldSet::unknown(&cfg.sentinel);
    cfg.platforms
        .iter()
        .map(|&platform| {
            let f = current.get(platform).unwrap_or(&unknown);
            TableRow {
                platform,
                stable: f.stable.clone(),
                beta: f.beta.clone(),
                beta_release_date: f.beta_release_date.clone(),
            }
        })
        .collect()
}

impl Report {
    /// Number of platforms with at least one change.
    pub fn changed_platforms(&self) -> usize {
        if self.has_changes() { self.summary_lines.len() } else { 0 }
    }

    pub fn has_changes(&self) -> bool {
        !(self.summary_lines.len() == 1 && self.summary_lines[0] == NO_CHANGES)
    }

    /// Plaintext rendering: change lines, then an aligned status table.
    pub fn to_text(&self) -> String {
        let mut out = s!("Changes:\n");
        for line in &self.summary_lines {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }

        out.push_str("\nOS Versions Table:\n");
        let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
        for row in &self.table_rows {
            for (w, cell) in widths.iter_mut().zip(row.cells()) {
                *w = (*w).max(cell.chars().count());
            }
        }
        push_aligned(&mut out, TABLE_HEADERS, &widths);
        for row in &self.table_rows {
            push_aligned(&mut out, row.cells(), &widths);
        }
        out
    }

    /// Status table as CSV/TSV text.
    pub fn table_export(&self, sep: char, include_headers: bool) -> String {
        let headers = include_headers.then(|| TABLE_HEADERS.map(String::from).to_vec());
        let rows: Vec<Vec<String>> = self
            .table_rows
            .iter()
            .map(|r| r.cells().map(String::from).to_vec())
            .collect();
        csv::rows_to_string(&rows, &headers, sep)
    }
}

fn push_aligned(out: &mut String, cells: [&str; 4], widths: &[usize; 4]) {
    let mut line = s!("  ");
    for (cell, w) in cells.iter().zip(widths) {
        line.push_str(cell);
        line.extend(std::iter::repeat_n(' ', w - cell.chars().count() + 2));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn change(platform: Platform, field: Field, prev: &str, cur: &str) -> ChangeRecord {
        ChangeRecord { platform, field, previous: s!(prev), current: s!(cur) }
    }

    #[test]
    fn aggregates_fields_per_platform() {
        let cfg = Config::default();
        let changes = vec![
            change(Platform::MacOs, Field::Stable, "26.0", "26.1"),
            change(Platform::MacOs, Field::Beta, "-", "26.2 beta 1"),
            change(Platform::Windows, Field::Stable, "-", "Windows 11, version 25H2"),
        ];
        let r = build(&cfg, &Snapshot::new(), &changes);
        assert_eq!(r.summary_lines, vec![
            "macOS: stable 26.0 -> 26.1; beta - -> 26.2 beta 1",
            "Windows: stable - -> Windows 11, version 25H2",
        ]);
        assert_eq!(r.changed_platforms(), 2);
    }

    #[test]
    fn empty_changes_give_single_line_and_full_table() {
        let cfg = Config::default();
        let r = build(&cfg, &Snapshot::new(), &[]);
        assert_eq!(r.summary_lines, vec![NO_CHANGES]);
        assert!(!r.has_changes());
        assert_eq!(r.table_rows.len(), 4);
        assert!(r.table_rows.iter().all(|t| t.stable == "-"));
    }

    #[test]
    fn changes_outside_configured_platforms_read_as_none() {
        let cfg = Config { platforms: vec![Platform::MacOs], ..Config::default() };
        let changes = vec![change(Platform::ChromeOs, Field::Stable, "Chrome 141", "Chrome 142")];
        let r = build(&cfg, &Snapshot::new(), &changes);
        assert_eq!(r.summary_lines, vec![NO_CHANGES]);
        assert!(!r.has_changes());
    }

    #[test]
    fn text_rendering_is_aligned() {
        let cfg = Config { platforms: vec![Platform::MacOs, Platform::ChromeOs], ..Config::default() };
        let r = build(&cfg, &Snapshot::unknown(&cfg.platforms, "-"), &[]);
        let text = r.to_text();
        assert!(text.starts_with("Changes:\n  No changes detected.\n\nOS Versions Table:\n"));
        assert!(text.contains("  Platform  Stable  Beta  Beta release date\n"));
        assert!(text.contains("  macOS     -       -     -\n"));
        assert!(text.contains("  ChromeOS  -       -     -\n"));
    }

    #[test]
    fn table_export_quotes_separator() {
        let cfg = Config { platforms: vec![Platform::Windows], ..Config::default() };
        let mut snap = Snapshot::unknown(&cfg.platforms, "-");
        snap.insert(Platform::Windows, FieldSet { stable: s!("Windows 11, version 25H2"), ..FieldSet::default() });
        let r = build(&cfg, &snap, &[]);

        assert_eq!(r.table_export(',', false), "Windows,\"Windows 11, version 25H2\",-,-\n");
        assert_eq!(
            r.table_export('\t', true),
            "Platform\tStable\tBeta\tBeta release date\nWindows\tWindows 11, version 25H2\t-\t-\n"
        );
    }
}
