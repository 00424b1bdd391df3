// src/specs/apple.rs
// developer.apple.com/news/releases: a newest-first feed of articles, each with
// an <h2> title ("macOS Tahoe 26.1 beta 3 (25B5062e)") followed by a date
// ("October 13, 2025"), either in a <time> tag or a plain paragraph.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::html::{next_tag_block_ci, strip_tags, tag_block_spans};
use crate::model::{RawObservation, RawValue};

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}\b",
    )
    .expect("static regex")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    /// "beta 3", "RC", ... ; `None` for a stable release.
    pub prerelease: Option<String>,
    pub date: Option<String>,
}

impl Release {
    pub fn is_stable(&self) -> bool {
        self.prerelease.is_none()
    }

    /// Numeric components for ordering: "26.0.1" → [26, 0, 1].
    pub fn version_key(&self) -> Vec<u32> {
        self.version.split('.').map(|p| p.parse().unwrap_or(0)).collect()
    }

    /// "26.1" or "26.1 beta 3".
    pub fn label(&self) -> String {
        match &self.prerelease {
            Some(tag) => join!(&self.version, " ", tag),
            None => self.version.clone(),
        }
    }
}

fn title_re(product: &str) -> Regex {
    // optional marketing name between product and number ("macOS Tahoe 26.1")
    let pat = format!(
        r"(?i)\b{}\s+(?:[a-z]+\s+)?(\d+(?:\.\d+)*)(?:\s+(beta|rc|release candidate)(?:\s*(\d+))?)?",
        regex::escape(product)
    );
    Regex::new(&pat).expect("escaped product name")
}

/// All `product` releases on the page, in page order (newest first).
pub fn parse_releases(doc: &str, product: &str) -> Vec<Release> {
    let re = title_re(product);

    let heads = tag_block_spans(doc, "h2");

    let mut out = Vec::new();
    for (i, &(s, e)) in heads.iter().enumerate() {
        let title = strip_tags(&doc[s..e]);
        let Some(caps) = re.captures(&title) else { continue };

        let version = s!(&caps[1]);
        let prerelease = caps.get(2).map(|m| {
            let tag = if m.as_str().eq_ignore_ascii_case("beta") { "beta" } else { "RC" };
            match caps.get(3) {
                Some(n) => join!(tag, " ", n.as_str()),
                None => s!(tag),
            }
        });

        // date belongs to this article: search up to the next title only
        let tail_end = heads.get(i + 1).map(|&(ns, _)| ns).unwrap_or(doc.len());
        let date = article_date(&doc[e..tail_end]);

        logd!("Apple: {product} {version} {prerelease:?} date={date:?}");
        out.push(Release { version, prerelease, date });
    }
    out
}

fn article_date(tail: &str) -> Option<String> {
    if let Some((s, e)) = next_tag_block_ci(tail, "<time", "</time>", 0) {
        let t = strip_tags(&tail[s..e]);
        if !t.is_empty() {
            return Some(t);
        }
    }
    DATE_RE.find(&strip_tags(tail)).map(|m| s!(m.as_str()))
}

/// Highest version among `releases`; on equal versions the one listed
/// first (newest on the feed) wins.
fn highest<'a>(releases: impl DoubleEndedIterator<Item = &'a Release>) -> Option<&'a Release> {
    // max_by_key keeps the last maximum, so walk the feed backwards
    releases.rev().max_by_key(|r| r.version_key())
}

/// Highest stable and highest pre-release for `product`. Security updates to
/// an older major line can sit above the current one in the feed.
pub fn extract(doc: &str, product: &str) -> RawObservation {
    let releases = parse_releases(doc, product);
    let stable = highest(releases.iter().filter(|r| r.is_stable()));
    let beta = highest(releases.iter().filter(|r| !r.is_stable()));

    RawObservation {
        stable: Some(match stable {
            Some(r) => RawValue::Value(r.label()),
            None => RawValue::Error(format!("no {product} release listed")),
        }),
        beta: Some(match beta {
            Some(r) => RawValue::Value(r.label()),
            None => RawValue::Error(format!("no {product} beta listed")),
        }),
        beta_release_date: beta.and_then(|r| r.date.clone()).map(RawValue::Value),
        fetch_error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"
        <section class="article-content-container">
          <a href="/news/releases/?id=1013a"><h2 class="article-title">macOS Tahoe 26.1 beta 3 (25B5062e)</h2></a>
          <p class="lighter article-date">October 13, 2025</p>
        </section>
        <section class="article-content-container">
          <a href="/news/releases/?id=1013b"><h2 class="article-title">iOS 26.1 beta 3 and iPadOS 26.1 beta 3</h2></a>
          <p class="lighter article-date">October 13, 2025</p>
        </section>
        <article>
          <h2>macOS Tahoe 26.0.1 (25A362)</h2>
          <time datetime="2025-09-29">September 29, 2025</time>
        </article>
        <article>
          <h2>iPadOS 26 RC</h2>
          <time>September 9, 2025</time>
        </article>
        <article>
          <h2>Xcode 26.1 beta 3 (17B5045g)</h2>
          <time>October 13, 2025</time>
        </article>
    "#;

    #[test]
    fn macos_newest_stable_and_beta() {
        let obs = extract(FEED, "macOS");
        assert_eq!(obs.stable, Some(RawValue::value("26.0.1")));
        assert_eq!(obs.beta, Some(RawValue::value("26.1 beta 3")));
        assert_eq!(obs.beta_release_date, Some(RawValue::value("October 13, 2025")));
    }

    #[test]
    fn ipados_without_stable_reports_error_marker() {
        let obs = extract(FEED, "iPadOS");
        assert!(matches!(obs.stable, Some(RawValue::Error(_))));
        assert_eq!(obs.beta, Some(RawValue::value("26.1 beta 3")));
        assert_eq!(obs.beta_release_date, Some(RawValue::value("October 13, 2025")));
    }

    #[test]
    fn release_candidate_is_prerelease() {
        let rs = parse_releases(FEED, "iPadOS");
        assert_eq!(rs.len(), 2);
        assert_eq!(rs[1].label(), "26 RC");
        assert_eq!(rs[1].date.as_deref(), Some("September 9, 2025"));
    }

    #[test]
    fn older_line_update_does_not_displace_current_stable() {
        let feed = r#"
            <h2>macOS Sequoia 15.7.2 (24G325)</h2><p>November 3, 2025</p>
            <h2>macOS Tahoe 26.1 beta 4 (25B5072a)</h2><p>October 27, 2025</p>
            <h2>macOS Tahoe 26.1 beta 3 (25B5062e)</h2><p>October 13, 2025</p>
            <h2>macOS Tahoe 26.0.1 (25A362)</h2><p>September 29, 2025</p>
        "#;
        let obs = extract(feed, "macOS");
        assert_eq!(obs.stable, Some(RawValue::value("26.0.1")));
        assert_eq!(obs.beta, Some(RawValue::value("26.1 beta 4")));
        assert_eq!(obs.beta_release_date, Some(RawValue::value("October 27, 2025")));
    }

    #[test]
    fn near_miss_heading_tags_are_ignored() {
        let feed = "<h2x>macOS Tahoe 99.0</h2x><h2>macOS Tahoe 26.1</h2><p>November 3, 2025</p>";
        let rs = parse_releases(feed, "macOS");
        assert_eq!(rs.len(), 1);
        assert_eq!(rs[0].version, "26.1");
    }

    #[test]
    fn page_without_titles() {
        let obs = extract("<html><body>maintenance</body></html>", "macOS");
        assert!(matches!(obs.stable, Some(RawValue::Error(_))));
        assert!(matches!(obs.beta, Some(RawValue::Error(_))));
        assert_eq!(obs.beta_release_date, None);
    }
}
