// src/scrape.rs
use std::{
    thread, time::Duration,
    sync::{ mpsc, atomic::{ AtomicUsize, Ordering }},
};

use crate::{
    config::consts::{
        APPLE_RELEASES_URL, CHROME_RELEASE_NOTES_URL, REQUEST_PAUSE_MS, STAGGER_MS,
        WINDOWS_RELEASE_HEALTH_URL, WORKERS,
    },
    core::{FetchError, Http},
    model::{Observations, Platform, RawObservation},
    progress::Progress,
    specs,
};

/// Produces a partial field set for one platform.
pub trait Source: Send + Sync {
    fn platform(&self) -> Platform;
    fn fetch(&self, http: &Http) -> Result<RawObservation, FetchError>;
}

/// Apple's developer release feed; one instance per Apple platform.
pub struct AppleSource {
    platform: Platform,
}

impl AppleSource {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Source for AppleSource {
    fn platform(&self) -> Platform { self.platform }

    fn fetch(&self, http: &Http) -> Result<RawObservation, FetchError> {
        let doc = http.get(APPLE_RELEASES_URL)?;
        Ok(specs::apple::extract(&doc, self.platform.name()))
    }
}

pub struct WindowsSource;

impl Source for WindowsSource {
    fn platform(&self) -> Platform { Platform::Windows }

    fn fetch(&self, http: &Http) -> Result<RawObservation, FetchError> {
        let doc = http.get(WINDOWS_RELEASE_HEALTH_URL)?;
        Ok(specs::windows::extract(&doc))
    }
}

pub struct ChromeSource;

impl Source for ChromeSource {
    fn platform(&self) -> Platform { Platform::ChromeOs }

    fn fetch(&self, http: &Http) -> Result<RawObservation, FetchError> {
        let doc = http.get(CHROME_RELEASE_NOTES_URL)?;
        Ok(specs::chrome::extract(&doc))
    }
}

/// The built-in source for each listed platform, in list order.
pub fn default_sources(platforms: &[Platform]) -> Vec<Box<dyn Source>> {
    platforms
        .iter()
        .map(|&p| -> Box<dyn Source> {
            match p {
                Platform::MacOs | Platform::IpadOs => Box::new(AppleSource::new(p)),
                Platform::Windows => Box::new(WindowsSource),
                Platform::ChromeOs => Box::new(ChromeSource),
            }
        })
        .collect()
}

/// Run every source on a small worker pool and fold the results.
///
/// A failing source becomes `RawObservation::failed` for its platform; it
/// never aborts the others. Results are folded in source order, not
/// completion order, so a later source for the same platform wins.
pub fn collect(
    sources: &[Box<dyn Source>],
    http: &Http,
    mut progress: Option<&mut dyn Progress>,
) -> Observations {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(sources.len());
    }

    let counter = AtomicUsize::new(0);
    let (res_tx, res_rx) = mpsc::channel::<(usize, Result<RawObservation, FetchError>)>();
    let workers = WORKERS.min(sources.len()).max(1);

    let mut results: Vec<Option<RawObservation>> = vec![None; sources.len()];

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = res_tx.clone();
            let idx = &counter;
            scope.spawn(move || {
                loop {
                    let i = idx.fetch_add(1, Ordering::Relaxed);
                    if i >= sources.len() {
                        break;
                    }
                    let _ = tx.send((i, sources[i].fetch(http)));
                    thread::sleep(pause_after(i));
                }
            });
        }
        drop(res_tx); // main thread is sole receiver now

        for (i, result) in res_rx.iter() {
            let platform = sources[i].platform();
            let obs = match result {
                Ok(obs) => {
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(platform);
                    }
                    obs
                }
                Err(e) => {
                    loge!("{platform}: {e}");
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(platform, &e.to_string());
                    }
                    RawObservation::failed(e.to_string())
                }
            };
            results[i] = Some(obs);
        }
    });

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    let mut out = Observations::new();
    for (src, obs) in sources.iter().zip(results) {
        if let Some(obs) = obs {
            out.insert(src.platform(), obs);
        }
    }
    out
}

/// Pause after request `i`: the polite base plus a fixed per-index stagger
/// so workers don't hit a host in lockstep.
fn pause_after(i: usize) -> Duration {
    Duration::from_millis(REQUEST_PAUSE_MS + (i as u64 * 17) % STAGGER_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawValue;
    use crate::progress::LogProgress;

    struct Fixed(Platform, &'static str);

    impl Source for Fixed {
        fn platform(&self) -> Platform { self.0 }
        fn fetch(&self, _http: &Http) -> Result<RawObservation, FetchError> {
            Ok(RawObservation { stable: Some(RawValue::value(self.1)), ..RawObservation::default() })
        }
    }

    struct Down(Platform);

    impl Source for Down {
        fn platform(&self) -> Platform { self.0 }
        fn fetch(&self, http: &Http) -> Result<RawObservation, FetchError> {
            // unroutable port: fails fast without touching the network
            http.get("http://127.0.0.1:9/").map(|_| RawObservation::default())
        }
    }

    #[test]
    fn default_sources_follow_platform_list() {
        let srcs = default_sources(&[Platform::ChromeOs, Platform::IpadOs]);
        let ps: Vec<_> = srcs.iter().map(|s| s.platform()).collect();
        assert_eq!(ps, vec![Platform::ChromeOs, Platform::IpadOs]);
    }

    #[test]
    fn failures_are_isolated_per_platform() {
        let http = Http::new().unwrap();
        let sources: Vec<Box<dyn Source>> = vec![
            Box::new(Fixed(Platform::MacOs, "26.1")),
            Box::new(Down(Platform::Windows)),
        ];
        let mut progress = LogProgress::default();
        let obs = collect(&sources, &http, Some(&mut progress));

        assert_eq!(obs[&Platform::MacOs].stable, Some(RawValue::value("26.1")));
        assert!(obs[&Platform::Windows].fetch_error.is_some());
    }

    #[test]
    fn pause_is_staggered_by_index_and_bounded() {
        let base = Duration::from_millis(REQUEST_PAUSE_MS);
        let cap = Duration::from_millis(REQUEST_PAUSE_MS + STAGGER_MS);
        assert_eq!(pause_after(0), base);
        assert_eq!(pause_after(1), pause_after(1));
        assert_ne!(pause_after(1), pause_after(2));
        assert!((0..64).all(|i| pause_after(i) >= base && pause_after(i) < cap));
    }

    #[test]
    fn later_source_wins_for_same_platform() {
        let http = Http::new().unwrap();
        let sources: Vec<Box<dyn Source>> = vec![
            Box::new(Fixed(Platform::MacOs, "first")),
            Box::new(Fixed(Platform::MacOs, "second")),
        ];
        let obs = collect(&sources, &http, None);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[&Platform::MacOs].stable, Some(RawValue::value("second")));
    }
}
