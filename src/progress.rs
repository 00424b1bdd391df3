// src/progress.rs
use crate::model::Platform;

/// Lightweight progress reporting for the fetch stage.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of sources.
    fn begin(&mut self, _total: usize) {}

    fn item_done(&mut self, _platform: Platform) {}

    fn item_failed(&mut self, _platform: Platform, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Progress as log lines ("[2/4] Windows ok").
#[derive(Default)]
pub struct LogProgress {
    total: usize,
    seen: usize,
    failed: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        logf!("Fetching {total} source(s)…");
    }

    fn item_done(&mut self, platform: Platform) {
        self.seen += 1;
        logf!("[{}/{}] {platform} ok", self.seen, self.total);
    }

    fn item_failed(&mut self, platform: Platform, reason: &str) {
        self.seen += 1;
        self.failed += 1;
        logw!("[{}/{}] {platform} failed: {reason}", self.seen, self.total);
    }

    fn finish(&mut self) {
        logf!("Fetch finished: {} ok, {} failed", self.seen - self.failed, self.failed);
    }
}
