// src/config/consts.rs

// Canonical record
pub const SENTINEL: &str = "-";
pub const DATE_FORMAT: &str = "%d %b %Y";

// Local store
pub const STORE_DIR: &str = ".store";
pub const HISTORY_FILE: &str = "history.json";
pub const KEEP_DAYS: usize = 7;

// Sources
pub const APPLE_RELEASES_URL: &str = "https://developer.apple.com/news/releases/";
pub const WINDOWS_RELEASE_HEALTH_URL: &str = "https://learn.microsoft.com/en-us/windows/release-health/";
pub const CHROME_RELEASE_NOTES_URL: &str = "https://developer.chrome.com/release-notes";

// Net config
pub const USER_AGENT: &str = concat!("os_watch/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 15;

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const STAGGER_MS: u64 = 50; // per-request offset, 0..50 ms by index

// Mail
pub const OUTBOX_EXT: &str = "eml";
pub const ENV_MAIL_FROM: &str = "OS_WATCH_MAIL_FROM";
pub const ENV_MAIL_TO: &str = "OS_WATCH_MAIL_TO";
