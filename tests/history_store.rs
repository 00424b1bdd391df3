// tests/history_store.rs
use std::fs;

use chrono::{Days, NaiveDate};

use os_watch::model::{FieldSet, Platform, Snapshot};
use os_watch::store::{History, HistoryStore, StoreError};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
}

fn snap(stable: &str) -> Snapshot {
    let mut s = Snapshot::unknown(&Platform::ALL, "-");
    s.insert(Platform::Windows, FieldSet { stable: stable.into(), ..FieldSet::default() });
    s
}

#[test]
fn missing_store_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("nope/history.json"), 7);
    assert!(store.load().is_empty());
}

#[test]
fn corrupt_store_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(HistoryStore::new(&path, 7).load().is_empty());
}

#[test]
fn save_then_load_round_trips_and_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join(".store/history.json"), 7);

    let mut h = store.load();
    store.save(&mut h, start(), snap("24H2")).unwrap();

    let loaded = store.load();
    assert_eq!(loaded.get(start()), Some(&snap("24H2")));
    assert_eq!(loaded, h);

    // human-inspectable layout
    let text = fs::read_to_string(store.path()).unwrap();
    assert!(text.contains("\"2026-10-01\""));
    assert!(text.contains("\"Windows\""));
    assert!(text.contains("\"beta_release_date\": \"-\""));
}

#[test]
fn eighth_save_evicts_oldest() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("history.json"), 7);
    let mut h = History::new();

    for i in 0..8u64 {
        let d = start().checked_add_days(Days::new(i)).unwrap();
        store.save(&mut h, d, snap(&format!("v{i}"))).unwrap();
        assert!(h.len() <= 7);
    }

    let loaded = store.load();
    assert_eq!(loaded.len(), 7);
    let expected: Vec<_> = (1..8u64).map(|i| start().checked_add_days(Days::new(i)).unwrap()).collect();
    assert_eq!(loaded.dates().collect::<Vec<_>>(), expected);
}

#[test]
fn same_day_save_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("history.json"), 7);
    let mut h = History::new();

    store.save(&mut h, start(), snap("25H2")).unwrap();
    let first = fs::read_to_string(store.path()).unwrap();
    store.save(&mut h, start(), snap("25H2")).unwrap();
    let second = fs::read_to_string(store.path()).unwrap();

    assert_eq!(h.len(), 1);
    assert_eq!(first, second);
}

#[test]
fn store_dir_that_is_a_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocked");
    fs::write(&blocker, "x").unwrap();

    let store = HistoryStore::new(blocker.join("history.json"), 7);
    let err = store.save(&mut History::new(), start(), snap("25H2")).unwrap_err();
    assert!(matches!(err, StoreError::CreateDir { .. }));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

#[cfg(unix)]
#[test]
fn failed_save_keeps_previous_file_byte_for_byte() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store_dir = dir.path().join("store");
    let store = HistoryStore::new(store_dir.join("history.json"), 7);
    let mut h = History::new();
    store.save(&mut h, start(), snap("24H2")).unwrap();
    let before = fs::read(store.path()).unwrap();

    fs::set_permissions(&store_dir, fs::Permissions::from_mode(0o555)).unwrap();
    // privileged users ignore directory modes; nothing to observe then
    if fs::write(store_dir.join("writable-check"), "x").is_ok() {
        let _ = fs::remove_file(store_dir.join("writable-check"));
        fs::set_permissions(&store_dir, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let next = start().checked_add_days(Days::new(1)).unwrap();
    let result = store.save(&mut h, next, snap("25H2"));
    fs::set_permissions(&store_dir, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(result, Err(StoreError::Write { .. })));
    assert_eq!(fs::read(store.path()).unwrap(), before);
    let names: Vec<_> = fs::read_dir(&store_dir).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(names, vec!["history.json"]);
}
