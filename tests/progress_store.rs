use std::fs;

use hacklab_hub::model::{ProgressLevel, Tool};
use hacklab_hub::progress::{self, FileProgressStore, MemoryProgressStore, ProgressStore};
use tempfile::tempdir;

#[test]
fn get_after_set_returns_level() {
    let mut store = MemoryProgressStore::new();
    for level in ProgressLevel::ALL {
        store.set("tool", level).expect("level stored");
        assert_eq!(store.get("tool"), level);
    }
    assert_eq!(store.raw("tool"), Some("3"));
}

#[test]
fn missing_or_corrupted_values_read_as_not_started() {
    let mut store = MemoryProgressStore::new();
    assert_eq!(store.get("never-set"), ProgressLevel::NotStarted);

    for raw in ["abc", "7", "-1", "1.5", "", "NaN"] {
        store.insert_raw("broken", raw);
        assert_eq!(store.get("broken"), ProgressLevel::NotStarted, "raw value {raw:?}");
    }

    store.insert_raw("padded", " 2 ");
    assert_eq!(store.get("padded"), ProgressLevel::FirstPass);
    store.insert_raw("float", "3.0");
    assert_eq!(store.get("float"), ProgressLevel::Mastered);
}

#[test]
fn levels_cycle_back_to_not_started() {
    assert_eq!(ProgressLevel::NotStarted.next(), ProgressLevel::InProgress);
    assert_eq!(ProgressLevel::InProgress.next(), ProgressLevel::FirstPass);
    assert_eq!(ProgressLevel::FirstPass.next(), ProgressLevel::Mastered);
    assert_eq!(ProgressLevel::Mastered.next(), ProgressLevel::NotStarted);
}

#[test]
fn reset_all_touches_only_visible_tools() {
    let mut hidden = Tool::new("day002", "hidden");
    hidden.hub = false;
    let tools = vec![Tool::new("day001", "shown"), hidden];

    let mut store = MemoryProgressStore::new();
    store.set("shown", ProgressLevel::Mastered).expect("set");
    store.set("hidden", ProgressLevel::Mastered).expect("set");

    let reset = progress::reset_all(&mut store, &tools).expect("reset");

    assert_eq!(reset, 1);
    assert_eq!(store.get("shown"), ProgressLevel::NotStarted);
    assert_eq!(store.get("hidden"), ProgressLevel::Mastered);
}

#[test]
fn file_store_persists_across_sessions() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("nested").join("progress.json");

    let mut store = FileProgressStore::open(&path);
    assert_eq!(store.get("xss-lab"), ProgressLevel::NotStarted);
    store.set("xss-lab", ProgressLevel::FirstPass).expect("persisted");

    let reopened = FileProgressStore::open(&path);
    assert_eq!(reopened.get("xss-lab"), ProgressLevel::FirstPass);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("file read")).expect("json");
    assert_eq!(written["progress_xss-lab"], "2");
}

#[test]
fn file_store_tolerates_corruption() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("progress.json");

    fs::write(&path, "{ not json").expect("written");
    let mut store = FileProgressStore::open(&path);
    assert_eq!(store.get("anything"), ProgressLevel::NotStarted);

    store.set("anything", ProgressLevel::InProgress).expect("overwritten");
    assert_eq!(FileProgressStore::open(&path).get("anything"), ProgressLevel::InProgress);

    fs::write(
        &path,
        serde_json::json!({
            "progress_a": 3,
            "progress_b": "abc",
            "progress_c": "7",
            "progress_d": true
        })
        .to_string(),
    )
    .expect("written");
    let store = FileProgressStore::open(&path);
    assert_eq!(store.get("a"), ProgressLevel::Mastered);
    assert_eq!(store.get("b"), ProgressLevel::NotStarted);
    assert_eq!(store.get("c"), ProgressLevel::NotStarted);
    assert_eq!(store.get("d"), ProgressLevel::NotStarted);
}

#[test]
fn failed_write_leaves_store_unchanged() {
    let temp_dir = tempdir().expect("temporary directory");
    let blocker = temp_dir.path().join("file");
    fs::write(&blocker, "not a directory").expect("written");

    let mut store = FileProgressStore::open(blocker.join("progress.json"));
    let result = store.set("xss-lab", ProgressLevel::Mastered);

    assert!(result.is_err());
    assert_eq!(store.get("xss-lab"), ProgressLevel::NotStarted);
}
