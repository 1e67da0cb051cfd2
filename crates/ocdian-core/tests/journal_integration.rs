//! Integration tests for the journal over the SQLite key-value store.

use std::collections::HashSet;

use chrono::{Duration, Local, TimeZone, Utc};
use ocdian_core::journal::{ENTRIES_KEY, MOODS_KEY};
use ocdian_core::stats::{self, current_streak_in};
use ocdian_core::{Database, Insights, JournalStore, KeyValueStore, MoodSample, MoodValue};
use proptest::prelude::*;

#[test]
fn test_save_load_roundtrip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ocdian.db");

    let (entries, moods) = {
        let mut store = JournalStore::init(Database::open_at(&path).unwrap());
        let first = store.add_entry("Did I lock the door?", None).unwrap();
        store.add_entry("Germs on the handle", Some("Washed hands")).unwrap();
        assert!(store.update_compulsion(first, "Checked three times"));
        store.record_mood(2, ["Stress", "Work"], "deadline").unwrap();
        store.record_mood(4, ["Family"], "").unwrap();
        let snapshot = (store.entries().to_vec(), store.moods().to_vec());
        store.teardown();
        snapshot
    };

    let reopened = JournalStore::init(Database::open_at(&path).unwrap());
    assert_eq!(reopened.entries(), entries.as_slice());
    assert_eq!(reopened.moods(), moods.as_slice());
    assert_eq!(reopened.entries()[0].obsession, "Germs on the handle");
    assert_eq!(
        reopened.entries()[1].compulsion.as_deref(),
        Some("Checked three times")
    );
}

#[test]
fn test_persisted_layout_is_two_json_lists() {
    let mut store = JournalStore::init(Database::open_memory().unwrap());
    store.add_entry("Counting steps", None).unwrap();
    store.record_mood(3, ["Health"], "").unwrap();

    let entries: serde_json::Value =
        serde_json::from_str(&store.backend().get(ENTRIES_KEY).unwrap().unwrap()).unwrap();
    let moods: serde_json::Value =
        serde_json::from_str(&store.backend().get(MOODS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
    assert_eq!(moods[0]["mood_value"], 3);
    assert_eq!(moods[0]["triggers"][0], "Health");
}

#[test]
fn test_delete_and_clear_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ocdian.db");

    let mut store = JournalStore::init(Database::open_at(&path).unwrap());
    let keep = store.add_entry("keep me", None).unwrap();
    let gone = store.add_entry("drop me", None).unwrap();
    store.record_mood(5, Vec::<String>::new(), "").unwrap();

    let ids: HashSet<_> = [gone].into_iter().collect();
    assert_eq!(store.delete_entries(&ids), 1);
    store.clear_mood_history();
    store.teardown();

    let reopened = JournalStore::init(Database::open_at(&path).unwrap());
    assert_eq!(reopened.entries().len(), 1);
    assert_eq!(reopened.entries()[0].id, keep);
    assert!(reopened.moods().is_empty());
}

#[test]
fn test_stats_over_recorded_history() {
    let mut store = JournalStore::init(Database::open_memory().unwrap());
    store.record_mood(3, ["Stress"], "").unwrap();
    store.record_mood(2, ["Stress", "Work"], "").unwrap();
    store.record_mood(4, Vec::<String>::new(), "").unwrap();

    assert_eq!(
        stats::most_common_triggers(store.moods(), 5),
        Some(vec!["Stress".to_string(), "Work".to_string()])
    );
    assert_eq!(stats::average_mood(store.moods()), Some(3.0));

    let insights = Insights::compute(store.moods(), Local::now().date_naive());
    assert_eq!(insights.total_samples, 3);
    assert_eq!(insights.best_mood, Some(4));
    assert_eq!(insights.current_streak, 1);
}

#[test]
fn test_streak_over_backdated_samples() {
    let today = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let mood = MoodValue::new(3).unwrap();
    let day = |offset: i64| MoodSample::at(today - Duration::days(offset), mood, Vec::<String>::new(), "");

    let mut store = JournalStore::init(Database::open_memory().unwrap());
    // Inserted out of order on purpose.
    for offset in [1, 0, 2, 5] {
        store.add_mood(day(offset)).unwrap();
    }
    assert_eq!(current_streak_in(store.moods(), today.date_naive(), &Utc), 3);

    let stale = [day(2)];
    assert_eq!(current_streak_in(&stale, today.date_naive(), &Utc), 1);
    assert_eq!(current_streak_in(&[], today.date_naive(), &Utc), 0);
}

proptest! {
    #[test]
    fn prop_add_entry_prepends(
        existing in proptest::collection::vec("[a-z]{1,12}", 0..8),
        text in "[a-zA-Z][a-zA-Z ]{0,30}",
    ) {
        let mut store = JournalStore::init(Database::open_memory().unwrap());
        for obsession in &existing {
            store.add_entry(obsession, None).unwrap();
        }
        let before = store.entries().len();
        let id = store.add_entry(&text, None).unwrap();
        prop_assert_eq!(store.entries().len(), before + 1);
        prop_assert_eq!(store.entries()[0].id, id);
        prop_assert_eq!(store.entries()[0].obsession.as_str(), text.trim());
    }

    #[test]
    fn prop_blank_entry_is_rejected(blank in "[ \t\n]{0,10}") {
        let mut store = JournalStore::init(Database::open_memory().unwrap());
        store.add_entry("existing", None).unwrap();
        prop_assert!(store.add_entry(&blank, None).is_err());
        prop_assert_eq!(store.entries().len(), 1);
    }
}
