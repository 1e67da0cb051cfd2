//! The journal store: single source of truth for entries and moods.
//!
//! Every mutation is followed by a full re-serialization of both lists to
//! the backing key-value store and a change notification to observers.
//! Persistence failures degrade silently (logged at `warn`): a failed load
//! keeps the in-memory lists, a failed save drops the write.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::entry::LogEntry;
use super::mood::MoodSample;
use crate::error::{Result, ValidationError};
use crate::events::{ListenerError, Observers, StoreChange};
use crate::scales::MoodValue;
use crate::storage::KeyValueStore;

pub const ENTRIES_KEY: &str = "ocd_entries";
pub const MOODS_KEY: &str = "mood_history";

/// Log entries (newest first) and mood samples (insertion order) over a
/// key-value backend.
#[derive(Debug)]
pub struct JournalStore<S: KeyValueStore> {
    backend: S,
    entries: Vec<LogEntry>,
    moods: Vec<MoodSample>,
    observers: Observers<StoreChange>,
}

impl<S: KeyValueStore> JournalStore<S> {
    /// Empty store over `backend`; nothing is read until `load`.
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            entries: Vec::new(),
            moods: Vec::new(),
            observers: Observers::new(),
        }
    }

    /// Construct and load persisted state.
    pub fn init(backend: S) -> Self {
        let mut store = Self::new(backend);
        store.load();
        store
    }

    /// Final save, drop observers, and hand the backend back.
    pub fn teardown(mut self) -> S {
        self.save();
        self.observers.clear();
        self.backend
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn moods(&self) -> &[MoodSample] {
        &self.moods
    }

    pub fn entry(&self, id: Uuid) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&StoreChange) -> Result<(), ListenerError> + 'static,
    {
        self.observers.subscribe(listener);
    }

    /// Insert a new entry at the front of the list.
    ///
    /// # Errors
    /// Rejects empty or whitespace-only obsession text without mutating.
    pub fn add_entry(
        &mut self,
        obsession: &str,
        compulsion: Option<&str>,
    ) -> Result<Uuid, ValidationError> {
        let obsession = obsession.trim();
        if obsession.is_empty() {
            return Err(ValidationError::EmptyText { field: "obsession" });
        }
        let compulsion = compulsion
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let entry = LogEntry::new(obsession, compulsion);
        let id = entry.id;
        self.entries.insert(0, entry);
        self.persist(StoreChange::EntriesChanged);
        Ok(id)
    }

    /// Attach a compulsion to an existing entry. Returns whether anything changed.
    pub fn update_compulsion(&mut self, id: Uuid, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            tracing::debug!(%id, "update_compulsion: no such entry");
            return false;
        };
        entry.compulsion = Some(text.to_string());
        self.persist(StoreChange::EntriesChanged);
        true
    }

    /// Remove every entry whose id is in `ids`. Returns the number removed.
    pub fn delete_entries(&mut self, ids: &HashSet<Uuid>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !ids.contains(&e.id));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist(StoreChange::EntriesChanged);
        }
        removed
    }

    pub fn clear_entries(&mut self) {
        self.entries.clear();
        self.persist(StoreChange::EntriesChanged);
    }

    /// Append a sample to the mood history.
    ///
    /// Insertion order is kept even for backdated samples; readers must not
    /// assume the history is sorted by timestamp.
    ///
    /// # Errors
    /// Rejects a sample whose id is already recorded.
    pub fn add_mood(&mut self, sample: MoodSample) -> Result<(), ValidationError> {
        if self.moods.iter().any(|m| m.id == sample.id) {
            return Err(ValidationError::DuplicateId(sample.id));
        }
        self.moods.push(sample);
        self.persist(StoreChange::MoodsChanged);
        Ok(())
    }

    /// Validate a raw 1..=5 rating and record it now.
    ///
    /// # Errors
    /// Rejects out-of-range ratings without mutating.
    pub fn record_mood<I, T>(
        &mut self,
        value: u8,
        triggers: I,
        notes: &str,
    ) -> Result<Uuid, ValidationError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let sample = MoodSample::new(MoodValue::new(value)?, triggers, notes.trim());
        let id = sample.id;
        self.add_mood(sample)?;
        Ok(id)
    }

    pub fn clear_mood_history(&mut self) {
        self.moods.clear();
        self.persist(StoreChange::MoodsChanged);
    }

    /// Replace in-memory lists with persisted ones where they decode.
    ///
    /// Missing keys, backend errors and malformed JSON all leave the
    /// corresponding list as it was. Repeated ids keep their first
    /// occurrence.
    pub fn load(&mut self) {
        if let Some(entries) = self.load_list::<LogEntry>(ENTRIES_KEY, |e| e.id) {
            self.entries = entries;
        }
        if let Some(moods) = self.load_list::<MoodSample>(MOODS_KEY, |m| m.id) {
            self.moods = moods;
        }
        tracing::debug!(
            entries = self.entries.len(),
            moods = self.moods.len(),
            "journal loaded"
        );
        self.observers.publish(&StoreChange::Loaded);
    }

    /// Write both lists, logging and dropping any failure.
    pub fn save(&mut self) {
        if let Err(e) = self.try_save() {
            tracing::warn!(error = %e, "journal save failed; write dropped");
        }
    }

    /// Write both lists, surfacing the first failure.
    ///
    /// # Errors
    /// Returns serialization or backend errors.
    pub fn try_save(&mut self) -> Result<()> {
        let entries = serde_json::to_string(&self.entries)?;
        let moods = serde_json::to_string(&self.moods)?;
        self.backend.set(ENTRIES_KEY, &entries)?;
        self.backend.set(MOODS_KEY, &moods)?;
        Ok(())
    }

    fn load_list<T: DeserializeOwned>(&self, key: &str, id: fn(&T) -> Uuid) -> Option<Vec<T>> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "could not read journal key");
                return None;
            }
        };
        let mut list: Vec<T> = match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed journal data");
                return None;
            }
        };
        let total = list.len();
        let mut seen = HashSet::with_capacity(total);
        list.retain(|item| seen.insert(id(item)));
        let dropped = total - list.len();
        if dropped > 0 {
            tracing::warn!(key, dropped, "dropping duplicate journal ids");
        }
        Some(list)
    }

    fn persist(&mut self, change: StoreChange) {
        self.save();
        self.observers.publish(&change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store() -> JournalStore<MemoryStore> {
        JournalStore::init(MemoryStore::new())
    }

    #[test]
    fn add_entry_inserts_at_front() {
        let mut s = store();
        let first = s.add_entry("door unlocked?", None).unwrap();
        let second = s.add_entry("  germs on hands  ", Some("washed")).unwrap();
        assert_eq!(s.entries().len(), 2);
        assert_eq!(s.entries()[0].id, second);
        assert_eq!(s.entries()[0].obsession, "germs on hands");
        assert_eq!(s.entries()[0].compulsion.as_deref(), Some("washed"));
        assert_eq!(s.entries()[1].id, first);
    }

    #[test]
    fn blank_entries_are_rejected() {
        let mut s = store();
        assert!(s.add_entry("", None).is_err());
        assert!(s.add_entry("   ", None).is_err());
        assert!(s.entries().is_empty());
        assert!(s.backend().get(ENTRIES_KEY).unwrap().is_none());
    }

    #[test]
    fn update_compulsion_requires_match_and_text() {
        let mut s = store();
        let id = s.add_entry("stove left on", None).unwrap();
        assert!(!s.update_compulsion(id, "  "));
        assert!(!s.update_compulsion(Uuid::new_v4(), "checked twice"));
        assert!(s.entry(id).unwrap().compulsion.is_none());

        assert!(s.update_compulsion(id, "checked twice"));
        assert_eq!(s.entry(id).unwrap().compulsion.as_deref(), Some("checked twice"));
    }

    #[test]
    fn delete_entries_by_id_set() {
        let mut s = store();
        let a = s.add_entry("a", None).unwrap();
        let b = s.add_entry("b", None).unwrap();
        let c = s.add_entry("c", None).unwrap();
        let ids: HashSet<Uuid> = [a, c, Uuid::new_v4()].into_iter().collect();
        assert_eq!(s.delete_entries(&ids), 2);
        assert_eq!(s.entries().len(), 1);
        assert_eq!(s.entries()[0].id, b);
    }

    #[test]
    fn mutations_persist_immediately() {
        let mut s = store();
        s.add_entry("counting steps", None).unwrap();
        s.record_mood(2, ["Work"], "long day").unwrap();
        let raw_entries = s.backend().get(ENTRIES_KEY).unwrap().unwrap();
        let raw_moods = s.backend().get(MOODS_KEY).unwrap().unwrap();
        assert!(raw_entries.contains("counting steps"));
        assert!(raw_moods.contains("long day"));
    }

    #[test]
    fn out_of_range_mood_is_rejected() {
        let mut s = store();
        assert!(s.record_mood(0, Vec::<String>::new(), "").is_err());
        assert!(s.record_mood(6, Vec::<String>::new(), "").is_err());
        assert!(s.moods().is_empty());
    }

    #[test]
    fn duplicate_mood_id_is_rejected() {
        let mut s = store();
        let sample = MoodSample::new(MoodValue::new(4).unwrap(), ["Stress"], "");
        s.add_mood(sample.clone()).unwrap();
        assert_eq!(s.add_mood(sample), Err(ValidationError::DuplicateId(s.moods()[0].id)));
        assert_eq!(s.moods().len(), 1);
    }

    #[test]
    fn clear_mood_history_empties_list() {
        let mut s = store();
        s.record_mood(3, ["Health"], "").unwrap();
        s.clear_mood_history();
        assert!(s.moods().is_empty());
        assert_eq!(s.backend().get(MOODS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn malformed_data_keeps_current_state() {
        let mut backend = MemoryStore::new();
        backend.set(ENTRIES_KEY, "{not json").unwrap();
        backend.set(MOODS_KEY, r#"[{"id":"x"}]"#).unwrap();
        let s = JournalStore::init(backend);
        assert!(s.entries().is_empty());
        assert!(s.moods().is_empty());
    }

    #[test]
    fn duplicate_ids_are_dropped_on_load() {
        let entry = LogEntry::new("door unlocked?", None);
        let mut copy = entry.clone();
        copy.obsession = "stove left on".into();
        let sample = MoodSample::new(MoodValue::new(2).unwrap(), ["Work"], "");

        let mut backend = MemoryStore::new();
        backend
            .set(ENTRIES_KEY, &serde_json::to_string(&[&entry, &copy]).unwrap())
            .unwrap();
        backend
            .set(MOODS_KEY, &serde_json::to_string(&[&sample, &sample]).unwrap())
            .unwrap();

        let mut s = JournalStore::init(backend);
        assert_eq!(s.entries().len(), 1);
        assert_eq!(s.entries()[0].obsession, "door unlocked?");
        assert_eq!(s.moods().len(), 1);

        assert!(s.update_compulsion(entry.id, "checked once"));
        assert!(!s.backend().get(ENTRIES_KEY).unwrap().unwrap().contains("stove left on"));
    }

    #[test]
    fn observers_see_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut s = store();
        let sink = Rc::clone(&seen);
        s.subscribe(move |change| {
            sink.borrow_mut().push(*change);
            Ok(())
        });
        s.add_entry("x", None).unwrap();
        s.record_mood(5, ["Family"], "").unwrap();
        s.clear_entries();
        s.load();
        assert_eq!(
            *seen.borrow(),
            vec![
                StoreChange::EntriesChanged,
                StoreChange::MoodsChanged,
                StoreChange::EntriesChanged,
                StoreChange::Loaded,
            ]
        );
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Locked)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn backend_failures_are_not_fatal() {
        let mut s = JournalStore::init(BrokenStore);
        let id = s.add_entry("still recorded in memory", None).unwrap();
        assert_eq!(s.entries()[0].id, id);
        assert!(s.try_save().is_err());
        s.load();
        assert_eq!(s.entries().len(), 1);
    }
}
