//! Symptom journal: obsession/compulsion log entries and mood samples.

mod entry;
mod mood;
mod store;

pub use entry::LogEntry;
pub use mood::{MoodSample, Trigger, TRIGGERS};
pub use store::{JournalStore, ENTRIES_KEY, MOODS_KEY};
