pub mod config;
pub mod exercise;
pub mod log;
pub mod mood;
pub mod stats;

use ocdian_core::{Database, JournalStore};

/// Journal over the default on-disk database, already loaded.
pub fn open_journal() -> Result<JournalStore<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(JournalStore::init(db))
}
