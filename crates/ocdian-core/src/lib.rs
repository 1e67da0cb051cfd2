//! # OCDian Core Library
//!
//! Core logic for the OCDian symptom journal and guided exercises. The CLI
//! (and any GUI) is a thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven countdown state machine shared by the
//!   breathing, body-scan, mindfulness and ERP exercises. The caller owns the
//!   clock and invokes `tick()` once per second.
//! - **Journal**: log entries and mood samples persisted as two JSON lists in
//!   a key-value store (SQLite `kv` table by default).
//! - **Stats**: pure functions over the mood history (streak, averages,
//!   common triggers).
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Countdown state machine
//! - [`ErpRunner`]: Exposure timer with panic-button breathing interruption
//! - [`JournalStore`]: Entries and moods with immediate persistence
//! - [`Insights`]: Mood history summary
//! - [`Config`]: Exercise presets

pub mod coping;
pub mod error;
pub mod events;
pub mod exercise;
pub mod journal;
pub mod scales;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Observers, StoreChange, TimerEvent};
pub use exercise::Exercise;
pub use journal::{JournalStore, LogEntry, MoodSample, Trigger, TRIGGERS};
pub use scales::{AnxietyLevel, MoodValue};
pub use stats::{Insights, MoodCategory};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use timer::{ErpEvent, ErpRunner, ErpSession, Phase, SessionConfig, TimerEngine};
