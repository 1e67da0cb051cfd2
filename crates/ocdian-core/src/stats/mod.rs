//! Statistics over the mood history.
//!
//! Everything here is a pure function of a `MoodSample` slice. Insertion
//! order of the slice is not assumed to be chronological.

mod insights;
mod streak;

pub use insights::{
    average_mood, average_mood_category, best_day, most_common_triggers, most_recent,
    trigger_count, Insights, MoodCategory, TriggerStat, DEFAULT_TRIGGER_LIMIT,
};
pub use streak::{current_streak, current_streak_in};
