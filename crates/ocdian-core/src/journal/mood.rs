use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scales::MoodValue;

/// A contextual factor the user can tag a mood sample with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trigger {
    pub name: &'static str,
    pub icon: &'static str,
}

pub const TRIGGERS: [Trigger; 6] = [
    Trigger {
        name: "Stress",
        icon: "bolt.circle.fill",
    },
    Trigger {
        name: "Social",
        icon: "person.2.fill",
    },
    Trigger {
        name: "Health",
        icon: "heart.fill",
    },
    Trigger {
        name: "Work",
        icon: "briefcase.fill",
    },
    Trigger {
        name: "Family",
        icon: "house.fill",
    },
    Trigger {
        name: "Environment",
        icon: "leaf.fill",
    },
];

impl Trigger {
    /// Case-insensitive lookup in the catalog.
    pub fn find(name: &str) -> Option<&'static Trigger> {
        TRIGGERS.iter().find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// One mood check-in. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSample {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub mood_value: MoodValue,
    #[serde(default)]
    pub triggers: BTreeSet<String>,
    #[serde(default)]
    pub notes: String,
}

impl MoodSample {
    pub fn new<I, S>(mood_value: MoodValue, triggers: I, notes: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::at(Utc::now(), mood_value, triggers, notes)
    }

    /// A sample with an explicit (possibly backdated) timestamp.
    pub fn at<I, S>(
        timestamp: DateTime<Utc>,
        mood_value: MoodValue,
        triggers: I,
        notes: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            mood_value,
            triggers: triggers.into_iter().map(Into::into).collect(),
            notes: notes.into(),
        }
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        self.triggers.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_lookup_ignores_case() {
        assert_eq!(Trigger::find("work").map(|t| t.name), Some("Work"));
        assert!(Trigger::find("Weather").is_none());
    }

    #[test]
    fn duplicate_triggers_collapse() {
        let sample = MoodSample::new(MoodValue::default(), ["Work", "Work", "Stress"], "");
        assert_eq!(sample.triggers.len(), 2);
        assert!(sample.has_trigger("Stress"));
    }
}
