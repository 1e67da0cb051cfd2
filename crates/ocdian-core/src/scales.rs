//! Bounded rating scales used by mood samples and ERP sessions.
//!
//! Both types validate on construction and on deserialization, so an
//! out-of-range value can never reach the journal.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Self-reported mood, 1 (very low) to 5 (very good).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MoodValue(u8);

impl MoodValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        Self::try_from(value)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Very Low",
            2 => "Low",
            3 => "Neutral",
            4 => "Good",
            _ => "Very Good",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self.0 {
            1 => "😢",
            2 => "😕",
            3 => "😐",
            4 => "🙂",
            _ => "😊",
        }
    }
}

impl Default for MoodValue {
    fn default() -> Self {
        MoodValue(3)
    }
}

impl TryFrom<u8> for MoodValue {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(MoodValue(value))
        } else {
            Err(ValidationError::OutOfRange {
                field: "mood",
                value: i64::from(value),
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            })
        }
    }
}

impl From<MoodValue> for u8 {
    fn from(value: MoodValue) -> Self {
        value.0
    }
}

/// Anxiety rating, 1 (very calm) to 10 (very anxious).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AnxietyLevel(u8);

impl AnxietyLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        Self::try_from(value)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1..=2 => "Very Calm",
            3..=4 => "Calm",
            5..=6 => "Neutral",
            7..=8 => "Anxious",
            _ => "Very Anxious",
        }
    }
}

impl Default for AnxietyLevel {
    fn default() -> Self {
        AnxietyLevel(5)
    }
}

impl TryFrom<u8> for AnxietyLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(AnxietyLevel(value))
        } else {
            Err(ValidationError::OutOfRange {
                field: "anxiety",
                value: i64::from(value),
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            })
        }
    }
}

impl From<AnxietyLevel> for u8 {
    fn from(value: AnxietyLevel) -> Self {
        value.0
    }
}
