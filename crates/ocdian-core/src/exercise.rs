//! Guided exercises built on the shared timer engine.
//!
//! Each exercise is a preset `SessionConfig` plus the content the
//! presentation layer shows for the current timer state.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::Config;
use crate::timer::{Phase, SessionConfig, TimerEngine};

/// A body region visited by the body-scan exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BodyPart {
    pub name: &'static str,
    pub prompt: &'static str,
    pub icon: &'static str,
}

pub const BODY_PARTS: [BodyPart; 8] = [
    BodyPart {
        name: "Head & Face",
        prompt: "Notice any tension in your forehead, jaw, and facial muscles",
        icon: "face.smiling",
    },
    BodyPart {
        name: "Shoulders",
        prompt: "Feel the weight of your shoulders, any tightness or relaxation",
        icon: "person.bust",
    },
    BodyPart {
        name: "Arms",
        prompt: "Observe sensations in your arms, from shoulders to fingertips",
        icon: "hand.raised",
    },
    BodyPart {
        name: "Chest",
        prompt: "Focus on your breathing, feel your chest rise and fall",
        icon: "heart.circle",
    },
    BodyPart {
        name: "Back",
        prompt: "Notice any areas of tension or comfort in your back",
        icon: "figure.stand",
    },
    BodyPart {
        name: "Stomach",
        prompt: "Observe sensations in your abdomen, any tension or movement",
        icon: "circle.circle",
    },
    BodyPart {
        name: "Legs",
        prompt: "Feel the sensations in your legs, from hips to toes",
        icon: "figure.walk",
    },
    BodyPart {
        name: "Feet",
        prompt: "Notice the connection of your feet with the ground",
        icon: "shoe",
    },
];

pub const MINDFULNESS_QUOTES: [&str; 8] = [
    "Be present in this moment",
    "Observe your thoughts without judgment",
    "Focus on your breath",
    "Notice the sensations in your body",
    "Let your thoughts come and go like clouds",
    "You are not your thoughts",
    "Find peace in the present moment",
    "Embrace the silence within",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Exercise {
    Breathing,
    BodyScan,
    Mindfulness,
    Erp { duration_secs: u32 },
}

impl Exercise {
    pub fn label(&self) -> &'static str {
        match self {
            Exercise::Breathing => "Breathing Exercise",
            Exercise::BodyScan => "Body Scan",
            Exercise::Mindfulness => "Mindfulness",
            Exercise::Erp { .. } => "Exposure & Response Prevention",
        }
    }

    /// Timer parameters for this exercise under the given configuration.
    ///
    /// # Errors
    /// ERP durations must be one of `erp.duration_options`; the resulting
    /// config is validated like any other timer config.
    pub fn session_config(&self, config: &Config) -> Result<SessionConfig, ValidationError> {
        let session = match *self {
            Exercise::Breathing => SessionConfig::alternating(
                config.breathing.inhale_secs,
                config.breathing.exhale_secs,
                config.breathing.cycles,
            )
            .with_prepare(config.breathing.prepare_secs),
            Exercise::BodyScan => SessionConfig::single(config.body_scan.total_secs)
                .with_segments(BODY_PARTS.len() as u32),
            Exercise::Mindfulness => SessionConfig::single(config.mindfulness.total_secs),
            Exercise::Erp { duration_secs } => {
                if !config.erp.duration_options.contains(&duration_secs) {
                    return Err(ValidationError::InvalidTimerConfig(format!(
                        "ERP duration {duration_secs}s is not one of {:?}",
                        config.erp.duration_options
                    )));
                }
                SessionConfig::single(duration_secs).pausable()
            }
        };
        session.validate()?;
        Ok(session)
    }

    /// Text the presentation layer shows for the engine's current state.
    pub fn cue(&self, engine: &TimerEngine, config: &Config) -> String {
        if engine.phase() == Phase::Completed {
            return "Exercise complete".to_string();
        }
        match self {
            Exercise::Breathing => match engine.phase() {
                Phase::Primary => "Breathe in...".to_string(),
                Phase::Secondary => "Breathe out...".to_string(),
                _ => "Get ready...".to_string(),
            },
            Exercise::BodyScan => {
                let part = body_part(engine.segment_index().unwrap_or(0));
                format!("{}: {}", part.name, part.prompt)
            }
            Exercise::Mindfulness => {
                let index = engine.rotating_index(
                    config.mindfulness.quote_interval_secs,
                    MINDFULNESS_QUOTES.len(),
                );
                MINDFULNESS_QUOTES[index].to_string()
            }
            Exercise::Erp { .. } => {
                if engine.is_paused() {
                    "Paused".to_string()
                } else {
                    format!("Stay with the discomfort: {}", engine.formatted())
                }
            }
        }
    }
}

pub fn body_part(index: usize) -> &'static BodyPart {
    &BODY_PARTS[index.min(BODY_PARTS.len() - 1)]
}
