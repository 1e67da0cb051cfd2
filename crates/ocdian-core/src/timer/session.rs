use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Discrete phase of a countdown session.
///
/// Multi-phase sessions alternate `Primary ⇄ Secondary` (inhale/exhale);
/// single-phase sessions repeat `Primary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Preparing,
    Primary,
    Secondary,
    Completed,
}

impl Phase {
    /// Phase shown while running the step at `index` of a pass.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Phase::Primary
        } else {
            Phase::Secondary
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Phase::Preparing | Phase::Primary | Phase::Secondary)
    }
}

/// Parameters for one countdown session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds per phase, in the order they run within a cycle.
    pub phase_durations: Vec<u32>,
    /// Number of full passes through `phase_durations`.
    pub cycles: u32,
    /// Optional "get ready" delay before the first phase. 0 disables it.
    #[serde(default)]
    pub prepare_secs: u32,
    /// Whether `pause`/`resume` are honoured (ERP sessions).
    #[serde(default)]
    pub pausable: bool,
    /// Segment count for exercises that step through content by elapsed time.
    #[serde(default)]
    pub segments: Option<u32>,
}

impl SessionConfig {
    /// A single countdown of `duration_secs`.
    pub fn single(duration_secs: u32) -> Self {
        Self {
            phase_durations: vec![duration_secs],
            cycles: 1,
            prepare_secs: 0,
            pausable: false,
            segments: None,
        }
    }

    /// Two alternating phases repeated `cycles` times.
    pub fn alternating(primary_secs: u32, secondary_secs: u32, cycles: u32) -> Self {
        Self {
            phase_durations: vec![primary_secs, secondary_secs],
            cycles,
            prepare_secs: 0,
            pausable: false,
            segments: None,
        }
    }

    pub fn with_prepare(mut self, secs: u32) -> Self {
        self.prepare_secs = secs;
        self
    }

    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = Some(segments);
        self
    }

    pub fn pausable(mut self) -> Self {
        self.pausable = true;
        self
    }

    /// Reject configs that could never complete or divide by zero later.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phase_durations.is_empty() {
            return Err(ValidationError::InvalidTimerConfig(
                "at least one phase is required".into(),
            ));
        }
        if let Some(i) = self.phase_durations.iter().position(|&d| d == 0) {
            return Err(ValidationError::InvalidTimerConfig(format!(
                "phase {i} has zero duration"
            )));
        }
        if self.cycles == 0 {
            return Err(ValidationError::InvalidTimerConfig(
                "cycle count must be positive".into(),
            ));
        }
        if self.segments == Some(0) {
            return Err(ValidationError::InvalidTimerConfig(
                "segment count must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn phase_count(&self) -> usize {
        self.phase_durations.len()
    }

    pub fn phase_duration(&self, index: usize) -> u32 {
        self.phase_durations.get(index).copied().unwrap_or(0)
    }

    /// Seconds in one pass through all phases.
    pub fn cycle_secs(&self) -> u32 {
        self.phase_durations
            .iter()
            .fold(0u32, |acc, &d| acc.saturating_add(d))
    }

    /// Seconds of active countdown, excluding the prepare delay.
    pub fn total_secs(&self) -> u32 {
        self.cycle_secs().saturating_mul(self.cycles)
    }
}
