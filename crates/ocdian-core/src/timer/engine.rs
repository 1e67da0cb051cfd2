//! Countdown timer engine shared by every guided exercise.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads - the caller delivers one `tick()` per second from its clock.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Preparing -> Primary <-> Secondary -> Completed -> (stop) -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.start(SessionConfig::alternating(4, 4, 7).with_prepare(1))?;
//! // Once per second:
//! if let Some(event) = engine.tick() { /* phase change or completion */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::display;
use super::session::{Phase, SessionConfig};
use crate::error::ValidationError;
use crate::events::TimerEvent;

/// Core countdown engine.
///
/// Every operation is infallible except `start`, which validates its config.
/// Arithmetic saturates at zero so a stray tick can never underflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerEngine {
    config: Option<SessionConfig>,
    phase: Phase,
    phase_index: usize,
    seconds_remaining: u32,
    cycles_completed: u32,
    /// Seconds counted in active phases; the prepare delay is excluded.
    elapsed_secs: u32,
    is_running: bool,
    /// Remaining time captured by `pause`, restored by `resume`.
    #[serde(default)]
    paused_remaining: Option<u32>,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An idle engine showing `config`'s first phase duration.
    pub fn idle(config: SessionConfig) -> Self {
        let seconds_remaining = config.phase_duration(0);
        Self {
            config: Some(config),
            seconds_remaining,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.paused_remaining.is_some()
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn total_secs(&self) -> u32 {
        self.config.as_ref().map(|c| c.total_secs()).unwrap_or(0)
    }

    /// `MM:SS` of the remaining time in the current phase.
    pub fn formatted(&self) -> String {
        display::format_clock(self.seconds_remaining)
    }

    /// 0.0 .. 1.0 progress across the whole session.
    pub fn progress(&self) -> f64 {
        if self.phase == Phase::Completed {
            return 1.0;
        }
        display::progress_fraction(self.elapsed_secs, self.total_secs())
    }

    /// Content segment for multi-segment exercises (body scan).
    pub fn segment_index(&self) -> Option<usize> {
        let config = self.config.as_ref()?;
        let segments = config.segments?;
        Some(display::segment_index(
            self.elapsed_secs,
            config.total_secs(),
            segments,
        ))
    }

    /// Index that advances every `period_secs` of elapsed time (quotes).
    pub fn rotating_index(&self, period_secs: u32, modulus: usize) -> usize {
        display::rotating_index(self.elapsed_secs, period_secs, modulus)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> TimerEvent {
        TimerEvent::StateSnapshot {
            phase: self.phase,
            is_running: self.is_running,
            seconds_remaining: self.seconds_remaining,
            cycles_completed: self.cycles_completed,
            elapsed_secs: self.elapsed_secs,
            progress: self.progress(),
            formatted: self.formatted(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session. Returns `Ok(None)` when one is already running or paused.
    ///
    /// # Errors
    /// Returns a validation error, without touching state, if `config` has no
    /// phases, a zero-length phase, zero cycles or zero segments.
    pub fn start(&mut self, config: SessionConfig) -> Result<Option<TimerEvent>, ValidationError> {
        config.validate()?;
        if self.is_running || self.is_paused() {
            return Ok(None);
        }

        self.phase_index = 0;
        self.cycles_completed = 0;
        self.elapsed_secs = 0;
        self.paused_remaining = None;
        if config.prepare_secs > 0 {
            self.phase = Phase::Preparing;
            self.seconds_remaining = config.prepare_secs;
        } else {
            self.phase = Phase::for_index(0);
            self.seconds_remaining = config.phase_duration(0);
        }
        let total_secs = config.total_secs();
        self.config = Some(config);
        self.is_running = true;

        tracing::debug!(phase = ?self.phase, total_secs, "timer started");
        Ok(Some(TimerEvent::TimerStarted {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            total_secs,
            at: Utc::now(),
        }))
    }

    /// Call once per clock signal. Returns an event on phase change or completion.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.is_running {
            return None;
        }
        if self.phase != Phase::Preparing {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return None;
        }

        if self.phase == Phase::Preparing {
            self.enter_phase(0);
            return Some(self.phase_changed(Phase::Preparing));
        }
        self.advance()
    }

    /// Cancel and return to `Idle`. Safe to call in any state.
    pub fn stop(&mut self) -> Option<TimerEvent> {
        let was_active = self.is_running || self.is_paused() || self.phase != Phase::Idle;
        self.phase = Phase::Idle;
        self.phase_index = 0;
        self.cycles_completed = 0;
        self.elapsed_secs = 0;
        self.is_running = false;
        self.paused_remaining = None;
        self.seconds_remaining = self
            .config
            .as_ref()
            .map(|c| c.phase_duration(0))
            .unwrap_or(0);

        if !was_active {
            return None;
        }
        tracing::debug!("timer stopped");
        Some(TimerEvent::TimerStopped { at: Utc::now() })
    }

    /// Suspend ticking, capturing the remaining time. Pausable sessions only.
    pub fn pause(&mut self) -> Option<TimerEvent> {
        let pausable = self.config.as_ref().is_some_and(|c| c.pausable);
        if !self.is_running || !pausable {
            return None;
        }
        self.paused_remaining = Some(self.seconds_remaining);
        self.is_running = false;
        tracing::debug!(seconds_remaining = self.seconds_remaining, "timer paused");
        Some(TimerEvent::TimerPaused {
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Restore the captured remaining time and continue ticking.
    pub fn resume(&mut self) -> Option<TimerEvent> {
        let remaining = self.paused_remaining.take()?;
        self.seconds_remaining = remaining;
        self.is_running = true;
        tracing::debug!(seconds_remaining = remaining, "timer resumed");
        Some(TimerEvent::TimerResumed {
            seconds_remaining: remaining,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_phase(&mut self, index: usize) {
        self.phase_index = index;
        self.phase = Phase::for_index(index);
        self.seconds_remaining = self
            .config
            .as_ref()
            .map(|c| c.phase_duration(index))
            .unwrap_or(0);
    }

    fn advance(&mut self) -> Option<TimerEvent> {
        let (phase_count, cycles) = self
            .config
            .as_ref()
            .map(|c| (c.phase_count(), c.cycles))?;
        let from = self.phase;

        if self.phase_index + 1 < phase_count {
            self.enter_phase(self.phase_index + 1);
            return Some(self.phase_changed(from));
        }

        self.cycles_completed = self.cycles_completed.saturating_add(1);
        if self.cycles_completed >= cycles {
            self.complete();
            return Some(TimerEvent::TimerCompleted {
                cycles_completed: self.cycles_completed,
                elapsed_secs: self.elapsed_secs,
                at: Utc::now(),
            });
        }
        self.enter_phase(0);
        Some(self.phase_changed(from))
    }

    fn complete(&mut self) {
        self.phase = Phase::Completed;
        self.seconds_remaining = 0;
        self.is_running = false;
        self.paused_remaining = None;
        tracing::debug!(
            cycles = self.cycles_completed,
            elapsed_secs = self.elapsed_secs,
            "timer completed"
        );
    }

    fn phase_changed(&self, from: Phase) -> TimerEvent {
        tracing::debug!(?from, to = ?self.phase, "phase changed");
        TimerEvent::PhaseChanged {
            from,
            to: self.phase,
            phase_index: self.phase_index,
            cycles_completed: self.cycles_completed,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        }
    }
}
