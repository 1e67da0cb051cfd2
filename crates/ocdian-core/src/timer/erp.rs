//! Exposure and Response Prevention sessions.
//!
//! An ERP session is a single pausable countdown with before/after anxiety
//! ratings. A panic-button breathing exercise can interrupt it: the exposure
//! timer is paused while the rescue runs and resumes from the captured
//! remaining time once the rescue is dismissed or completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::engine::TimerEngine;
use super::session::SessionConfig;
use crate::error::ValidationError;
use crate::events::TimerEvent;
use crate::scales::AnxietyLevel;

/// Record of one exposure exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpSession {
    pub id: Uuid,
    pub challenge: String,
    pub duration_secs: u32,
    pub anxiety_before: AnxietyLevel,
    #[serde(default)]
    pub anxiety_after: Option<AnxietyLevel>,
    #[serde(default)]
    pub completed: bool,
    pub started_at: DateTime<Utc>,
}

impl ErpSession {
    pub fn new(challenge: &str, duration_secs: u32, anxiety_before: AnxietyLevel) -> Self {
        Self {
            id: Uuid::new_v4(),
            challenge: challenge.trim().to_string(),
            duration_secs,
            anxiety_before,
            anxiety_after: None,
            completed: false,
            started_at: Utc::now(),
        }
    }

    /// Positive when anxiety dropped over the exposure.
    pub fn anxiety_reduction(&self) -> Option<i16> {
        let after = self.anxiety_after?;
        Some(i16::from(self.anxiety_before.get()) - i16::from(after.get()))
    }
}

/// Which timer currently receives ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Foreground {
    Exposure,
    Rescue,
}

/// A timer event tagged with the timer that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpEvent {
    pub source: Foreground,
    #[serde(flatten)]
    pub event: TimerEvent,
}

impl ErpEvent {
    fn exposure(event: TimerEvent) -> Self {
        Self {
            source: Foreground::Exposure,
            event,
        }
    }

    fn rescue(event: TimerEvent) -> Self {
        Self {
            source: Foreground::Rescue,
            event,
        }
    }

    /// True only when the exposure countdown itself finished.
    pub fn is_exposure_completed(&self) -> bool {
        self.source == Foreground::Exposure
            && matches!(self.event, TimerEvent::TimerCompleted { .. })
    }
}

/// Drives an ERP countdown and its optional breathing interruption.
///
/// Every command returns all events it caused, in order, so a consumer sees
/// the exposure pause before the rescue starts and resume after it ends.
#[derive(Debug, Clone)]
pub struct ErpRunner {
    session: ErpSession,
    exposure: TimerEngine,
    rescue: Option<TimerEngine>,
    rescue_config: SessionConfig,
}

impl ErpRunner {
    pub fn new(session: ErpSession, rescue_config: SessionConfig) -> Self {
        let exposure = TimerEngine::idle(Self::exposure_config(&session));
        Self {
            session,
            exposure,
            rescue: None,
            rescue_config,
        }
    }

    fn exposure_config(session: &ErpSession) -> SessionConfig {
        SessionConfig::single(session.duration_secs).pausable()
    }

    pub fn session(&self) -> &ErpSession {
        &self.session
    }

    pub fn exposure(&self) -> &TimerEngine {
        &self.exposure
    }

    pub fn rescue(&self) -> Option<&TimerEngine> {
        self.rescue.as_ref()
    }

    pub fn foreground(&self) -> Foreground {
        if self.rescue.is_some() {
            Foreground::Rescue
        } else {
            Foreground::Exposure
        }
    }

    /// Begin the exposure countdown.
    ///
    /// # Errors
    /// Fails when the session's duration is zero.
    pub fn start(&mut self) -> Result<Vec<ErpEvent>, ValidationError> {
        let event = self.exposure.start(Self::exposure_config(&self.session))?;
        Ok(event.into_iter().map(ErpEvent::exposure).collect())
    }

    /// Deliver one clock signal to the foreground timer.
    ///
    /// A completed rescue is dismissed automatically and the exposure timer
    /// resumes in the same call.
    pub fn tick(&mut self) -> Vec<ErpEvent> {
        let mut events = Vec::new();
        if let Some(rescue) = self.rescue.as_mut() {
            let event = rescue.tick();
            let rescue_done = matches!(event, Some(TimerEvent::TimerCompleted { .. }));
            events.extend(event.map(ErpEvent::rescue));
            if rescue_done {
                self.rescue = None;
                events.extend(self.exposure.resume().map(ErpEvent::exposure));
            }
            return events;
        }

        let event = self.exposure.tick();
        if matches!(event, Some(TimerEvent::TimerCompleted { .. })) {
            self.session.completed = true;
        }
        events.extend(event.map(ErpEvent::exposure));
        events
    }

    /// Panic button: pause exposure and start the breathing rescue.
    ///
    /// # Errors
    /// Fails when the rescue config is invalid; exposure is left untouched.
    pub fn start_rescue(&mut self) -> Result<Vec<ErpEvent>, ValidationError> {
        if self.rescue.is_some() {
            return Ok(Vec::new());
        }
        self.rescue_config.validate()?;
        let mut rescue = TimerEngine::new();
        let started = rescue.start(self.rescue_config.clone())?;

        let mut events: Vec<ErpEvent> = self
            .exposure
            .pause()
            .map(ErpEvent::exposure)
            .into_iter()
            .collect();
        events.extend(started.map(ErpEvent::rescue));
        self.rescue = Some(rescue);
        Ok(events)
    }

    /// Close the rescue exercise and resume exposure where it left off.
    pub fn dismiss_rescue(&mut self) -> Vec<ErpEvent> {
        let Some(mut rescue) = self.rescue.take() else {
            return Vec::new();
        };
        let mut events: Vec<ErpEvent> = rescue
            .stop()
            .map(ErpEvent::rescue)
            .into_iter()
            .collect();
        events.extend(self.exposure.resume().map(ErpEvent::exposure));
        events
    }

    /// Stop everything. Safe in any state.
    pub fn stop(&mut self) -> Vec<ErpEvent> {
        let mut events = Vec::new();
        if let Some(mut rescue) = self.rescue.take() {
            events.extend(rescue.stop().map(ErpEvent::rescue));
        }
        events.extend(self.exposure.stop().map(ErpEvent::exposure));
        events
    }

    /// Record the post-exposure rating and hand back the finished session.
    pub fn finish(mut self, anxiety_after: AnxietyLevel) -> ErpSession {
        self.stop();
        self.session.anxiety_after = Some(anxiety_after);
        self.session
    }
}
