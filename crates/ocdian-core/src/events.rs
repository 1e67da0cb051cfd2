use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every timer state change produces an Event.
/// Presentation polls snapshots; feedback collaborators subscribe to events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimerEvent {
    TimerStarted {
        phase: Phase,
        seconds_remaining: u32,
        total_secs: u32,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        phase_index: usize,
        cycles_completed: u32,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        cycles_completed: u32,
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerStopped {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        is_running: bool,
        seconds_remaining: u32,
        cycles_completed: u32,
        elapsed_secs: u32,
        progress: f64,
        formatted: String,
        at: DateTime<Utc>,
    },
}

impl TimerEvent {
    /// True for the events that feedback collaborators react to
    /// (sound on phase change, haptic on completion).
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            TimerEvent::PhaseChanged { .. } | TimerEvent::TimerCompleted { .. }
        )
    }
}

/// Change notification emitted by the journal store after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreChange {
    EntriesChanged,
    MoodsChanged,
    Loaded,
}

/// Error type listeners may return. It is logged and otherwise ignored.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

type Listener<E> = Box<dyn FnMut(&E) -> Result<(), ListenerError>>;

/// Fire-and-forget listener registry.
///
/// A failing listener (missing sound asset, unavailable haptics engine)
/// never affects the state machine that published the event.
pub struct Observers<E> {
    listeners: Vec<Listener<E>>,
}

impl<E: std::fmt::Debug> Observers<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&E) -> Result<(), ListenerError> + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&mut self, event: &E) {
        for listener in &mut self.listeners {
            if let Err(e) = listener(event) {
                tracing::warn!(?event, error = %e, "listener failed");
            }
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E: std::fmt::Debug> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn failing_listener_does_not_stop_others() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();
        observers.subscribe(|_: &StoreChange| Err("sound asset missing".into()));
        let sink = Rc::clone(&seen);
        observers.subscribe(move |change: &StoreChange| {
            sink.borrow_mut().push(*change);
            Ok(())
        });

        observers.publish(&StoreChange::MoodsChanged);
        assert_eq!(*seen.borrow(), vec![StoreChange::MoodsChanged]);
    }

    #[test]
    fn clear_drops_listeners() {
        let mut observers: Observers<StoreChange> = Observers::new();
        observers.subscribe(|_| Ok(()));
        assert_eq!(observers.len(), 1);
        observers.clear();
        assert!(observers.is_empty());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = TimerEvent::TimerStopped { at: Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerStopped");
    }
}
