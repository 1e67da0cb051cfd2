//! Runs a guided exercise in the foreground.
//!
//! A current-thread tokio runtime provides the 1 s clock. The interval is
//! dropped as soon as the exercise completes or Ctrl-C stops it.

use std::io::Write;
use std::time::Duration;

use clap::{Args, Subcommand};
use ocdian_core::events::ListenerError;
use ocdian_core::timer::Foreground;
use ocdian_core::{
    AnxietyLevel, Config, ErpEvent, ErpRunner, ErpSession, Exercise, Observers, Phase,
    TimerEngine, TimerEvent, ValidationError,
};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

#[derive(Args)]
pub struct ExerciseArgs {
    #[command(subcommand)]
    kind: ExerciseKind,

    /// Print timer events as JSON lines instead of cues
    #[arg(long, global = true)]
    json: bool,

    /// Clock period in milliseconds
    #[arg(long, global = true, default_value_t = 1000, hide = true)]
    tick_ms: u64,
}

#[derive(Subcommand)]
pub enum ExerciseKind {
    /// Paced breathing: in, out, repeat
    Breathing,
    /// Attention moves through eight body regions
    BodyScan,
    /// Rotating mindfulness prompts
    Mindfulness,
    /// Exposure and response prevention countdown
    Erp {
        /// The situation you are facing
        challenge: String,
        /// Exposure length in seconds (one of `erp.duration_options`)
        #[arg(long)]
        duration: Option<u32>,
        /// Anxiety before the exposure, 1-10
        #[arg(long, default_value_t = 5)]
        anxiety: u8,
        /// Anxiety after the exposure, 1-10
        #[arg(long)]
        anxiety_after: Option<u8>,
        /// Take a breathing break after this many seconds of exposure
        #[arg(long)]
        rescue_after: Option<u32>,
    },
}

/// Events the reporter can print and feed to sound/haptic listeners.
trait Feedback: Serialize + std::fmt::Debug + 'static {
    fn is_phase_change(&self) -> bool;
    fn is_completion(&self) -> bool;
}

impl Feedback for TimerEvent {
    fn is_phase_change(&self) -> bool {
        matches!(self, TimerEvent::PhaseChanged { .. })
    }

    fn is_completion(&self) -> bool {
        matches!(self, TimerEvent::TimerCompleted { .. })
    }
}

impl Feedback for ErpEvent {
    fn is_phase_change(&self) -> bool {
        self.event.is_phase_change()
    }

    // The breathing break finishing is not the end of the exercise.
    fn is_completion(&self) -> bool {
        self.is_exposure_completed()
    }
}

/// Something the clock can drive to completion.
trait Drive {
    type Event: Feedback;

    fn tick(&mut self) -> Vec<Self::Event>;
    fn stop(&mut self) -> Vec<Self::Event>;
    fn cue(&self) -> String;
    fn finished(&self) -> bool;
}

struct Guided<'a> {
    exercise: Exercise,
    engine: TimerEngine,
    config: &'a Config,
}

impl Drive for Guided<'_> {
    type Event = TimerEvent;

    fn tick(&mut self) -> Vec<TimerEvent> {
        self.engine.tick().into_iter().collect()
    }

    fn stop(&mut self) -> Vec<TimerEvent> {
        self.engine.stop().into_iter().collect()
    }

    fn cue(&self) -> String {
        self.exercise.cue(&self.engine, self.config)
    }

    fn finished(&self) -> bool {
        self.engine.phase() == Phase::Completed
    }
}

struct Exposure<'a> {
    runner: ErpRunner,
    config: &'a Config,
    rescue_after: Option<u32>,
}

impl Drive for Exposure<'_> {
    type Event = ErpEvent;

    fn tick(&mut self) -> Vec<ErpEvent> {
        let mut events = self.runner.tick();
        let due = self
            .rescue_after
            .is_some_and(|secs| self.runner.exposure().elapsed_secs() >= secs);
        if due && self.runner.foreground() == Foreground::Exposure && !self.finished() {
            self.rescue_after = None;
            match self.runner.start_rescue() {
                Ok(started) => events.extend(started),
                Err(e) => tracing::warn!(error = %e, "breathing break unavailable"),
            }
        }
        events
    }

    fn stop(&mut self) -> Vec<ErpEvent> {
        self.runner.stop()
    }

    fn cue(&self) -> String {
        match self.runner.rescue() {
            Some(rescue) => format!(
                "Breathing break: {}",
                Exercise::Breathing.cue(rescue, self.config)
            ),
            None => Exercise::Erp {
                duration_secs: self.runner.session().duration_secs,
            }
            .cue(self.runner.exposure(), self.config),
        }
    }

    fn finished(&self) -> bool {
        self.runner.exposure().phase() == Phase::Completed
    }
}

enum Outcome {
    Completed,
    Stopped,
}

/// Prints cues or events and forwards events to feedback listeners.
struct Reporter<E> {
    json: bool,
    last_cue: String,
    observers: Observers<E>,
}

impl<E: Feedback> Reporter<E> {
    fn new(json: bool, config: &Config) -> Self {
        let mut observers = Observers::new();
        if config.feedback.sound {
            observers.subscribe(|event: &E| -> Result<(), ListenerError> {
                if event.is_phase_change() {
                    let mut err = std::io::stderr();
                    err.write_all(b"\x07")?;
                    err.flush()?;
                }
                Ok(())
            });
        }
        if config.feedback.haptics {
            observers.subscribe(|event: &E| -> Result<(), ListenerError> {
                if event.is_completion() {
                    tracing::debug!("haptic pulse");
                }
                Ok(())
            });
        }
        Self {
            json,
            last_cue: String::new(),
            observers,
        }
    }

    fn events(&mut self, events: &[E]) -> Result<(), Box<dyn std::error::Error>> {
        for event in events {
            if self.json {
                println!("{}", serde_json::to_string(event)?);
            }
            self.observers.publish(event);
        }
        Ok(())
    }

    fn cue(&mut self, cue: String) {
        if !self.json && cue != self.last_cue {
            println!("{cue}");
            self.last_cue = cue;
        }
    }
}

async fn drive<D: Drive>(
    session: &mut D,
    period: Duration,
    reporter: &mut Reporter<D::Event>,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    reporter.cue(session.cue());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                reporter.events(&session.tick())?;
                reporter.cue(session.cue());
                if session.finished() {
                    return Ok(Outcome::Completed);
                }
            }
            signal = &mut ctrl_c => {
                signal?;
                reporter.events(&session.stop())?;
                return Ok(Outcome::Stopped);
            }
        }
    }
}

pub fn run(args: ExerciseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let period = Duration::from_millis(args.tick_ms.max(1));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let exercise = match args.kind {
        ExerciseKind::Breathing => Exercise::Breathing,
        ExerciseKind::BodyScan => Exercise::BodyScan,
        ExerciseKind::Mindfulness => Exercise::Mindfulness,
        ExerciseKind::Erp {
            challenge,
            duration,
            anxiety,
            anxiety_after,
            rescue_after,
        } => {
            let duration_secs = duration.unwrap_or(config.erp.default_secs);
            if challenge.trim().is_empty() {
                return Err(ValidationError::EmptyText { field: "challenge" }.into());
            }
            Exercise::Erp { duration_secs }.session_config(&config)?;
            let before = AnxietyLevel::new(anxiety)?;
            let after = anxiety_after.map(AnxietyLevel::new).transpose()?;

            let mut reporter = Reporter::new(args.json, &config);
            let session = ErpSession::new(&challenge, duration_secs, before);
            let mut runner = ErpRunner::new(session, Exercise::Breathing.session_config(&config)?);
            reporter.events(&runner.start()?)?;
            let mut exposure = Exposure {
                runner,
                config: &config,
                rescue_after,
            };
            let outcome = runtime.block_on(drive(&mut exposure, period, &mut reporter))?;
            return report_erp(exposure.runner, outcome, after);
        }
    };

    let mut reporter = Reporter::new(args.json, &config);
    let mut engine = TimerEngine::new();
    let started = engine.start(exercise.session_config(&config)?)?;
    reporter.events(started.as_slice())?;
    let mut guided = Guided {
        exercise,
        engine,
        config: &config,
    };
    let outcome = runtime.block_on(drive(&mut guided, period, &mut reporter))?;
    if let Outcome::Stopped = outcome {
        eprintln!("{} stopped", exercise.label());
    }
    Ok(())
}

fn report_erp(
    runner: ErpRunner,
    outcome: Outcome,
    after: Option<AnxietyLevel>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Outcome::Stopped = outcome {
        eprintln!("Exposure stopped");
    }
    let session = match after {
        Some(after) => runner.finish(after),
        None => runner.session().clone(),
    };
    println!("{}", serde_json::to_string_pretty(&session)?);
    if let Some(reduction) = session.anxiety_reduction() {
        eprintln!(
            "Anxiety {} -> {} ({reduction:+})",
            session.anxiety_before.label(),
            session.anxiety_after.map(AnxietyLevel::label).unwrap_or_default()
        );
    }
    Ok(())
}
