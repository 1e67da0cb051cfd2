//! Integration tests for guided exercises driven through the timer engine.

use ocdian_core::exercise::body_part;
use ocdian_core::timer::Foreground;
use ocdian_core::{
    AnxietyLevel, Config, ErpRunner, ErpSession, Exercise, Phase, SessionConfig, TimerEngine,
    TimerEvent,
};
use proptest::prelude::*;

fn run(engine: &mut TimerEngine, ticks: u32) -> Vec<TimerEvent> {
    (0..ticks).filter_map(|_| engine.tick()).collect()
}

#[test]
fn test_body_scan_walks_through_parts() {
    let config = Config::default();
    let exercise = Exercise::BodyScan;
    let mut engine = TimerEngine::new();
    engine
        .start(exercise.session_config(&config).unwrap())
        .unwrap();
    assert_eq!(engine.segment_index(), Some(0));
    assert!(exercise.cue(&engine, &config).starts_with("Head"));

    run(&mut engine, 45);
    assert_eq!(engine.segment_index(), Some(4));
    assert_eq!(
        exercise.cue(&engine, &config),
        format!("{}: {}", body_part(4).name, body_part(4).prompt)
    );

    let events = run(&mut engine, 45);
    assert_eq!(engine.phase(), Phase::Completed);
    assert_eq!(engine.seconds_remaining(), 0);
    assert!(matches!(events.last(), Some(TimerEvent::TimerCompleted { .. })));
    assert_eq!(exercise.cue(&engine, &config), "Exercise complete");
}

#[test]
fn test_breathing_alternates_after_prepare() {
    let config = Config::default();
    let exercise = Exercise::Breathing;
    let mut engine = TimerEngine::new();
    engine
        .start(exercise.session_config(&config).unwrap())
        .unwrap();
    assert_eq!(exercise.cue(&engine, &config), "Get ready...");

    run(&mut engine, 1);
    assert_eq!(engine.phase(), Phase::Primary);
    assert_eq!(exercise.cue(&engine, &config), "Breathe in...");

    run(&mut engine, 4);
    assert_eq!(engine.phase(), Phase::Secondary);
    assert_eq!(exercise.cue(&engine, &config), "Breathe out...");

    // 7 cycles of 4s in + 4s out; 5s already spent.
    let events = run(&mut engine, 7 * 8 - 4);
    assert_eq!(engine.phase(), Phase::Completed);
    assert_eq!(engine.cycles_completed(), 7);
    let changes = events
        .iter()
        .filter(|e| matches!(e, TimerEvent::PhaseChanged { .. }))
        .count();
    assert_eq!(changes, 7 * 2 - 2);
}

#[test]
fn test_mindfulness_rotates_quotes() {
    let config = Config::default();
    let exercise = Exercise::Mindfulness;
    let mut engine = TimerEngine::new();
    engine
        .start(exercise.session_config(&config).unwrap())
        .unwrap();
    let first = exercise.cue(&engine, &config);
    run(&mut engine, 14);
    assert_eq!(exercise.cue(&engine, &config), first);
    run(&mut engine, 1);
    assert_ne!(exercise.cue(&engine, &config), first);
}

#[test]
fn test_erp_duration_must_be_an_option() {
    let config = Config::default();
    assert!(Exercise::Erp { duration_secs: 300 }
        .session_config(&config)
        .is_ok());
    assert!(Exercise::Erp { duration_secs: 42 }
        .session_config(&config)
        .is_err());
}

#[test]
fn test_erp_rescue_preserves_exposure_time() {
    let config = Config::default();
    let rescue = Exercise::Breathing.session_config(&config).unwrap();
    let session = ErpSession::new("Touch the doorknob", 60, AnxietyLevel::new(8).unwrap());
    let mut runner = ErpRunner::new(session, rescue);
    runner.start().unwrap();

    for _ in 0..20 {
        runner.tick();
    }
    assert_eq!(runner.exposure().seconds_remaining(), 40);

    runner.start_rescue().unwrap();
    assert_eq!(runner.foreground(), Foreground::Rescue);
    assert!(runner.exposure().is_paused());
    for _ in 0..10 {
        runner.tick();
    }
    assert_eq!(runner.exposure().seconds_remaining(), 40);

    runner.dismiss_rescue();
    assert_eq!(runner.foreground(), Foreground::Exposure);
    for _ in 0..40 {
        runner.tick();
    }
    assert_eq!(runner.exposure().phase(), Phase::Completed);
    assert!(runner.session().completed);

    let finished = runner.finish(AnxietyLevel::new(5).unwrap());
    assert_eq!(finished.anxiety_reduction(), Some(3));
}

proptest! {
    #[test]
    fn prop_single_phase_completes_after_duration(duration in 1u32..300) {
        let mut engine = TimerEngine::new();
        engine.start(SessionConfig::single(duration)).unwrap();
        run(&mut engine, duration);
        prop_assert_eq!(engine.phase(), Phase::Completed);
        prop_assert_eq!(engine.seconds_remaining(), 0);

        prop_assert!(engine.tick().is_none());
        prop_assert_eq!(engine.phase(), Phase::Completed);
        prop_assert_eq!(engine.seconds_remaining(), 0);
    }

    #[test]
    fn prop_pause_resume_keeps_remaining(duration in 2u32..600, elapsed in 0u32..600) {
        let elapsed = elapsed % duration;
        let mut engine = TimerEngine::new();
        engine.start(SessionConfig::single(duration).pausable()).unwrap();
        run(&mut engine, elapsed);
        let remaining = engine.seconds_remaining();
        let phase = engine.phase();

        engine.pause();
        prop_assert!(!engine.is_running());
        run(&mut engine, 5);
        engine.resume();

        prop_assert!(engine.is_running());
        prop_assert_eq!(engine.seconds_remaining(), remaining);
        prop_assert_eq!(engine.phase(), phase);
    }
}
