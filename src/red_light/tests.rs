use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::core::{
    FailureCause, FinishLine, MinigameKind, MovementGate, OutcomeRouting, RoundOutcome, RoundState,
    draw_duration,
};

const TICK: Duration = Duration::from_millis(100);

/// Fixed 1s green and 3s red so phase boundaries land on whole ticks.
fn fixed_settings() -> RedLightSettings {
    RedLightSettings {
        min_green_secs: 1.0,
        max_green_secs: 1.0,
        min_red_secs: 3.0,
        max_red_secs: 3.0,
        detection_delay_secs: 0.5,
        velocity_threshold: 0.1,
        clock: None,
    }
}

fn still() -> RedLightSample {
    RedLightSample {
        horizontal_velocity: Some(0.0),
        player_position: Some(Vec2::ZERO),
    }
}

fn moving(velocity: f32) -> RedLightSample {
    RedLightSample {
        horizontal_velocity: Some(velocity),
        player_position: Some(Vec2::ZERO),
    }
}

fn started(settings: RedLightSettings, finish: Option<FinishLine>) -> (RedLightController, MovementGate, ChaCha8Rng) {
    let mut gate = MovementGate::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut controller = RedLightController::new(settings, OutcomeRouting::default(), finish);
    let change = controller.start(&mut gate, &mut rng);
    assert_eq!(change.phase, LightPhase::Green);
    (controller, gate, rng)
}

/// Tick through the green phase until the light turns red.
fn advance_to_red(controller: &mut RedLightController, gate: &mut MovementGate, rng: &mut ChaCha8Rng) {
    for _ in 0..10 {
        controller.tick(TICK, still(), gate, rng);
    }
    assert_eq!(controller.phase(), LightPhase::Red);
}

#[test]
fn test_start_grants_gate_and_opens_green() {
    let (controller, gate, _) = started(fixed_settings(), None);
    assert_eq!(gate.holder(), Some(MinigameKind::RedLight));
    assert!(gate.can_move());
    assert_eq!(controller.phase(), LightPhase::Green);
    assert_eq!(controller.round_state(), RoundState::Active);
}

#[test]
fn test_green_never_detects_movement() {
    let (mut controller, mut gate, mut rng) = started(fixed_settings(), None);
    for _ in 0..9 {
        let step = controller.tick(TICK, moving(500.0), &mut gate, &mut rng);
        assert!(step.outcome.is_none());
    }
    assert_eq!(controller.round_state(), RoundState::Active);
}

#[test]
fn test_scenario_a_failure_exactly_after_grace_delay() {
    let (mut controller, mut gate, mut rng) = started(fixed_settings(), None);
    advance_to_red(&mut controller, &mut gate, &mut rng);

    // t = 0.1 .. 0.5 into red: still, no failure, armed at 0.5
    for tick in 1..=5 {
        let step = controller.tick(TICK, still(), &mut gate, &mut rng);
        assert!(step.outcome.is_none());
        assert_eq!(step.detection_armed, tick == 5);
    }
    assert!(controller.is_detection_armed());

    // t = 0.6: velocity jumps to 5
    let step = controller.tick(TICK, moving(5.0), &mut gate, &mut rng);
    assert_eq!(
        step.outcome,
        Some(RoundOutcome::Failure(FailureCause::MovementDetected))
    );
    assert_eq!(controller.round_state(), RoundState::Failure);
    assert!(!gate.can_move());
}

#[test]
fn test_no_failure_inside_grace_window() {
    let (mut controller, mut gate, mut rng) = started(fixed_settings(), None);
    advance_to_red(&mut controller, &mut gate, &mut rng);

    // Residual momentum right after the change is forgiven
    for _ in 0..4 {
        let step = controller.tick(TICK, moving(300.0), &mut gate, &mut rng);
        assert!(step.outcome.is_none());
        assert!(!controller.is_detection_armed());
    }
    assert_eq!(controller.round_state(), RoundState::Active);
}

#[test]
fn test_speed_at_threshold_is_tolerated() {
    let mut settings = fixed_settings();
    settings.velocity_threshold = 10.0;
    let (mut controller, mut gate, mut rng) = started(settings, None);
    advance_to_red(&mut controller, &mut gate, &mut rng);

    for _ in 0..10 {
        let step = controller.tick(TICK, moving(-10.0), &mut gate, &mut rng);
        assert!(step.outcome.is_none());
    }

    let step = controller.tick(TICK, moving(-10.5), &mut gate, &mut rng);
    assert!(step.outcome.is_some());
}

#[test]
fn test_missing_player_skips_detection() {
    let (mut controller, mut gate, mut rng) = started(fixed_settings(), None);
    advance_to_red(&mut controller, &mut gate, &mut rng);

    for _ in 0..20 {
        let step = controller.tick(TICK, RedLightSample::default(), &mut gate, &mut rng);
        assert!(step.outcome.is_none());
    }
}

#[test]
fn test_phase_cycles_and_green_reopens_gate() {
    let (mut controller, mut gate, mut rng) = started(fixed_settings(), None);
    advance_to_red(&mut controller, &mut gate, &mut rng);

    // Red lasts 3s; stay still the whole time
    let mut change = None;
    for _ in 0..30 {
        let step = controller.tick(TICK, still(), &mut gate, &mut rng);
        if step.phase_change.is_some() {
            change = step.phase_change;
        }
    }
    let change = change.expect("light should turn green again");
    assert_eq!(change.phase, LightPhase::Green);
    assert_eq!(change.duration, 1.0);
    assert!(!controller.is_detection_armed());
    assert!(gate.can_move());
}

#[test]
fn test_random_durations_stay_in_range() {
    let settings = RedLightSettings {
        clock: None,
        ..RedLightSettings::default()
    };
    let mut gate = MovementGate::default();
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut controller = RedLightController::new(settings.clone(), OutcomeRouting::default(), None);
    controller.start(&mut gate, &mut rng);

    let mut seen = 0;
    for _ in 0..2000 {
        let step = controller.tick(Duration::from_millis(50), RedLightSample::default(), &mut gate, &mut rng);
        if let Some(change) = step.phase_change {
            seen += 1;
            let (min, max) = match change.phase {
                LightPhase::Green => (settings.min_green_secs, settings.max_green_secs),
                LightPhase::Red => (settings.min_red_secs, settings.max_red_secs),
            };
            assert!(change.duration >= min && change.duration <= max);
        }
    }
    assert!(seen > 10);
}

#[test]
fn test_scenario_d_finish_reports_single_success() {
    let finish = FinishLine {
        position: Vec2::new(1000.0, 0.0),
        trigger_distance: 100.0,
    };
    let (mut controller, mut gate, mut rng) = started(fixed_settings(), Some(finish));

    let far = RedLightSample {
        horizontal_velocity: Some(0.0),
        player_position: Some(Vec2::new(800.0, 0.0)),
    };
    assert!(controller.tick(TICK, far, &mut gate, &mut rng).outcome.is_none());

    let near = RedLightSample {
        horizontal_velocity: Some(0.0),
        player_position: Some(Vec2::new(950.0, 0.0)),
    };
    let mut successes = 0;
    let mut failures = 0;
    for _ in 0..50 {
        match controller.tick(TICK, near, &mut gate, &mut rng).outcome {
            Some(RoundOutcome::Success) => successes += 1,
            Some(RoundOutcome::Failure(_)) => failures += 1,
            None => {}
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(failures, 0);
    assert!(!gate.can_move());
}

#[test]
fn test_terminal_round_yields_one_transition_after_delay() {
    let (mut controller, mut gate, mut rng) = started(fixed_settings(), None);
    advance_to_red(&mut controller, &mut gate, &mut rng);
    for _ in 0..5 {
        controller.tick(TICK, still(), &mut gate, &mut rng);
    }
    controller.tick(TICK, moving(5.0), &mut gate, &mut rng);

    let mut transitions = Vec::new();
    for _ in 0..40 {
        let step = controller.tick(TICK, moving(5.0), &mut gate, &mut rng);
        assert!(step.outcome.is_none());
        if let Some(transition) = step.transition {
            transitions.push(transition);
        }
    }
    assert_eq!(transitions.len(), 1);
    assert!(transitions[0].reloads_current());
}

#[test]
fn test_time_limit_fails_round() {
    let mut settings = fixed_settings();
    settings.clock = Some(ClockSettings {
        limit_secs: 2.0,
        countdown: true,
        warning_secs: 1.0,
    });
    let (mut controller, mut gate, mut rng) = started(settings, None);

    let mut outcome = None;
    for _ in 0..25 {
        if let Some(o) = controller.tick(TICK, RedLightSample::default(), &mut gate, &mut rng).outcome {
            outcome = Some(o);
        }
    }
    assert_eq!(outcome, Some(RoundOutcome::Failure(FailureCause::TimeUp)));
    assert!(!FailureCause::TimeUp.kills_player());
}

#[test]
fn test_restart_returns_to_active_green() {
    let (mut controller, mut gate, mut rng) = started(fixed_settings(), None);
    advance_to_red(&mut controller, &mut gate, &mut rng);
    for _ in 0..6 {
        controller.tick(TICK, moving(5.0), &mut gate, &mut rng);
    }
    assert_eq!(controller.round_state(), RoundState::Failure);

    let change = controller.restart(&mut gate, &mut rng);
    assert_eq!(change.phase, LightPhase::Green);
    assert_eq!(controller.round_state(), RoundState::Active);
    assert!(gate.can_move());
}

#[test]
fn test_stop_releases_gate() {
    let (mut controller, mut gate, mut rng) = started(fixed_settings(), None);
    advance_to_red(&mut controller, &mut gate, &mut rng);
    for _ in 0..6 {
        controller.tick(TICK, moving(5.0), &mut gate, &mut rng);
    }
    assert!(!gate.can_move());

    controller.stop(&mut gate);
    assert!(gate.can_move());
    assert_eq!(gate.holder(), None);
}

#[test]
fn test_clock_countdown_urgency_and_format() {
    let mut clock = RoundClock::new(ClockSettings {
        limit_secs: 65.0,
        countdown: true,
        warning_secs: 10.0,
    });
    assert_eq!(clock.formatted(), "01:05");
    assert_eq!(clock.urgency(), ClockUrgency::Normal);

    assert!(!clock.tick(Duration::from_secs(56)));
    assert_eq!(clock.urgency(), ClockUrgency::Warning);

    assert!(!clock.tick(Duration::from_secs(5)));
    assert_eq!(clock.urgency(), ClockUrgency::Danger);

    assert!(clock.tick(Duration::from_secs(10)));
    assert_eq!(clock.formatted(), "00:00");
    // Expiry is reported once
    assert!(!clock.tick(Duration::from_secs(1)));
}

#[test]
fn test_clock_count_up_never_expires() {
    let mut clock = RoundClock::new(ClockSettings {
        limit_secs: 5.0,
        countdown: false,
        warning_secs: 1.0,
    });
    assert!(!clock.tick(Duration::from_secs(600)));
    assert_eq!(clock.urgency(), ClockUrgency::Normal);
    assert_eq!(format_clock(clock.display_secs()), "10:00");
}

#[test]
fn test_draw_duration_degenerate_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(draw_duration(&mut rng, 2.0, 2.0), 2.0);
    assert_eq!(draw_duration(&mut rng, 3.0, 1.0), 3.0);
}
