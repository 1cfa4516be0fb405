use bevy::prelude::*;

use super::hud::{phase_color, phase_label, plate_prompt, urgency_color};
use super::outcome::{OutcomeBanner, banner_color, clear_banner_on_restart, show_outcome_banner};
use crate::core::{
    FailureCause, MinigameKind, RoundOutcome, RoundOutcomeEvent, RoundRestartedEvent,
};
use crate::red_light::{ClockUrgency, LightPhase};

#[test]
fn test_plate_prompt_while_armed() {
    assert_eq!(plate_prompt(Some(0), 0, 9), "Plate 1/9: Press 1 or 2 to choose");
    assert_eq!(plate_prompt(Some(8), 8, 9), "Plate 9/9: Press 1 or 2 to choose");
}

#[test]
fn test_plate_prompt_progress_and_cleared() {
    assert_eq!(plate_prompt(None, 3, 9), "Plate 4/9");
    assert_eq!(plate_prompt(None, 9, 9), "Bridge crossed! Reach the finish");
}

#[test]
fn test_phase_labels_differ_in_colour() {
    assert_eq!(phase_label(LightPhase::Green), "GREEN LIGHT");
    assert_eq!(phase_label(LightPhase::Red), "RED LIGHT");
    assert_ne!(phase_color(LightPhase::Green), phase_color(LightPhase::Red));
    assert_ne!(urgency_color(ClockUrgency::Normal), urgency_color(ClockUrgency::Danger));
}

#[test]
fn test_banner_colour_by_outcome() {
    assert_ne!(
        banner_color(RoundOutcome::Success),
        banner_color(RoundOutcome::Failure(FailureCause::TimeUp))
    );
    assert_eq!(
        banner_color(RoundOutcome::Failure(FailureCause::BulletHit)),
        banner_color(RoundOutcome::Failure(FailureCause::MovementDetected))
    );
}

fn banner_count(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<OutcomeBanner>>()
        .iter(app.world())
        .count()
}

#[test]
fn test_restart_and_new_outcome_in_one_frame_leave_one_banner() {
    let mut app = App::new();
    app.add_message::<RoundOutcomeEvent>()
        .add_message::<RoundRestartedEvent>()
        .add_systems(Update, (clear_banner_on_restart, show_outcome_banner).chain());

    app.world_mut().write_message(RoundOutcomeEvent {
        game: MinigameKind::BulletHazard,
        outcome: RoundOutcome::Failure(FailureCause::BulletHit),
    });
    app.update();
    assert_eq!(banner_count(&mut app), 1);

    // The round restarts and is lost again before the next frame runs
    app.world_mut().write_message(RoundRestartedEvent {
        game: MinigameKind::BulletHazard,
    });
    app.world_mut().write_message(RoundOutcomeEvent {
        game: MinigameKind::BulletHazard,
        outcome: RoundOutcome::Failure(FailureCause::DeadlyGround),
    });
    app.update();
    assert_eq!(banner_count(&mut app), 1);

    app.world_mut().write_message(RoundRestartedEvent {
        game: MinigameKind::BulletHazard,
    });
    app.update();
    assert_eq!(banner_count(&mut app), 0);
}
