//! Core domain: session setup, scene flow and outcome bookkeeping.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::content::GameConfig;
use crate::core::audio::{AudioCue, AudioCueEvent};
use crate::core::events::{RoundOutcomeEvent, RoundRestartedEvent, SceneTransitionRequest};
use crate::core::outcome::{FailureCause, RoundOutcome};
use crate::core::resources::{ActiveScene, PlayerCondition, SessionRng};
use crate::core::state::GameState;
use crate::movement::Player;

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, Transform::from_xyz(0.0, 150.0, 0.0)));
}

pub(crate) fn seed_session_rng(mut commands: Commands, config: Res<GameConfig>) {
    let rng = SessionRng::from_config(config.seed);
    info!(
        "Session: seed {} ({})",
        rng.seed,
        if config.seed.is_some() { "configured" } else { "random" }
    );
    commands.insert_resource(rng);
}

/// Pick the first scene and start loading it.
pub(crate) fn enter_start_scene(
    config: Res<GameConfig>,
    mut active: ResMut<ActiveScene>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    active.name = config.start_scene.clone();
    info!("Session: starting at scene '{}'", active.name);
    game_state.set(GameState::Loading);
}

pub(crate) fn finish_loading(mut game_state: ResMut<NextState<GameState>>) {
    game_state.set(GameState::Playing);
}

pub(crate) fn revive_player(mut condition: ResMut<PlayerCondition>) {
    condition.revive();
}

pub(crate) fn revive_on_restart(
    mut restarts: MessageReader<RoundRestartedEvent>,
    mut condition: ResMut<PlayerCondition>,
) {
    for event in restarts.read() {
        info!("Round: {:?} restarted in place", event.game);
        condition.revive();
    }
}

/// Resolve a requested destination against the configured scenes. Empty or
/// unknown names reload the current scene.
pub fn resolve_destination(config: &GameConfig, current: &str, requested: &str) -> String {
    if requested.is_empty() {
        return current.to_string();
    }
    if config.scene(requested).is_none() {
        warn!(
            "Session: unknown scene '{}', reloading '{}'",
            requested, current
        );
        return current.to_string();
    }
    requested.to_string()
}

pub(crate) fn handle_scene_transitions(
    mut requests: MessageReader<SceneTransitionRequest>,
    config: Res<GameConfig>,
    mut active: ResMut<ActiveScene>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    // Only the last request in a frame wins.
    let Some(request) = requests.read().last() else {
        return;
    };

    let destination = resolve_destination(&config, &active.name, &request.destination);
    info!("Session: transition '{}' -> '{}'", active.name, destination);
    active.name = destination;
    game_state.set(GameState::Loading);
}

fn outcome_cue(outcome: RoundOutcome) -> AudioCue {
    match outcome {
        RoundOutcome::Success => AudioCue::Success,
        RoundOutcome::Failure(FailureCause::BulletHit) => AudioCue::Hit,
        RoundOutcome::Failure(_) => AudioCue::GameOver,
    }
}

/// Raise the dead flag for lethal failures and play the outcome cue.
pub(crate) fn apply_round_outcomes(
    mut outcomes: MessageReader<RoundOutcomeEvent>,
    mut condition: ResMut<PlayerCondition>,
    mut cues: MessageWriter<AudioCueEvent>,
) {
    for event in outcomes.read() {
        info!("Round: {:?} ended with {:?}", event.game, event.outcome);

        if let RoundOutcome::Failure(cause) = event.outcome {
            if cause.kills_player() {
                condition.set_dead();
            }
        }

        cues.write(AudioCueEvent {
            cue: outcome_cue(event.outcome),
        });
    }
}

pub(crate) fn follow_player_camera(
    player: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut camera: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    let Ok(mut camera) = camera.single_mut() else {
        return;
    };
    camera.translation.x = player.translation.x;
}
