//! Core domain: session flow, round outcomes, movement gate and shared plumbing.

mod audio;
mod events;
mod gate;
mod outcome;
mod resources;
mod scene;
mod schedule;
mod state;
mod systems;


pub use audio::{AudioCue, AudioCueEvent, fit_playback_speed};
pub use events::{
    RoundOutcomeEvent, RoundRestartRequest, RoundRestartedEvent, SceneTransitionRequest,
};
pub use gate::{GateHolder, MovementGate};
pub use outcome::{
    DEFAULT_TRANSITION_DELAY, FailureCause, MinigameKind, OutcomeRouting, RoundOutcome,
    RoundOutcomeReporter, RoundState, SceneTransition,
};
pub use resources::{ActiveScene, PlayerCondition, SessionRng};
pub use scene::{FinishLine, SceneEntity, finish_reached, surface_bundle};
pub use schedule::{TaskHandle, TaskQueue, draw_duration};
pub use state::{GameState, GameplaySet};
pub use systems::resolve_destination;

use bevy::prelude::*;

use crate::core::audio::{load_audio_library, play_audio_cues};
use crate::core::scene::{despawn_scene_entities, spawn_scene_geometry};
use crate::core::systems::{
    apply_round_outcomes, enter_start_scene, finish_loading, follow_player_camera,
    handle_scene_transitions, revive_on_restart, revive_player, seed_session_rng, setup_camera,
};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<ActiveScene>()
            .init_resource::<MovementGate>()
            .init_resource::<PlayerCondition>()
            .add_message::<RoundOutcomeEvent>()
            .add_message::<SceneTransitionRequest>()
            .add_message::<RoundRestartRequest>()
            .add_message::<RoundRestartedEvent>()
            .add_message::<AudioCueEvent>()
            .configure_sets(
                Update,
                (
                    GameplaySet::Input,
                    GameplaySet::Contacts,
                    GameplaySet::Rules,
                    GameplaySet::Motion,
                    GameplaySet::Feedback,
                )
                    .chain(),
            )
            .add_systems(
                Startup,
                (
                    setup_camera,
                    load_audio_library,
                    seed_session_rng,
                    enter_start_scene,
                ),
            )
            .add_systems(OnEnter(GameState::Loading), finish_loading)
            .add_systems(
                OnEnter(GameState::Playing),
                (revive_player, spawn_scene_geometry),
            )
            .add_systems(OnExit(GameState::Playing), despawn_scene_entities)
            .add_systems(
                Update,
                (revive_on_restart, apply_round_outcomes, handle_scene_transitions)
                    .chain()
                    .in_set(GameplaySet::Feedback)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (play_audio_cues, follow_player_camera).in_set(GameplaySet::Feedback),
            );
    }
}
