//! Red-Light domain: ECS adapters around `RedLightController`.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::content::{GameConfig, MinigameDef};
use crate::core::{
    ActiveScene, AudioCue, AudioCueEvent, FinishLine, MinigameKind, MovementGate,
    RoundOutcomeEvent, RoundRestartRequest, RoundRestartedEvent, SceneTransitionRequest,
    SessionRng,
};
use crate::movement::Player;
use crate::red_light::{LightPhase, LightPhaseChanged, PhaseChange, RedLightController, RedLightSample};

fn announce_phase(
    change: PhaseChange,
    phases: &mut MessageWriter<LightPhaseChanged>,
    cues: &mut MessageWriter<AudioCueEvent>,
) {
    phases.write(LightPhaseChanged {
        phase: change.phase,
        duration: change.duration,
    });
    let cue = match change.phase {
        LightPhase::Green => AudioCue::GreenLight {
            duration: change.duration,
        },
        LightPhase::Red => AudioCue::RedLight,
    };
    cues.write(AudioCueEvent { cue });
}

pub(crate) fn setup_red_light(
    mut commands: Commands,
    config: Res<GameConfig>,
    active: Res<ActiveScene>,
    mut gate: ResMut<MovementGate>,
    mut rng: ResMut<SessionRng>,
    mut phases: MessageWriter<LightPhaseChanged>,
    mut cues: MessageWriter<AudioCueEvent>,
) {
    let Some(scene) = active.def(&config) else {
        return;
    };
    let MinigameDef::RedLight(settings) = &scene.game else {
        return;
    };

    let mut controller = RedLightController::new(
        settings.clone(),
        scene.routing(),
        FinishLine::from_scene(scene),
    );
    let change = controller.start(&mut gate, &mut rng.rng);
    announce_phase(change, &mut phases, &mut cues);

    info!(
        "RedLight: round started (green {:.1}-{:.1}s, red {:.1}-{:.1}s, delay {:.2}s)",
        settings.min_green_secs,
        settings.max_green_secs,
        settings.min_red_secs,
        settings.max_red_secs,
        settings.detection_delay_secs
    );
    commands.insert_resource(controller);
}

pub(crate) fn tick_red_light(
    time: Res<Time>,
    mut controller: ResMut<RedLightController>,
    mut gate: ResMut<MovementGate>,
    mut rng: ResMut<SessionRng>,
    player: Query<(&Transform, &LinearVelocity), With<Player>>,
    mut phases: MessageWriter<LightPhaseChanged>,
    mut cues: MessageWriter<AudioCueEvent>,
    mut outcomes: MessageWriter<RoundOutcomeEvent>,
    mut transitions: MessageWriter<SceneTransitionRequest>,
) {
    let sample = match player.single() {
        Ok((transform, velocity)) => RedLightSample {
            horizontal_velocity: Some(velocity.x),
            player_position: Some(transform.translation.truncate()),
        },
        Err(_) => RedLightSample::default(),
    };

    let step = controller.tick(time.delta(), sample, &mut gate, &mut rng.rng);

    if let Some(change) = step.phase_change {
        announce_phase(change, &mut phases, &mut cues);
    }
    if let Some(outcome) = step.outcome {
        outcomes.write(RoundOutcomeEvent {
            game: MinigameKind::RedLight,
            outcome,
        });
    }
    if let Some(transition) = step.transition {
        transitions.write(SceneTransitionRequest {
            destination: transition.destination,
        });
    }
}

pub(crate) fn restart_red_light(
    mut requests: MessageReader<RoundRestartRequest>,
    mut controller: ResMut<RedLightController>,
    mut gate: ResMut<MovementGate>,
    mut rng: ResMut<SessionRng>,
    mut phases: MessageWriter<LightPhaseChanged>,
    mut cues: MessageWriter<AudioCueEvent>,
    mut restarted: MessageWriter<RoundRestartedEvent>,
) {
    if requests.read().count() == 0 {
        return;
    }

    let change = controller.restart(&mut gate, &mut rng.rng);
    announce_phase(change, &mut phases, &mut cues);
    restarted.write(RoundRestartedEvent {
        game: MinigameKind::RedLight,
    });
}

pub(crate) fn teardown_red_light(
    mut commands: Commands,
    controller: Option<ResMut<RedLightController>>,
    mut gate: ResMut<MovementGate>,
) {
    let Some(mut controller) = controller else {
        return;
    };
    controller.stop(&mut gate);
    commands.remove_resource::<RedLightController>();
    debug!("RedLight: controller removed");
}
