//! Glass-Bridge domain: ECS adapters around `GlassBridgeController`.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::content::{GameConfig, MinigameDef};
use crate::core::{
    ActiveScene, AudioCue, AudioCueEvent, FinishLine, MinigameKind, MovementGate,
    RoundOutcomeEvent, RoundRestartRequest, RoundRestartedEvent, SceneTransitionRequest,
    surface_bundle,
};
use crate::glass_bridge::{
    ChoiceResult, GlassBridgeController, Plate, PlateChoice, PlateEntry, PlateStatus,
};
use crate::movement::{ContactPhase, MovementState, Player, SurfaceContactEvent, SurfaceKind};

fn spawn_plates(commands: &mut Commands, controller: &GlassBridgeController) {
    let settings = controller.settings();
    let size = Vec2::new(settings.plate_size.0, settings.plate_size.1);
    for index in 0..controller.plate_count() {
        if controller.status(index) == Some(PlateStatus::Destroyed) {
            continue;
        }
        commands.spawn((
            Plate { index },
            surface_bundle(SurfaceKind::Plate, settings.plate_center(index), size),
        ));
    }
}

pub(crate) fn setup_glass_bridge(
    mut commands: Commands,
    config: Res<GameConfig>,
    active: Res<ActiveScene>,
    mut gate: ResMut<MovementGate>,
) {
    let Some(scene) = active.def(&config) else {
        return;
    };
    let MinigameDef::GlassBridge(settings) = &scene.game else {
        return;
    };

    let mut controller = GlassBridgeController::new(
        settings.clone(),
        scene.routing(),
        FinishLine::from_scene(scene),
    );
    controller.start(&mut gate);
    spawn_plates(&mut commands, &controller);
    commands.insert_resource(controller);
}

/// Plate contacts drive arming; the hazard floor ends the round.
pub(crate) fn route_bridge_contacts(
    mut contacts: MessageReader<SurfaceContactEvent>,
    mut controller: ResMut<GlassBridgeController>,
    mut gate: ResMut<MovementGate>,
    plates: Query<&Plate>,
    mut outcomes: MessageWriter<RoundOutcomeEvent>,
) {
    for contact in contacts.read() {
        match (contact.kind, contact.phase) {
            (SurfaceKind::Plate, phase) => {
                // Ended contacts for a shattered plate arrive after its despawn
                let Ok(plate) = plates.get(contact.surface) else {
                    continue;
                };
                if phase == ContactPhase::Began {
                    if controller.enter_plate(plate.index, &mut gate) == PlateEntry::AlreadyResolved {
                        debug!("GlassBridge: back on resolved plate {}", plate.index);
                    }
                } else {
                    controller.exit_plate(plate.index, &mut gate);
                }
            }
            (SurfaceKind::DeadlyGround, ContactPhase::Began) => {
                if let Some(outcome) = controller.hit_deadly_ground(&mut gate) {
                    outcomes.write(RoundOutcomeEvent {
                        game: MinigameKind::GlassBridge,
                        outcome,
                    });
                }
            }
            _ => {}
        }
    }
}

pub(crate) fn read_plate_choice(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut controller: ResMut<GlassBridgeController>,
    mut gate: ResMut<MovementGate>,
    plates: Query<(Entity, &Plate)>,
    player: Query<&MovementState, With<Player>>,
    mut cues: MessageWriter<AudioCueEvent>,
) {
    if controller.armed_plate().is_none() {
        return;
    }
    let choice = if keyboard.just_pressed(KeyCode::Digit1) || keyboard.just_pressed(KeyCode::Numpad1) {
        PlateChoice::First
    } else if keyboard.just_pressed(KeyCode::Digit2) || keyboard.just_pressed(KeyCode::Numpad2) {
        PlateChoice::Second
    } else {
        return;
    };

    match controller.choose(choice, &mut gate) {
        Some(ChoiceResult::Correct { .. }) => {
            cues.write(AudioCueEvent {
                cue: AudioCue::CorrectChoice,
            });
            if let Ok(state) = player.single() {
                let touched: Vec<usize> = state
                    .ground_contacts
                    .iter()
                    .filter_map(|entity| plates.get(*entity).ok())
                    .map(|(_, plate)| plate.index)
                    .collect();
                if controller.arm_touched(&touched, &mut gate) == PlateEntry::Armed {
                    debug!("GlassBridge: already standing on the next plate");
                }
            }
        }
        Some(ChoiceResult::Wrong { destroyed }) => {
            for (entity, plate) in &plates {
                if plate.index == destroyed {
                    commands.entity(entity).despawn();
                }
            }
            cues.write(AudioCueEvent {
                cue: AudioCue::WrongChoice,
            });
        }
        None => {}
    }
}

pub(crate) fn tick_glass_bridge(
    time: Res<Time>,
    mut controller: ResMut<GlassBridgeController>,
    mut gate: ResMut<MovementGate>,
    player: Query<&Transform, With<Player>>,
    mut outcomes: MessageWriter<RoundOutcomeEvent>,
    mut transitions: MessageWriter<SceneTransitionRequest>,
) {
    let player_position = player.single().ok().map(|t| t.translation.truncate());
    let step = controller.tick(time.delta(), player_position, &mut gate);

    if let Some(outcome) = step.outcome {
        outcomes.write(RoundOutcomeEvent {
            game: MinigameKind::GlassBridge,
            outcome,
        });
    }
    if let Some(transition) = step.transition {
        transitions.write(SceneTransitionRequest {
            destination: transition.destination,
        });
    }
}

pub(crate) fn restart_glass_bridge(
    mut commands: Commands,
    mut requests: MessageReader<RoundRestartRequest>,
    mut controller: ResMut<GlassBridgeController>,
    mut gate: ResMut<MovementGate>,
    plates: Query<Entity, With<Plate>>,
    mut restarted: MessageWriter<RoundRestartedEvent>,
) {
    if requests.read().count() == 0 {
        return;
    }

    for entity in &plates {
        commands.entity(entity).despawn();
    }
    controller.restart(&mut gate);
    spawn_plates(&mut commands, &controller);
    restarted.write(RoundRestartedEvent {
        game: MinigameKind::GlassBridge,
    });
}

pub(crate) fn teardown_glass_bridge(
    mut commands: Commands,
    controller: Option<ResMut<GlassBridgeController>>,
    mut gate: ResMut<MovementGate>,
) {
    let Some(mut controller) = controller else {
        return;
    };
    controller.stop(&mut gate);
    commands.remove_resource::<GlassBridgeController>();
    debug!("GlassBridge: controller removed");
}
