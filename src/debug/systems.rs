//! Debug domain: hotkeys and the info overlay.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::bullets::{BulletHazardController, BulletStartRequest, BulletStopRequest};
use crate::content::GameConfig;
use crate::core::{
    ActiveScene, MovementGate, PlayerCondition, RoundRestartRequest, SceneTransitionRequest,
    SessionRng,
};
use crate::debug::DebugState;
use crate::movement::{MovementState, Player};

const STATUS_SECS: f32 = 2.0;

/// Marker for the info overlay text
#[derive(Component)]
pub struct DebugInfoOverlay;

pub(crate) fn handle_debug_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    active: Res<ActiveScene>,
    mut debug_state: ResMut<DebugState>,
    bullets: Option<Res<BulletHazardController>>,
    mut restarts: MessageWriter<RoundRestartRequest>,
    mut transitions: MessageWriter<SceneTransitionRequest>,
    mut bullet_starts: MessageWriter<BulletStartRequest>,
    mut bullet_stops: MessageWriter<BulletStopRequest>,
) {
    // F3: Toggle info overlay
    if keyboard.just_pressed(KeyCode::F3) {
        debug_state.show_info = !debug_state.show_info;
    }

    // F5: Restart the current round in place
    if keyboard.just_pressed(KeyCode::F5) {
        restarts.write(RoundRestartRequest);
        debug_state.set_message("Round restarted", STATUS_SECS);
        info!("[DEBUG] Restarting round in '{}'", active.name);
    }

    // F6: Skip to the next scene
    if keyboard.just_pressed(KeyCode::F6) {
        match config.next_scene_after(&active.name) {
            Some(next) => {
                let msg = format!("Skipping to '{}'", next.name);
                transitions.write(SceneTransitionRequest {
                    destination: next.name.clone(),
                });
                info!("[DEBUG] {}", msg);
                debug_state.set_message(msg, STATUS_SECS);
            }
            None => warn!("[DEBUG] No scene follows '{}'", active.name),
        }
    }

    // F7: Start or stop bullet spawning
    if keyboard.just_pressed(KeyCode::F7) {
        match bullets.as_deref() {
            Some(controller) if controller.is_running() => {
                bullet_stops.write(BulletStopRequest);
                debug_state.set_message("Bullets stopped", STATUS_SECS);
                info!("[DEBUG] Stopping bullet spawning");
            }
            Some(_) => {
                bullet_starts.write(BulletStartRequest);
                debug_state.set_message("Bullets started", STATUS_SECS);
                info!("[DEBUG] Starting bullet spawning");
            }
            None => warn!("[DEBUG] No bullet round in '{}'", active.name),
        }
    }
}

pub(crate) fn update_status_message(time: Res<Time>, mut debug_state: ResMut<DebugState>) {
    debug_state.tick_message(time.delta_secs());
}

fn spawn_debug_info_overlay(commands: &mut Commands) {
    commands.spawn((
        DebugInfoOverlay,
        Text::new("Loading..."),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(0.8, 0.9, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(20.0),
            bottom: Val::Px(20.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ZIndex(500),
    ));
}

pub(crate) fn update_debug_info_overlay(
    mut commands: Commands,
    debug_state: Res<DebugState>,
    active: Res<ActiveScene>,
    gate: Res<MovementGate>,
    condition: Res<PlayerCondition>,
    rng: Option<Res<SessionRng>>,
    player_query: Query<(&Transform, &MovementState), With<Player>>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    if !debug_state.show_info {
        for entity in &existing_overlay {
            commands.entity(entity).despawn();
        }
        return;
    }

    if existing_overlay.is_empty() {
        spawn_debug_info_overlay(&mut commands);
        return;
    }

    let Ok(mut text) = overlay_query.single_mut() else {
        return;
    };
    let player = match player_query.single() {
        Ok((transform, state)) => format!(
            "Pos: ({:.0}, {:.0})\nGrounded: {}",
            transform.translation.x,
            transform.translation.y,
            state.on_ground()
        ),
        Err(_) => "Pos: -".to_string(),
    };
    let status = debug_state
        .status_message
        .as_ref()
        .map(|(msg, _)| msg.as_str())
        .unwrap_or("");

    **text = format!(
        "Scene: {}\nSeed: {}\nGate: {:?} can_move={}\nDead: {}\n{}\n{}",
        active.name,
        rng.map(|r| r.seed.to_string()).unwrap_or_else(|| "-".to_string()),
        gate.holder(),
        gate.can_move(),
        condition.is_dead(),
        player,
        status
    );
}
