//! Movement domain: player spawn and reset.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::content::GameConfig;
use crate::core::{RoundRestartedEvent, SceneEntity};
use crate::movement::{GameLayer, MovementState, MovementTuning, Player};

/// Spawn the player for the scene being entered. Tuning is refreshed from the
/// configuration so every scene starts from the same values.
pub(crate) fn spawn_player(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut tuning: ResMut<MovementTuning>,
    existing_player: Query<Entity, With<Player>>,
) {
    if !existing_player.is_empty() {
        info!("Movement: player already exists, skipping spawn");
        return;
    }

    *tuning = MovementTuning::from(&config.player);

    info!(
        "Movement: spawning player at {:?}, speed={}, jump={} (apex {:.0})",
        tuning.spawn,
        tuning.move_speed,
        tuning.jump_velocity,
        tuning.single_jump_height()
    );

    commands.spawn((
        // Identity & Movement
        (Player, MovementState::default(), SceneEntity),
        // Rendering
        Sprite {
            color: Color::srgb(0.1, 0.6, 0.55),
            custom_size: Some(tuning.size),
            ..default()
        },
        Transform::from_translation(tuning.spawn.extend(1.0)),
        // Physics
        (
            RigidBody::Dynamic,
            Collider::rectangle(tuning.size.x, tuning.size.y),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(0.0), // Gravity is applied by the movement systems
            Friction::new(0.0),
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::Player, [GameLayer::Ground, GameLayer::Hazard]),
        ),
    ));
}

/// Put the player back at the spawn point when a round restarts in place.
pub(crate) fn reset_player_on_restart(
    mut restarts: MessageReader<RoundRestartedEvent>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&mut Transform, &mut LinearVelocity, &mut MovementState), With<Player>>,
) {
    if restarts.read().count() == 0 {
        return;
    }

    for (mut transform, mut velocity, mut state) in &mut query {
        transform.translation = tuning.spawn.extend(transform.translation.z);
        velocity.0 = Vec2::ZERO;
        state.ground_contacts.clear();
        info!("Movement: player reset to {:?}", tuning.spawn);
    }
}
