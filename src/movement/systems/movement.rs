//! Movement domain: locomotion systems.
//!
//! Every system here honours the movement gate and the dead flag: a closed
//! gate pins horizontal velocity to zero and swallows jumps.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::core::{MovementGate, PlayerCondition};
use crate::movement::{Facing, MovementInput, MovementProfile, MovementState, MovementTuning, Player};

/// Horizontal velocity for the next tick under `profile`.
pub fn next_horizontal_velocity(
    profile: MovementProfile,
    current: f32,
    axis: f32,
    move_speed: f32,
    dt: f32,
    can_move: bool,
) -> f32 {
    if !can_move {
        return 0.0;
    }

    let target = axis * move_speed;
    match profile {
        MovementProfile::InstantStop => target,
        MovementProfile::Inertia {
            acceleration,
            friction,
            min_velocity,
        } => {
            if axis.abs() > 0.1 {
                let blend = (acceleration * dt).clamp(0.0, 1.0);
                current + (target - current) * blend
            } else {
                let decayed = current * friction;
                if decayed.abs() < min_velocity { 0.0 } else { decayed }
            }
        }
    }
}

fn movement_allowed(gate: &MovementGate, condition: &PlayerCondition) -> bool {
    gate.can_move() && !condition.is_dead()
}

pub(crate) fn apply_horizontal_movement(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    gate: Res<MovementGate>,
    condition: Res<PlayerCondition>,
    mut query: Query<&mut LinearVelocity, With<Player>>,
) {
    let dt = time.delta_secs();
    let can_move = movement_allowed(&gate, &condition);

    for mut velocity in &mut query {
        velocity.x = next_horizontal_velocity(
            tuning.profile,
            velocity.x,
            input.axis_x,
            tuning.move_speed,
            dt,
            can_move,
        );
    }
}

pub(crate) fn apply_jump(
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    gate: Res<MovementGate>,
    condition: Res<PlayerCondition>,
    mut query: Query<(&MovementState, &mut LinearVelocity), With<Player>>,
) {
    if !input.jump_just_pressed || !movement_allowed(&gate, &condition) {
        return;
    }

    for (state, mut velocity) in &mut query {
        if state.on_ground() {
            velocity.y = tuning.jump_velocity;
            debug!("Movement: jump from {} contacts", state.ground_contacts.len());
        }
    }
}

pub(crate) fn apply_gravity(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    mut query: Query<&mut LinearVelocity, With<Player>>,
) {
    let dt = time.delta_secs();

    for mut velocity in &mut query {
        velocity.y -= tuning.gravity * dt;
    }
}

pub(crate) fn update_facing(
    input: Res<MovementInput>,
    gate: Res<MovementGate>,
    mut query: Query<(&mut MovementState, &mut Sprite), With<Player>>,
) {
    if !gate.can_move() {
        return;
    }

    for (mut state, mut sprite) in &mut query {
        if input.axis_x > 0.1 {
            state.facing = Facing::Right;
        } else if input.axis_x < -0.1 {
            state.facing = Facing::Left;
        }
        sprite.flip_x = state.facing == Facing::Left;
    }
}

/// Tint the player while the dead flag is raised.
pub(crate) fn show_player_condition(
    condition: Res<PlayerCondition>,
    mut query: Query<&mut Sprite, With<Player>>,
) {
    if !condition.is_changed() {
        return;
    }

    let color = if condition.is_dead() {
        Color::srgb(0.45, 0.1, 0.1)
    } else {
        Color::srgb(0.1, 0.6, 0.55)
    };
    for mut sprite in &mut query {
        sprite.color = color;
    }
}
