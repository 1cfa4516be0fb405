//! Bullets domain: dodge projectiles fired across the course.

mod components;
mod controller;
mod events;
mod spawn;
mod systems;

#[cfg(test)]
mod tests;

pub use components::{LineOfFire, LineOfFireFades, Projectile};
pub use controller::{
    BulletHazardController, BulletSettings, BulletStep, ProjectileId, ProjectileSpawn,
    ProjectileStats,
};
pub use events::{BulletStartRequest, BulletStopRequest};
pub use spawn::{EXIT_MARGIN, SpawnContext, SpawnOrigin, projectile_exited, resolve_spawn_position};

use bevy::prelude::*;

use crate::bullets::systems::{
    clear_hazards_on_outcome, despawn_inactive_projectiles, detect_projectile_exits,
    detect_projectile_hits, fade_lines_of_fire, handle_bullet_requests, handle_deadly_ground,
    restart_bullets,
    setup_bullets, teardown_bullets, tick_bullets,
};
use crate::core::{GameState, GameplaySet};

pub struct BulletsPlugin;

impl Plugin for BulletsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<BulletStartRequest>()
            .add_message::<BulletStopRequest>()
            .add_systems(OnEnter(GameState::Playing), setup_bullets)
            .add_systems(OnExit(GameState::Playing), teardown_bullets)
            .add_systems(
                Update,
                (
                    restart_bullets,
                    handle_bullet_requests,
                    tick_bullets,
                    detect_projectile_exits,
                    detect_projectile_hits,
                    handle_deadly_ground,
                    despawn_inactive_projectiles,
                )
                    .chain()
                    .in_set(GameplaySet::Rules)
                    .run_if(in_state(GameState::Playing))
                    .run_if(resource_exists::<BulletHazardController>),
            )
            .add_systems(
                Update,
                (clear_hazards_on_outcome, fade_lines_of_fire)
                    .chain()
                    .in_set(GameplaySet::Feedback)
                    .run_if(in_state(GameState::Playing))
                    .run_if(resource_exists::<LineOfFireFades>),
            );
    }
}
