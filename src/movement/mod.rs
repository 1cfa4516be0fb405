//! Movement domain: player locomotion, surface tagging and contact routing.

mod bootstrap;
mod components;
mod events;
mod resources;
mod systems;


pub use components::{Facing, GameLayer, MovementProfile, MovementState, Player, Surface, SurfaceKind};
pub use events::{ContactPhase, SurfaceContactEvent};
pub use resources::{MovementInput, MovementTuning};
pub use systems::next_horizontal_velocity;

use bevy::prelude::*;

use crate::core::{GameState, GameplaySet};
use crate::movement::bootstrap::{reset_player_on_restart, spawn_player};
use crate::movement::systems::{
    apply_gravity, apply_horizontal_movement, apply_jump, prune_lost_contacts, read_input,
    route_surface_contacts, show_player_condition, update_facing,
};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .add_message::<SurfaceContactEvent>()
            .add_systems(OnEnter(GameState::Playing), spawn_player)
            .add_systems(
                Update,
                read_input
                    .in_set(GameplaySet::Input)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (route_surface_contacts, prune_lost_contacts)
                    .chain()
                    .in_set(GameplaySet::Contacts)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (
                    reset_player_on_restart,
                    apply_horizontal_movement,
                    apply_jump,
                    apply_gravity,
                    update_facing,
                    show_player_condition,
                )
                    .chain()
                    .in_set(GameplaySet::Motion)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
