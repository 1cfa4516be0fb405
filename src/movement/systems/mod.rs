//! Movement domain: system modules for locomotion updates.

pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod movement;

pub(crate) use collisions::{prune_lost_contacts, route_surface_contacts};
pub(crate) use input::read_input;
pub use movement::next_horizontal_velocity;
pub(crate) use movement::{
    apply_gravity, apply_horizontal_movement, apply_jump, show_player_condition, update_facing,
};
