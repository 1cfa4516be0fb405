//! Movement domain: components and physics layers for locomotion.

use std::collections::HashSet;

use avian2d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Anything the player can stand on, including deadly floors
    Ground,
    /// Player character
    Player,
    /// Projectiles; overlap the player without pushing it
    Hazard,
}

#[derive(Component, Debug)]
pub struct Player;

#[derive(Component, Debug, Default)]
pub struct MovementState {
    /// Standable surfaces currently touched
    pub ground_contacts: HashSet<Entity>,
    pub facing: Facing,
}

impl MovementState {
    pub fn on_ground(&self) -> bool {
        !self.ground_contacts.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

/// What a static collider means to the minigames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SurfaceKind {
    Ground,
    Plate,
    DeadlyGround,
}

impl SurfaceKind {
    /// Whether touching this surface lets the player jump.
    pub fn is_standable(self) -> bool {
        matches!(self, SurfaceKind::Ground | SurfaceKind::Plate)
    }
}

/// Tags a collider with its surface kind so contacts can be routed.
#[derive(Component, Debug, Clone, Copy)]
pub struct Surface(pub SurfaceKind);

/// How horizontal input maps to horizontal velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub enum MovementProfile {
    /// Velocity follows the input axis directly and stops with it
    #[default]
    InstantStop,
    /// Velocity eases toward the target and decays without input
    Inertia {
        acceleration: f32,
        /// Per-tick multiplier applied without input
        friction: f32,
        /// Speeds below this snap to zero when decaying
        min_velocity: f32,
    },
}
