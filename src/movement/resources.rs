//! Movement domain: tuning and input resources.

use bevy::prelude::*;

use crate::content::PlayerConfig;
use crate::movement::MovementProfile;

#[derive(Resource, Debug, Clone)]
pub struct MovementTuning {
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub size: Vec2,
    pub spawn: Vec2,
    pub profile: MovementProfile,
}

impl From<&PlayerConfig> for MovementTuning {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            jump_velocity: config.jump_velocity,
            gravity: config.gravity,
            size: Vec2::new(config.size.0, config.size.1),
            spawn: Vec2::new(config.spawn.0, config.spawn.1),
            profile: config.profile,
        }
    }
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self::from(&PlayerConfig::default())
    }
}

impl MovementTuning {
    /// Maximum height reachable from a single ground jump: h = v² / (2g)
    pub fn single_jump_height(&self) -> f32 {
        if self.gravity <= 0.0 {
            return f32::INFINITY;
        }
        self.jump_velocity * self.jump_velocity / (2.0 * self.gravity)
    }
}

#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    /// Horizontal axis in [-1, 1]
    pub axis_x: f32,
    pub jump_just_pressed: bool,
}
