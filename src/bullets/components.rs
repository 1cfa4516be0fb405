//! Bullets domain: projectile and indicator components.

use bevy::prelude::*;

use crate::bullets::ProjectileId;
use crate::core::{TaskHandle, TaskQueue};

#[derive(Component, Debug)]
pub struct Projectile {
    pub id: ProjectileId,
}

/// Thin line drawn along a fresh projectile's path, fading out.
#[derive(Component, Debug)]
pub struct LineOfFire {
    pub fade: TaskHandle,
    pub base_alpha: f32,
}

/// Pending indicator despawns. Cancelled wholesale when the round ends.
#[derive(Resource, Debug, Default)]
pub struct LineOfFireFades(pub TaskQueue<Entity>);
