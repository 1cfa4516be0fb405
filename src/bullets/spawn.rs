//! Bullets domain: where projectiles appear and when they have left.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub enum SpawnOrigin {
    /// A fixed world point; the y range is a jitter added to it
    Fixed((f32, f32)),
    /// Just past the right edge of the view; the y range is absolute
    CameraRightEdge { x_offset: f32 },
}

impl Default for SpawnOrigin {
    fn default() -> Self {
        SpawnOrigin::CameraRightEdge { x_offset: 100.0 }
    }
}

/// World facts available when a spawn is due.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnContext {
    /// Right edge of the visible region, if a camera exists
    pub camera_right_x: Option<f32>,
    pub player_x: Option<f32>,
}

fn draw_in<R: Rng + ?Sized>(rng: &mut R, range: (f32, f32)) -> f32 {
    let (min, max) = range;
    if !min.is_finite() {
        return 0.0;
    }
    if !max.is_finite() || max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// Resolve the spawn point, or `None` when neither the camera nor the player
/// can anchor a camera-relative origin.
pub fn resolve_spawn_position<R: Rng + ?Sized>(
    origin: SpawnOrigin,
    y_range: (f32, f32),
    context: SpawnContext,
    rng: &mut R,
) -> Option<Vec2> {
    match origin {
        SpawnOrigin::Fixed((x, y)) => {
            let jitter = if y_range.0 == y_range.1 { 0.0 } else { draw_in(rng, y_range) };
            Some(Vec2::new(x, y + jitter))
        }
        SpawnOrigin::CameraRightEdge { x_offset } => {
            let base_x = context.camera_right_x.or(context.player_x)?;
            Some(Vec2::new(base_x + x_offset, draw_in(rng, y_range)))
        }
    }
}

/// Fraction of the view width a projectile must travel past the left edge
/// before it counts as gone.
pub const EXIT_MARGIN: f32 = 0.1;

/// Whether a projectile at `position` has left play. With a camera the rule
/// is the left view edge plus a margin; without one it is distance from the
/// player. With neither, nothing ever exits.
pub fn projectile_exited(
    position: Vec2,
    view_x: Option<(f32, f32)>,
    player: Option<Vec2>,
    despawn_distance: f32,
) -> bool {
    if let Some((left, right)) = view_x {
        let margin = (right - left).abs() * EXIT_MARGIN;
        return position.x < left - margin;
    }
    match player {
        Some(player) => position.distance(player) > despawn_distance,
        None => false,
    }
}
