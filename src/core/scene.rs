//! Core domain: static scene geometry, finish line and teardown.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::content::{GameConfig, SceneDef, SurfaceDef};
use crate::core::ActiveScene;
use crate::movement::{GameLayer, Surface, SurfaceKind};

/// Everything spawned for a scene carries this and is despawned on exit.
#[derive(Component, Debug)]
pub struct SceneEntity;

#[derive(Component, Debug)]
pub struct FinishMarker;

/// Goal point of a scene. The player wins once strictly closer than
/// `trigger_distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishLine {
    pub position: Vec2,
    pub trigger_distance: f32,
}

impl FinishLine {
    pub fn from_scene(scene: &SceneDef) -> Option<Self> {
        scene.finish.map(|(x, y)| Self {
            position: Vec2::new(x, y),
            trigger_distance: scene.finish_distance,
        })
    }

    pub fn reached_by(&self, player: Vec2) -> bool {
        player.distance(self.position) < self.trigger_distance
    }
}

/// Whether `player` is at `finish`. Missing either side means no.
pub fn finish_reached(finish: Option<FinishLine>, player: Option<Vec2>) -> bool {
    match (finish, player) {
        (Some(finish), Some(player)) => finish.reached_by(player),
        _ => false,
    }
}

pub fn surface_color(kind: SurfaceKind) -> Color {
    match kind {
        SurfaceKind::Ground => Color::srgb(0.35, 0.3, 0.28),
        SurfaceKind::Plate => Color::srgba(0.7, 0.9, 1.0, 0.6),
        SurfaceKind::DeadlyGround => Color::srgb(0.55, 0.08, 0.12),
    }
}

/// Components for a static, contact-reporting surface.
pub fn surface_bundle(kind: SurfaceKind, center: Vec2, size: Vec2) -> impl Bundle {
    (
        Surface(kind),
        SceneEntity,
        Sprite {
            color: surface_color(kind),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(center.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]),
    )
}

fn spawn_surface(commands: &mut Commands, surface: &SurfaceDef) {
    commands.spawn(surface_bundle(
        surface.kind,
        Vec2::new(surface.center.0, surface.center.1),
        Vec2::new(surface.size.0, surface.size.1),
    ));
}

pub(crate) fn spawn_scene_geometry(
    mut commands: Commands,
    config: Res<GameConfig>,
    active: Res<ActiveScene>,
) {
    let Some(scene) = active.def(&config) else {
        warn!("Scene: '{}' not found, nothing to spawn", active.name);
        return;
    };

    for surface in &scene.surfaces {
        spawn_surface(&mut commands, surface);
    }

    match FinishLine::from_scene(scene) {
        Some(finish) => {
            commands.spawn((
                FinishMarker,
                SceneEntity,
                Sprite {
                    color: Color::srgb(0.95, 0.8, 0.2),
                    custom_size: Some(Vec2::new(12.0, 160.0)),
                    ..default()
                },
                Transform::from_translation(finish.position.extend(-0.5)),
            ));
        }
        None => warn!("Scene: '{}' has no finish line, it cannot be won", scene.name),
    }

    info!(
        "Scene: spawned '{}' ({:?}) with {} surfaces",
        scene.name,
        scene.game.kind(),
        scene.surfaces.len()
    );
}

pub(crate) fn despawn_scene_entities(
    mut commands: Commands,
    query: Query<Entity, With<SceneEntity>>,
) {
    let mut count = 0;
    for entity in &query {
        commands.entity(entity).despawn();
        count += 1;
    }
    debug!("Scene: despawned {} entities", count);
}
