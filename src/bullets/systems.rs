//! Bullets domain: ECS adapters around `BulletHazardController`.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::bullets::components::{LineOfFire, LineOfFireFades, Projectile};
use crate::bullets::{
    BulletHazardController, BulletStartRequest, BulletStopRequest, ProjectileSpawn, SpawnContext,
    projectile_exited,
};
use crate::content::{GameConfig, MinigameDef};
use crate::core::{
    ActiveScene, AudioCue, AudioCueEvent, FinishLine, MinigameKind, MovementGate,
    RoundOutcomeEvent, RoundRestartRequest, RoundRestartedEvent, SceneEntity,
    SceneTransitionRequest, SessionRng,
};
use crate::movement::{ContactPhase, GameLayer, Player, SurfaceContactEvent, SurfaceKind};

const LINE_OF_FIRE_ALPHA: f32 = 0.6;

/// Left and right world x of the camera's view.
fn visible_x_bounds(camera: &Camera, transform: &GlobalTransform) -> Option<(f32, f32)> {
    let size = camera.logical_viewport_size()?;
    let left = camera
        .viewport_to_world_2d(transform, Vec2::new(0.0, size.y * 0.5))
        .ok()?;
    let right = camera
        .viewport_to_world_2d(transform, Vec2::new(size.x, size.y * 0.5))
        .ok()?;
    Some((left.x, right.x))
}

pub(crate) fn setup_bullets(
    mut commands: Commands,
    config: Res<GameConfig>,
    active: Res<ActiveScene>,
    mut gate: ResMut<MovementGate>,
    mut rng: ResMut<SessionRng>,
) {
    let Some(scene) = active.def(&config) else {
        return;
    };
    let MinigameDef::BulletHazard(settings) = &scene.game else {
        return;
    };

    let mut controller = BulletHazardController::new(
        settings.clone(),
        scene.routing(),
        FinishLine::from_scene(scene),
    );
    if settings.start_on_load {
        controller.start(&mut gate, &mut rng.rng);
    } else {
        controller.wait_for_start(&mut gate);
    }

    commands.insert_resource(controller);
    commands.insert_resource(LineOfFireFades::default());
}

fn spawn_projectile(
    commands: &mut Commands,
    fades: &mut LineOfFireFades,
    spawn: ProjectileSpawn,
    radius: f32,
    indicator_length: f32,
    indicator_fade_secs: f32,
) {
    commands.spawn((
        Projectile { id: spawn.id },
        SceneEntity,
        Sprite {
            color: Color::srgb(0.95, 0.85, 0.3),
            custom_size: Some(Vec2::splat(radius * 2.0)),
            ..default()
        },
        Transform::from_translation(spawn.position.extend(2.0)),
        RigidBody::Kinematic,
        Collider::circle(radius),
        Sensor,
        LinearVelocity(spawn.velocity),
        CollisionEventsEnabled,
        CollisionLayers::new(GameLayer::Hazard, [GameLayer::Player]),
    ));

    // Centered so the line runs from the spawn point along the path.
    let direction = spawn.velocity.normalize_or_zero();
    let center = spawn.position + direction * indicator_length * 0.5;
    let line = commands
        .spawn((
            SceneEntity,
            Sprite {
                color: Color::srgba(1.0, 0.2, 0.2, LINE_OF_FIRE_ALPHA),
                custom_size: Some(Vec2::new(indicator_length, 2.0)),
                ..default()
            },
            Transform::from_translation(center.extend(1.5)),
        ))
        .id();
    let fade = fades.0.schedule(indicator_fade_secs, line);
    commands.entity(line).insert(LineOfFire {
        fade,
        base_alpha: LINE_OF_FIRE_ALPHA,
    });
}

pub(crate) fn tick_bullets(
    mut commands: Commands,
    time: Res<Time>,
    mut controller: ResMut<BulletHazardController>,
    mut fades: ResMut<LineOfFireFades>,
    mut gate: ResMut<MovementGate>,
    mut rng: ResMut<SessionRng>,
    camera: Query<(&Camera, &GlobalTransform)>,
    player: Query<&Transform, With<Player>>,
    mut cues: MessageWriter<AudioCueEvent>,
    mut outcomes: MessageWriter<RoundOutcomeEvent>,
    mut transitions: MessageWriter<SceneTransitionRequest>,
) {
    let player_position = player.single().ok().map(|t| t.translation.truncate());
    let camera_right_x = camera
        .single()
        .ok()
        .and_then(|(camera, transform)| visible_x_bounds(camera, transform))
        .map(|(_, right)| right);
    let context = SpawnContext {
        camera_right_x,
        player_x: player_position.map(|p| p.x),
    };

    let step = controller.tick(time.delta(), context, player_position, &mut gate, &mut rng.rng);

    if let Some(spawn) = step.spawned {
        let settings = controller.settings();
        spawn_projectile(
            &mut commands,
            &mut fades,
            spawn,
            settings.projectile_radius,
            settings.indicator_length,
            settings.indicator_fade_secs,
        );
        cues.write(AudioCueEvent {
            cue: AudioCue::BulletSpawn,
        });
    }
    if let Some(outcome) = step.outcome {
        outcomes.write(RoundOutcomeEvent {
            game: MinigameKind::BulletHazard,
            outcome,
        });
    }
    if let Some(transition) = step.transition {
        transitions.write(SceneTransitionRequest {
            destination: transition.destination,
        });
    }
}

/// Exited projectiles leave the active set; their entities go in
/// `despawn_inactive_projectiles`.
pub(crate) fn detect_projectile_exits(
    mut controller: ResMut<BulletHazardController>,
    camera: Query<(&Camera, &GlobalTransform)>,
    player: Query<&Transform, With<Player>>,
    projectiles: Query<(&Projectile, &Transform)>,
) {
    let view_x = camera
        .single()
        .ok()
        .and_then(|(camera, transform)| visible_x_bounds(camera, transform));
    let player_position = player.single().ok().map(|t| t.translation.truncate());
    let despawn_distance = controller.settings().despawn_distance;

    for (projectile, transform) in &projectiles {
        let position = transform.translation.truncate();
        if !projectile_exited(position, view_x, player_position, despawn_distance) {
            continue;
        }
        if controller.on_projectile_exited(projectile.id) {
            debug!("Bullets: {:?} left the view", projectile.id);
        }
    }
}

pub(crate) fn detect_projectile_hits(
    mut collisions: MessageReader<CollisionStart>,
    mut controller: ResMut<BulletHazardController>,
    mut gate: ResMut<MovementGate>,
    projectiles: Query<&Projectile>,
    players: Query<(), With<Player>>,
    mut outcomes: MessageWriter<RoundOutcomeEvent>,
) {
    for event in collisions.read() {
        let (a, b) = (event.collider1, event.collider2);
        let projectile = if players.contains(a) {
            projectiles.get(b)
        } else if players.contains(b) {
            projectiles.get(a)
        } else {
            continue;
        };
        let Ok(projectile) = projectile else {
            continue;
        };

        if let Some(outcome) = controller.on_projectile_hit_player(projectile.id, &mut gate) {
            outcomes.write(RoundOutcomeEvent {
                game: MinigameKind::BulletHazard,
                outcome,
            });
        }
    }
}

pub(crate) fn handle_deadly_ground(
    mut contacts: MessageReader<SurfaceContactEvent>,
    mut controller: ResMut<BulletHazardController>,
    mut gate: ResMut<MovementGate>,
    mut outcomes: MessageWriter<RoundOutcomeEvent>,
) {
    for contact in contacts.read() {
        if contact.kind != SurfaceKind::DeadlyGround || contact.phase != ContactPhase::Began {
            continue;
        }
        if let Some(outcome) = controller.on_deadly_ground(&mut gate) {
            outcomes.write(RoundOutcomeEvent {
                game: MinigameKind::BulletHazard,
                outcome,
            });
        }
    }
}

/// The controller's set is authoritative: any projectile entity it no longer
/// tracks is despawned.
pub(crate) fn despawn_inactive_projectiles(
    mut commands: Commands,
    controller: Res<BulletHazardController>,
    projectiles: Query<(Entity, &Projectile)>,
) {
    for (entity, projectile) in &projectiles {
        if !controller.is_active(projectile.id) {
            commands.entity(entity).despawn();
        }
    }
}

pub(crate) fn fade_lines_of_fire(
    mut commands: Commands,
    time: Res<Time>,
    mut fades: ResMut<LineOfFireFades>,
    mut lines: Query<(&LineOfFire, &mut Sprite)>,
) {
    for entity in fades.0.tick(time.delta()) {
        commands.entity(entity).despawn();
    }

    for (line, mut sprite) in &mut lines {
        if let Some(progress) = fades.0.fraction(line.fade) {
            sprite.color.set_alpha(line.base_alpha * (1.0 - progress));
        }
    }
}

fn clear_lines_of_fire(commands: &mut Commands, fades: &mut LineOfFireFades) {
    for entity in fades.0.cancel_all() {
        commands.entity(entity).despawn();
    }
}

/// Indicators must not outlive a resolved round.
pub(crate) fn clear_hazards_on_outcome(
    mut commands: Commands,
    mut outcomes: MessageReader<RoundOutcomeEvent>,
    mut fades: ResMut<LineOfFireFades>,
) {
    let resolved = outcomes
        .read()
        .any(|event| event.game == MinigameKind::BulletHazard);
    if resolved {
        clear_lines_of_fire(&mut commands, &mut fades);
    }
}

pub(crate) fn restart_bullets(
    mut commands: Commands,
    mut requests: MessageReader<RoundRestartRequest>,
    mut controller: ResMut<BulletHazardController>,
    mut fades: ResMut<LineOfFireFades>,
    mut gate: ResMut<MovementGate>,
    mut rng: ResMut<SessionRng>,
    mut restarted: MessageWriter<RoundRestartedEvent>,
) {
    if requests.read().count() == 0 {
        return;
    }

    let cleared = controller.restart(&mut gate, &mut rng.rng);
    debug!("Bullets: restart cleared {} projectiles", cleared.len());
    clear_lines_of_fire(&mut commands, &mut fades);
    restarted.write(RoundRestartedEvent {
        game: MinigameKind::BulletHazard,
    });
}

/// Start and stop requests from scripts or the debug keys. Stopping also
/// clears the line-of-fire indicators.
pub(crate) fn handle_bullet_requests(
    mut commands: Commands,
    mut starts: MessageReader<BulletStartRequest>,
    mut stops: MessageReader<BulletStopRequest>,
    mut controller: ResMut<BulletHazardController>,
    mut fades: ResMut<LineOfFireFades>,
    mut gate: ResMut<MovementGate>,
    mut rng: ResMut<SessionRng>,
) {
    if stops.read().count() > 0 {
        let cleared = controller.stop(&mut gate);
        debug!("Bullets: stop request cleared {} projectiles", cleared.len());
        clear_lines_of_fire(&mut commands, &mut fades);
    }
    if starts.read().count() > 0 && !controller.start(&mut gate, &mut rng.rng) {
        debug!("Bullets: start request ignored");
    }
}

pub(crate) fn teardown_bullets(
    mut commands: Commands,
    controller: Option<ResMut<BulletHazardController>>,
    fades: Option<ResMut<LineOfFireFades>>,
    mut gate: ResMut<MovementGate>,
) {
    if let Some(mut fades) = fades {
        // Entities are despawned with the rest of the scene.
        fades.0.cancel_all();
        commands.remove_resource::<LineOfFireFades>();
    }
    let Some(mut controller) = controller else {
        return;
    };
    let cleared = controller.stop(&mut gate);
    debug!("Bullets: teardown cleared {} projectiles", cleared.len());
    commands.remove_resource::<BulletHazardController>();
}
