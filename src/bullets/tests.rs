use std::collections::BTreeMap;
use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::core::{
    FailureCause, FinishLine, MinigameKind, MovementGate, OutcomeRouting, RoundOutcome, RoundState,
};

const TICK: Duration = Duration::from_millis(50);

fn camera_context() -> SpawnContext {
    SpawnContext {
        camera_right_x: Some(640.0),
        player_x: Some(0.0),
    }
}

fn started(settings: BulletSettings, finish: Option<FinishLine>) -> (BulletHazardController, MovementGate, ChaCha8Rng) {
    let mut gate = MovementGate::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut controller = BulletHazardController::new(settings, OutcomeRouting::default(), finish);
    assert!(controller.start(&mut gate, &mut rng));
    (controller, gate, rng)
}

fn assert_bookkeeping(controller: &BulletHazardController) {
    let stats = controller.stats();
    assert_eq!(controller.active_count() as u64, stats.spawned - stats.removed());
}

#[test]
fn test_start_is_not_reentrant() {
    let (mut controller, mut gate, mut rng) = started(BulletSettings::default(), None);
    assert!(!controller.start(&mut gate, &mut rng));
    assert_eq!(gate.holder(), Some(MinigameKind::BulletHazard));
    assert!(controller.is_running());
}

#[test]
fn test_spawn_intervals_within_bounds() {
    let (mut controller, mut gate, mut rng) = started(BulletSettings::default(), None);

    let mut spawn_times = Vec::new();
    let mut elapsed = Duration::ZERO;
    while elapsed < Duration::from_secs(60) {
        elapsed += TICK;
        let step = controller.tick(TICK, camera_context(), None, &mut gate, &mut rng);
        if let Some(spawn) = step.spawned {
            assert_eq!(spawn.velocity, Vec2::new(-1000.0, 0.0));
            spawn_times.push(elapsed.as_secs_f32());
        }
    }

    assert!(spawn_times.len() >= 15);
    for pair in spawn_times.windows(2) {
        let gap = pair[1] - pair[0];
        // Tick quantisation can stretch a gap by one tick
        assert!(gap >= 1.0 - 1e-3 && gap <= 3.0 + 0.05 + 1e-3, "gap {}", gap);
    }
}

#[test]
fn test_scenario_c_spawns_balance_removals() {
    let settings = BulletSettings::default();
    let speed = settings.projectile_speed;
    let (mut controller, mut gate, mut rng) = started(settings.clone(), None);

    let view = Some((-640.0, 640.0));
    let player = Vec2::new(0.0, 40.0);
    let mut positions: BTreeMap<ProjectileId, Vec2> = BTreeMap::new();

    let mut elapsed = Duration::ZERO;
    let mut outcome = None;
    while elapsed < Duration::from_secs(100) {
        elapsed += TICK;
        let step = controller.tick(TICK, camera_context(), Some(player), &mut gate, &mut rng);
        if let Some(spawn) = step.spawned {
            positions.insert(spawn.id, spawn.position);
        }
        if step.outcome.is_some() {
            outcome = step.outcome;
        }

        for position in positions.values_mut() {
            position.x -= speed * TICK.as_secs_f32();
        }

        let ids: Vec<ProjectileId> = positions.keys().copied().collect();
        for id in ids {
            let Some(position) = positions.get(&id).copied() else {
                continue;
            };
            if projectile_exited(position, view, Some(player), settings.despawn_distance) {
                controller.on_projectile_exited(id);
                positions.remove(&id);
            } else if elapsed > Duration::from_secs(80) && position.x.abs() < 20.0 && outcome.is_none() {
                // The player stops dodging late in the run
                outcome = controller.on_projectile_hit_player(id, &mut gate);
                positions.remove(&id);
            }
        }
        positions.retain(|id, _| controller.is_active(*id));
        assert_bookkeeping(&controller);
    }

    assert_eq!(outcome, Some(RoundOutcome::Failure(FailureCause::BulletHit)));
    assert_eq!(controller.active_count(), 0);
    let stats = controller.stats();
    assert!(stats.spawned > 20);
    assert_eq!(stats.impacted, 1);
    assert_eq!(stats.spawned, stats.exited + stats.impacted + stats.cleared);
}

#[test]
fn test_exit_and_hit_are_mutually_exclusive() {
    let (mut controller, mut gate, mut rng) = started(BulletSettings::default(), None);
    let mut spawned = None;
    for _ in 0..100 {
        if let Some(spawn) = controller.tick(TICK, camera_context(), None, &mut gate, &mut rng).spawned {
            spawned = Some(spawn.id);
            break;
        }
    }
    let id = spawned.expect("a projectile should spawn within 5s");

    assert!(controller.on_projectile_exited(id));
    assert_eq!(controller.on_projectile_hit_player(id, &mut gate), None);
    assert!(!controller.on_projectile_exited(id));
    assert_eq!(controller.round_state(), RoundState::Active);
    assert_eq!(controller.stats().exited, 1);
    assert_eq!(controller.stats().impacted, 0);
}

#[test]
fn test_missing_camera_and_player_skips_spawns() {
    let (mut controller, mut gate, mut rng) = started(BulletSettings::default(), None);
    for _ in 0..200 {
        let step = controller.tick(TICK, SpawnContext::default(), None, &mut gate, &mut rng);
        assert!(step.spawned.is_none());
    }
    assert_eq!(controller.stats().spawned, 0);
    assert!(controller.is_running());
}

#[test]
fn test_scenario_d_finish_clears_projectiles() {
    let finish = FinishLine {
        position: Vec2::new(2800.0, 40.0),
        trigger_distance: 100.0,
    };
    let (mut controller, mut gate, mut rng) = started(BulletSettings::default(), Some(finish));

    for _ in 0..100 {
        controller.tick(TICK, camera_context(), Some(Vec2::ZERO), &mut gate, &mut rng);
    }
    assert!(controller.active_count() > 0);

    let mut successes = 0;
    for _ in 0..10 {
        let step = controller.tick(TICK, camera_context(), Some(Vec2::new(2750.0, 40.0)), &mut gate, &mut rng);
        if step.outcome == Some(RoundOutcome::Success) {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(controller.active_count(), 0);
    assert!(!controller.is_running());
    assert!(!gate.can_move());
    assert_bookkeeping(&controller);
}

#[test]
fn test_deadly_ground_fails_once() {
    let (mut controller, mut gate, _) = started(BulletSettings::default(), None);
    assert_eq!(
        controller.on_deadly_ground(&mut gate),
        Some(RoundOutcome::Failure(FailureCause::DeadlyGround))
    );
    assert_eq!(controller.on_deadly_ground(&mut gate), None);
    assert!(FailureCause::DeadlyGround.kills_player());
}

#[test]
fn test_stop_clears_without_outcome() {
    let (mut controller, mut gate, mut rng) = started(BulletSettings::default(), None);
    for _ in 0..100 {
        controller.tick(TICK, camera_context(), None, &mut gate, &mut rng);
    }
    let active = controller.active_count();
    assert!(active > 0);

    let cleared = controller.stop(&mut gate);
    assert_eq!(cleared.len(), active);
    assert_eq!(controller.active_count(), 0);
    assert_eq!(controller.round_state(), RoundState::Active);
    assert!(gate.can_move());
    assert_eq!(gate.holder(), None);

    // No more spawns once stopped
    for _ in 0..100 {
        assert!(controller.tick(TICK, camera_context(), None, &mut gate, &mut rng).spawned.is_none());
    }
}

#[test]
fn test_outcome_transition_fires_once() {
    let (mut controller, mut gate, mut rng) = started(BulletSettings::default(), None);
    controller.on_deadly_ground(&mut gate);

    let mut transitions = 0;
    for _ in 0..100 {
        let step = controller.tick(TICK, camera_context(), None, &mut gate, &mut rng);
        assert!(step.spawned.is_none());
        if step.transition.is_some() {
            transitions += 1;
        }
    }
    assert_eq!(transitions, 1);
}

#[test]
fn test_restart_resumes_spawning() {
    let (mut controller, mut gate, mut rng) = started(BulletSettings::default(), None);
    controller.on_deadly_ground(&mut gate);
    assert!(!gate.can_move());

    controller.restart(&mut gate, &mut rng);
    assert_eq!(controller.round_state(), RoundState::Active);
    assert!(controller.is_running());
    assert!(gate.can_move());

    let mut spawned = 0;
    for _ in 0..100 {
        if controller.tick(TICK, camera_context(), None, &mut gate, &mut rng).spawned.is_some() {
            spawned += 1;
        }
    }
    assert!(spawned > 0);
}

fn waiting(finish: Option<FinishLine>) -> (BulletHazardController, MovementGate, ChaCha8Rng) {
    let settings = BulletSettings {
        start_on_load: false,
        ..BulletSettings::default()
    };
    let mut gate = MovementGate::default();
    let mut controller = BulletHazardController::new(settings, OutcomeRouting::default(), finish);
    controller.wait_for_start(&mut gate);
    (controller, gate, ChaCha8Rng::seed_from_u64(42))
}

#[test]
fn test_unstarted_round_can_still_finish() {
    let finish = FinishLine {
        position: Vec2::new(2800.0, 40.0),
        trigger_distance: 100.0,
    };
    let (mut controller, mut gate, mut rng) = waiting(Some(finish));
    assert!(!controller.is_running());
    assert!(gate.can_move());

    for _ in 0..100 {
        let step = controller.tick(TICK, camera_context(), Some(Vec2::ZERO), &mut gate, &mut rng);
        assert!(step.spawned.is_none());
        assert!(step.outcome.is_none());
    }

    let step = controller.tick(TICK, camera_context(), Some(Vec2::new(2750.0, 40.0)), &mut gate, &mut rng);
    assert_eq!(step.outcome, Some(RoundOutcome::Success));
    assert_eq!(controller.stats().spawned, 0);
}

#[test]
fn test_explicit_start_begins_spawning() {
    let (mut controller, mut gate, mut rng) = waiting(None);
    assert!(controller.start(&mut gate, &mut rng));
    assert!(controller.is_running());

    let spawned = (0..100)
        .filter(|_| controller.tick(TICK, camera_context(), None, &mut gate, &mut rng).spawned.is_some())
        .count();
    assert!(spawned > 0);

    // Stop then start again resumes the schedule
    controller.stop(&mut gate);
    assert!(controller.start(&mut gate, &mut rng));
    assert!(controller.is_running());
}

#[test]
fn test_restart_keeps_waiting_when_not_started_on_load() {
    let (mut controller, mut gate, mut rng) = waiting(None);
    controller.start(&mut gate, &mut rng);
    controller.on_deadly_ground(&mut gate);

    controller.restart(&mut gate, &mut rng);
    assert_eq!(controller.round_state(), RoundState::Active);
    assert!(!controller.is_running());
    assert!(gate.can_move());
    assert_eq!(gate.holder(), Some(MinigameKind::BulletHazard));
    for _ in 0..100 {
        assert!(controller.tick(TICK, camera_context(), None, &mut gate, &mut rng).spawned.is_none());
    }
}

#[test]
fn test_stopped_round_ignores_finish() {
    let finish = FinishLine {
        position: Vec2::new(2800.0, 40.0),
        trigger_distance: 100.0,
    };
    let (mut controller, mut gate, mut rng) = started(BulletSettings::default(), Some(finish));
    controller.stop(&mut gate);
    let step = controller.tick(TICK, camera_context(), Some(Vec2::new(2750.0, 40.0)), &mut gate, &mut rng);
    assert!(step.outcome.is_none());
}

#[test]
fn test_resolve_spawn_position_modes() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let fixed = resolve_spawn_position(
        SpawnOrigin::Fixed((500.0, 40.0)),
        (0.0, 0.0),
        SpawnContext::default(),
        &mut rng,
    );
    assert_eq!(fixed, Some(Vec2::new(500.0, 40.0)));

    let jittered = resolve_spawn_position(
        SpawnOrigin::Fixed((500.0, 40.0)),
        (-10.0, 10.0),
        SpawnContext::default(),
        &mut rng,
    )
    .expect("fixed origin always resolves");
    assert!(jittered.y >= 30.0 && jittered.y <= 50.0);

    let edge = SpawnOrigin::CameraRightEdge { x_offset: 50.0 };
    let from_camera = resolve_spawn_position(edge, (20.0, 20.0), camera_context(), &mut rng);
    assert_eq!(from_camera, Some(Vec2::new(690.0, 20.0)));

    let from_player = resolve_spawn_position(
        edge,
        (20.0, 20.0),
        SpawnContext {
            camera_right_x: None,
            player_x: Some(100.0),
        },
        &mut rng,
    );
    assert_eq!(from_player, Some(Vec2::new(150.0, 20.0)));

    assert_eq!(
        resolve_spawn_position(edge, (20.0, 20.0), SpawnContext::default(), &mut rng),
        None
    );
}

#[test]
fn test_projectile_exit_rules() {
    let view = Some((-500.0, 500.0));
    // 10% of a 1000 wide view past the left edge
    assert!(!projectile_exited(Vec2::new(-550.0, 0.0), view, None, 2000.0));
    assert!(projectile_exited(Vec2::new(-601.0, 0.0), view, None, 2000.0));

    // No camera: distance from the player
    let player = Some(Vec2::ZERO);
    assert!(!projectile_exited(Vec2::new(-1999.0, 0.0), None, player, 2000.0));
    assert!(projectile_exited(Vec2::new(-2001.0, 0.0), None, player, 2000.0));

    assert!(!projectile_exited(Vec2::new(-1.0e6, 0.0), None, None, 2000.0));
}
