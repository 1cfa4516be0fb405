//! Bullets domain: spawn schedule and the authoritative active-projectile set.
//!
//! A projectile leaves the set exactly once: by exiting the view, by hitting
//! the player, or by being cleared when the round resolves or stops. The
//! counters make that bookkeeping observable.

use std::collections::BTreeSet;
use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bullets::{SpawnContext, SpawnOrigin, resolve_spawn_position};
use crate::core::{
    FailureCause, FinishLine, GateHolder, MinigameKind, MovementGate, OutcomeRouting,
    RoundOutcome, RoundOutcomeReporter, RoundState, SceneTransition, draw_duration,
    finish_reached,
};

const HOLDER: GateHolder = MinigameKind::BulletHazard;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BulletSettings {
    /// Leftward speed of every projectile
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub min_spawn_interval: f32,
    pub max_spawn_interval: f32,
    pub origin: SpawnOrigin,
    pub y_range: (f32, f32),
    /// Exit distance from the player when no camera is available
    pub despawn_distance: f32,
    /// Begin spawning as soon as the scene loads
    pub start_on_load: bool,
    pub indicator_length: f32,
    pub indicator_fade_secs: f32,
}

impl Default for BulletSettings {
    fn default() -> Self {
        Self {
            projectile_speed: 1000.0,
            projectile_radius: 10.0,
            min_spawn_interval: 1.0,
            max_spawn_interval: 3.0,
            origin: SpawnOrigin::default(),
            y_range: (20.0, 60.0),
            despawn_distance: 2000.0,
            start_on_load: true,
            indicator_length: 2400.0,
            indicator_fade_secs: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectileId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub id: ProjectileId,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectileStats {
    pub spawned: u64,
    pub exited: u64,
    pub impacted: u64,
    /// Removed without exiting or hitting, on round end or stop
    pub cleared: u64,
}

impl ProjectileStats {
    pub fn removed(&self) -> u64 {
        self.exited + self.impacted + self.cleared
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulletStep {
    pub spawned: Option<ProjectileSpawn>,
    pub outcome: Option<RoundOutcome>,
    pub transition: Option<SceneTransition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpawnSchedule {
    /// Not started yet; no spawns, but the finish counts
    Waiting,
    Running,
    /// Stopped or resolved; nothing happens until a restart or start
    Halted,
}

#[derive(Resource, Debug)]
pub struct BulletHazardController {
    settings: BulletSettings,
    finish: Option<FinishLine>,
    round: RoundOutcomeReporter,
    schedule: SpawnSchedule,
    next_spawn: Timer,
    active: BTreeSet<ProjectileId>,
    next_id: u64,
    stats: ProjectileStats,
}

impl BulletHazardController {
    pub fn new(settings: BulletSettings, routing: OutcomeRouting, finish: Option<FinishLine>) -> Self {
        Self {
            settings,
            finish,
            round: RoundOutcomeReporter::new(routing),
            schedule: SpawnSchedule::Waiting,
            next_spawn: Timer::from_seconds(0.0, TimerMode::Once),
            active: BTreeSet::new(),
            next_id: 0,
            stats: ProjectileStats::default(),
        }
    }

    /// Hold the gate without spawning; used when the round waits for an
    /// explicit start. The finish still counts while waiting.
    pub fn wait_for_start(&mut self, gate: &mut MovementGate) {
        gate.grant(HOLDER);
        self.schedule = SpawnSchedule::Waiting;
        info!("Bullets: waiting for an explicit start");
    }

    /// Take the gate and begin the spawn schedule. Returns false if already
    /// running or the round is over.
    pub fn start<R: Rng + ?Sized>(&mut self, gate: &mut MovementGate, rng: &mut R) -> bool {
        if self.schedule == SpawnSchedule::Running || !self.round.is_active() {
            return false;
        }
        gate.grant(HOLDER);
        self.schedule = SpawnSchedule::Running;
        self.arm_next_spawn(rng);
        info!("Bullets: spawning started");
        true
    }

    /// Halt spawning and clear every projectile without an outcome. Returns
    /// the cleared ids so their entities can be despawned.
    pub fn stop(&mut self, gate: &mut MovementGate) -> Vec<ProjectileId> {
        self.schedule = SpawnSchedule::Halted;
        self.round.cancel();
        gate.revoke(HOLDER);
        let cleared = self.clear_active();
        info!("Bullets: stopped, cleared {} projectiles", cleared.len());
        cleared
    }

    /// Fresh round: projectiles cleared, counters kept. Spawning resumes
    /// only when the scene starts it on load.
    pub fn restart<R: Rng + ?Sized>(&mut self, gate: &mut MovementGate, rng: &mut R) -> Vec<ProjectileId> {
        let cleared = self.clear_active();
        self.round.restart();
        if self.settings.start_on_load {
            self.schedule = SpawnSchedule::Waiting;
            self.start(gate, rng);
        } else {
            self.wait_for_start(gate);
        }
        info!("Bullets: round restarted");
        cleared
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        delta: Duration,
        context: SpawnContext,
        player_position: Option<Vec2>,
        gate: &mut MovementGate,
        rng: &mut R,
    ) -> BulletStep {
        let mut step = BulletStep::default();

        if !self.round.is_active() {
            step.transition = self.round.tick(delta);
            return step;
        }
        if self.schedule == SpawnSchedule::Halted {
            return step;
        }

        if self.schedule == SpawnSchedule::Running {
            self.next_spawn.tick(delta);
            if self.next_spawn.remaining_secs() == 0.0 {
                step.spawned = self.spawn(context, rng);
                self.arm_next_spawn(rng);
            }
        }

        if finish_reached(self.finish, player_position) {
            step.outcome = self.resolve(RoundOutcome::Success, gate);
        }

        step
    }

    fn spawn<R: Rng + ?Sized>(&mut self, context: SpawnContext, rng: &mut R) -> Option<ProjectileSpawn> {
        let Some(position) =
            resolve_spawn_position(self.settings.origin, self.settings.y_range, context, rng)
        else {
            warn!("Bullets: no camera or player to place a projectile, skipping spawn");
            return None;
        };

        let id = ProjectileId(self.next_id);
        self.next_id += 1;
        self.active.insert(id);
        self.stats.spawned += 1;

        debug!("Bullets: spawned {:?} at {:?}", id, position);
        Some(ProjectileSpawn {
            id,
            position,
            velocity: Vec2::new(-self.settings.projectile_speed, 0.0),
        })
    }

    fn arm_next_spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let interval = draw_duration(
            rng,
            self.settings.min_spawn_interval,
            self.settings.max_spawn_interval,
        );
        self.next_spawn = Timer::from_seconds(interval, TimerMode::Once);
    }

    /// The projectile left the visible region. Returns false if it was no
    /// longer active (already removed by a hit or a clear).
    pub fn on_projectile_exited(&mut self, id: ProjectileId) -> bool {
        if !self.active.remove(&id) {
            return false;
        }
        self.stats.exited += 1;
        true
    }

    /// The projectile overlapped the player. Fails the round if the
    /// projectile was still active and the round was not already over.
    pub fn on_projectile_hit_player(
        &mut self,
        id: ProjectileId,
        gate: &mut MovementGate,
    ) -> Option<RoundOutcome> {
        if !self.active.remove(&id) {
            return None;
        }
        self.stats.impacted += 1;
        info!("Bullets: player hit by {:?}", id);
        self.resolve(RoundOutcome::Failure(FailureCause::BulletHit), gate)
    }

    /// The player touched a deadly surface.
    pub fn on_deadly_ground(&mut self, gate: &mut MovementGate) -> Option<RoundOutcome> {
        self.resolve(RoundOutcome::Failure(FailureCause::DeadlyGround), gate)
    }

    fn resolve(&mut self, outcome: RoundOutcome, gate: &mut MovementGate) -> Option<RoundOutcome> {
        let outcome = self.round.report(outcome)?;
        gate.disable(HOLDER);
        self.schedule = SpawnSchedule::Halted;
        let cleared = self.clear_active();
        info!(
            "Bullets: round resolved as {:?}, cleared {} projectiles",
            outcome,
            cleared.len()
        );
        Some(outcome)
    }

    fn clear_active(&mut self) -> Vec<ProjectileId> {
        let cleared: Vec<ProjectileId> = std::mem::take(&mut self.active).into_iter().collect();
        self.stats.cleared += cleared.len() as u64;
        cleared
    }

    pub fn is_active(&self, id: ProjectileId) -> bool {
        self.active.contains(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn stats(&self) -> ProjectileStats {
        self.stats
    }

    pub fn is_running(&self) -> bool {
        self.schedule == SpawnSchedule::Running
    }

    pub fn round_state(&self) -> RoundState {
        self.round.state()
    }

    pub fn settings(&self) -> &BulletSettings {
        &self.settings
    }
}
