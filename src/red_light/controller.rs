//! Red-Light domain: the green/red phase machine and movement detector.
//!
//! The controller is plain data driven by `tick`. Each tick it advances the
//! phase timer, arms detection once the grace delay has passed in a red
//! phase, samples the player's horizontal speed, and checks the finish line.
//! It never touches the ECS; the systems feed it samples and act on the
//! returned `RedLightStep`.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{
    FailureCause, FinishLine, GateHolder, MinigameKind, MovementGate, OutcomeRouting,
    RoundOutcome, RoundOutcomeReporter, RoundState, SceneTransition, draw_duration,
    finish_reached,
};
use crate::red_light::{ClockSettings, RoundClock};

const HOLDER: GateHolder = MinigameKind::RedLight;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedLightSettings {
    pub min_green_secs: f32,
    pub max_green_secs: f32,
    pub min_red_secs: f32,
    pub max_red_secs: f32,
    /// Grace window after the light turns red before motion counts
    pub detection_delay_secs: f32,
    /// Horizontal speed above which the player is caught moving
    pub velocity_threshold: f32,
    /// Round time limit; no limit when absent
    pub clock: Option<ClockSettings>,
}

impl Default for RedLightSettings {
    fn default() -> Self {
        Self {
            min_green_secs: 2.0,
            max_green_secs: 5.0,
            min_red_secs: 1.0,
            max_red_secs: 3.0,
            detection_delay_secs: 0.5,
            velocity_threshold: 10.0,
            clock: Some(ClockSettings::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightPhase {
    Green,
    Red,
}

impl LightPhase {
    pub fn opposite(self) -> Self {
        match self {
            LightPhase::Green => LightPhase::Red,
            LightPhase::Red => LightPhase::Green,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseChange {
    pub phase: LightPhase,
    pub duration: f32,
}

/// What the world looked like this tick. `None` means the collaborator is
/// missing and the dependent check is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RedLightSample {
    pub horizontal_velocity: Option<f32>,
    pub player_position: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RedLightStep {
    pub phase_change: Option<PhaseChange>,
    /// Detection became armed on this tick
    pub detection_armed: bool,
    pub outcome: Option<RoundOutcome>,
    pub transition: Option<SceneTransition>,
}

#[derive(Resource, Debug)]
pub struct RedLightController {
    settings: RedLightSettings,
    finish: Option<FinishLine>,
    phase: LightPhase,
    phase_timer: Timer,
    phase_elapsed: Duration,
    detection_delay: Duration,
    detection_armed: bool,
    clock: Option<RoundClock>,
    round: RoundOutcomeReporter,
}

impl RedLightController {
    pub fn new(settings: RedLightSettings, routing: OutcomeRouting, finish: Option<FinishLine>) -> Self {
        let detection_delay = Duration::from_secs_f32(settings.detection_delay_secs.max(0.0));
        let clock = settings.clock.clone().map(RoundClock::new);
        Self {
            settings,
            finish,
            phase: LightPhase::Green,
            phase_timer: Timer::from_seconds(0.0, TimerMode::Once),
            phase_elapsed: Duration::ZERO,
            detection_delay,
            detection_armed: false,
            clock,
            round: RoundOutcomeReporter::new(routing),
        }
    }

    /// Take the movement gate and open with a green light.
    pub fn start<R: Rng + ?Sized>(&mut self, gate: &mut MovementGate, rng: &mut R) -> PhaseChange {
        gate.grant(HOLDER);
        self.enter_phase(LightPhase::Green, gate, rng)
    }

    /// Reset to a fresh round with a green light.
    pub fn restart<R: Rng + ?Sized>(&mut self, gate: &mut MovementGate, rng: &mut R) -> PhaseChange {
        self.round.restart();
        if let Some(clock) = self.clock.as_mut() {
            clock.reset();
        }
        info!("RedLight: round restarted");
        self.start(gate, rng)
    }

    /// Cancel everything pending and hand the gate back.
    pub fn stop(&mut self, gate: &mut MovementGate) {
        self.round.cancel();
        self.detection_armed = false;
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
        }
        gate.revoke(HOLDER);
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        delta: Duration,
        sample: RedLightSample,
        gate: &mut MovementGate,
        rng: &mut R,
    ) -> RedLightStep {
        let mut step = RedLightStep::default();

        if !self.round.is_active() {
            step.transition = self.round.tick(delta);
            return step;
        }

        let time_up = self.clock.as_mut().is_some_and(|clock| clock.tick(delta));
        if time_up {
            info!("RedLight: time is up");
            step.outcome = self.resolve(RoundOutcome::Failure(FailureCause::TimeUp), gate);
            return step;
        }

        self.phase_elapsed += delta;
        self.phase_timer.tick(delta);
        if self.phase_timer.remaining_secs() == 0.0 {
            let next = self.phase.opposite();
            step.phase_change = Some(self.enter_phase(next, gate, rng));
        }

        if self.phase == LightPhase::Red {
            if !self.detection_armed && self.phase_elapsed >= self.detection_delay {
                self.detection_armed = true;
                step.detection_armed = true;
                debug!(
                    "RedLight: detection armed {:.2}s into red",
                    self.phase_elapsed.as_secs_f32()
                );
            }

            if self.detection_armed {
                if let Some(velocity) = sample.horizontal_velocity {
                    if velocity.abs() > self.settings.velocity_threshold {
                        info!(
                            "RedLight: movement detected ({:.2} > {:.2})",
                            velocity.abs(),
                            self.settings.velocity_threshold
                        );
                        step.outcome = self.resolve(
                            RoundOutcome::Failure(FailureCause::MovementDetected),
                            gate,
                        );
                        return step;
                    }
                }
            }
        }

        if finish_reached(self.finish, sample.player_position) {
            step.outcome = self.resolve(RoundOutcome::Success, gate);
        }

        step
    }

    fn enter_phase<R: Rng + ?Sized>(
        &mut self,
        phase: LightPhase,
        gate: &mut MovementGate,
        rng: &mut R,
    ) -> PhaseChange {
        let duration = match phase {
            LightPhase::Green => draw_duration(rng, self.settings.min_green_secs, self.settings.max_green_secs),
            LightPhase::Red => draw_duration(rng, self.settings.min_red_secs, self.settings.max_red_secs),
        };

        self.phase = phase;
        self.phase_timer = Timer::from_seconds(duration, TimerMode::Once);
        self.phase_elapsed = Duration::ZERO;
        self.detection_armed = false;

        if phase == LightPhase::Green {
            gate.enable(HOLDER);
        }

        info!("RedLight: {:?} light for {:.2}s", phase, duration);
        PhaseChange { phase, duration }
    }

    fn resolve(&mut self, outcome: RoundOutcome, gate: &mut MovementGate) -> Option<RoundOutcome> {
        let outcome = self.round.report(outcome)?;
        gate.disable(HOLDER);
        self.detection_armed = false;
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
        }
        info!("RedLight: round resolved as {:?}", outcome);
        Some(outcome)
    }

    pub fn phase(&self) -> LightPhase {
        self.phase
    }

    pub fn phase_remaining_secs(&self) -> f32 {
        self.phase_timer.remaining_secs()
    }

    pub fn is_detection_armed(&self) -> bool {
        self.detection_armed
    }

    pub fn round_state(&self) -> RoundState {
        self.round.state()
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.round.outcome()
    }

    pub fn clock(&self) -> Option<&RoundClock> {
        self.clock.as_ref()
    }

    pub fn settings(&self) -> &RedLightSettings {
        &self.settings
    }
}
