//! Core domain: round outcome bookkeeping shared by every minigame.
//!
//! A round starts `Active` and resolves exactly once into `Success` or
//! `Failure`. Once resolved, the reporter arms a delayed scene transition and
//! hands it out a single time from `tick`.

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Default wait between a resolved round and the scene transition.
pub const DEFAULT_TRANSITION_DELAY: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinigameKind {
    RedLight,
    BulletHazard,
    GlassBridge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    #[default]
    Active,
    Success,
    Failure,
}

impl RoundState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RoundState::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// Horizontal movement sampled during an armed red light
    MovementDetected,
    /// Red-light round clock ran out
    TimeUp,
    /// A projectile overlapped the player
    BulletHit,
    /// Fell through a destroyed bridge plate onto the hazard floor
    FellOffBridge,
    /// Touched a deadly surface outside the bridge game
    DeadlyGround,
}

impl FailureCause {
    /// Whether the player's dead flag should be raised for this failure.
    pub fn kills_player(self) -> bool {
        !matches!(self, FailureCause::MovementDetected | FailureCause::TimeUp)
    }

    pub fn message(self) -> &'static str {
        match self {
            FailureCause::MovementDetected => "Movement detected!",
            FailureCause::TimeUp => "Time's up!",
            FailureCause::BulletHit => "Hit by a bullet!",
            FailureCause::FellOffBridge => "Wrong choice!",
            FailureCause::DeadlyGround => "You fell!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Success,
    Failure(FailureCause),
}

impl RoundOutcome {
    pub fn state(self) -> RoundState {
        match self {
            RoundOutcome::Success => RoundState::Success,
            RoundOutcome::Failure(_) => RoundState::Failure,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RoundOutcome::Success => "Clear!",
            RoundOutcome::Failure(cause) => cause.message(),
        }
    }
}

/// Where to go after a resolved round. An empty destination reloads the
/// current scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTransition {
    pub destination: String,
}

impl SceneTransition {
    pub fn reloads_current(&self) -> bool {
        self.destination.is_empty()
    }
}

/// Destinations and delay used by a reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeRouting {
    pub success_scene: String,
    pub failure_scene: String,
    pub transition_delay: f32,
}

impl Default for OutcomeRouting {
    fn default() -> Self {
        Self {
            success_scene: String::new(),
            failure_scene: String::new(),
            transition_delay: DEFAULT_TRANSITION_DELAY,
        }
    }
}

#[derive(Debug)]
struct PendingTransition {
    timer: Timer,
    destination: String,
}

/// Per-round success/failure contract. Each report is honoured at most once
/// per round; everything after the first terminal report is a no-op.
#[derive(Debug)]
pub struct RoundOutcomeReporter {
    routing: OutcomeRouting,
    state: RoundState,
    outcome: Option<RoundOutcome>,
    pending: Option<PendingTransition>,
}

impl RoundOutcomeReporter {
    pub fn new(routing: OutcomeRouting) -> Self {
        Self {
            routing,
            state: RoundState::Active,
            outcome: None,
            pending: None,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn is_active(&self) -> bool {
        self.state == RoundState::Active
    }

    pub fn report_success(&mut self) -> Option<RoundOutcome> {
        self.report(RoundOutcome::Success)
    }

    pub fn report_failure(&mut self, cause: FailureCause) -> Option<RoundOutcome> {
        self.report(RoundOutcome::Failure(cause))
    }

    /// Resolve the round. Returns the outcome only for the call that
    /// actually resolved it.
    pub fn report(&mut self, outcome: RoundOutcome) -> Option<RoundOutcome> {
        if self.state.is_terminal() {
            return None;
        }

        self.state = outcome.state();
        self.outcome = Some(outcome);

        let destination = match outcome {
            RoundOutcome::Success => self.routing.success_scene.clone(),
            RoundOutcome::Failure(_) => self.routing.failure_scene.clone(),
        };
        self.pending = Some(PendingTransition {
            timer: Timer::from_seconds(self.routing.transition_delay.max(0.0), TimerMode::Once),
            destination,
        });

        Some(outcome)
    }

    /// Advance the post-outcome delay. Yields the transition on the tick the
    /// delay elapses and never again.
    pub fn tick(&mut self, delta: Duration) -> Option<SceneTransition> {
        let pending = self.pending.as_mut()?;
        pending.timer.tick(delta);
        if pending.timer.remaining_secs() > 0.0 {
            return None;
        }

        self.pending
            .take()
            .map(|pending| SceneTransition {
                destination: pending.destination,
            })
    }

    pub fn has_pending_transition(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop a pending transition without touching the round state.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Start a fresh round with the same routing.
    pub fn restart(&mut self) {
        self.state = RoundState::Active;
        self.outcome = None;
        self.pending = None;
    }
}

impl Default for RoundOutcomeReporter {
    fn default() -> Self {
        Self::new(OutcomeRouting::default())
    }
}
