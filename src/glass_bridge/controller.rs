//! Glass-Bridge domain: the plate sequence and its choice state machine.
//!
//! `current_index` walks forward over the plates and never moves back. A plate
//! arms the choice only when it is the current one; a correct answer advances
//! the cursor, a wrong one shatters the plate and leaves the player to fall.
//! The round fails on the hazard floor, not on the wrong answer itself.

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{
    FailureCause, FinishLine, GateHolder, MinigameKind, MovementGate, OutcomeRouting,
    RoundOutcome, RoundOutcomeReporter, RoundState, SceneTransition, finish_reached,
};

const HOLDER: GateHolder = MinigameKind::GlassBridge;

/// Length of the shipped bridge.
pub const DEFAULT_PLATE_COUNT: usize = 9;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GlassBridgeSettings {
    /// Correct label (1 or 2) for each plate, in walking order
    pub correct_choices: Vec<u8>,
    /// Center of plate 0
    pub first_plate: (f32, f32),
    /// Horizontal distance between plate centers
    pub plate_spacing: f32,
    pub plate_size: (f32, f32),
}

impl Default for GlassBridgeSettings {
    fn default() -> Self {
        Self {
            correct_choices: vec![1, 1, 2, 1, 2, 2, 1, 2, 1],
            first_plate: (410.0, -10.0),
            plate_spacing: 200.0,
            plate_size: (120.0, 20.0),
        }
    }
}

impl GlassBridgeSettings {
    pub fn plate_center(&self, index: usize) -> Vec2 {
        Vec2::new(
            self.first_plate.0 + self.plate_spacing * index as f32,
            self.first_plate.1,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateChoice {
    First,
    Second,
}

impl PlateChoice {
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            1 => Some(PlateChoice::First),
            2 => Some(PlateChoice::Second),
            _ => None,
        }
    }

    pub fn label(self) -> u8 {
        match self {
            PlateChoice::First => 1,
            PlateChoice::Second => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateStatus {
    Pending,
    Passed,
    Destroyed,
}

/// Result of the player stepping onto a plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateEntry {
    /// The current plate; waiting for a choice
    Armed,
    /// Behind the cursor
    AlreadyResolved,
    /// Past the cursor
    Ahead,
    /// Unknown plate, round over, or already armed
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceResult {
    Correct {
        passed: usize,
        next_index: usize,
        bridge_cleared: bool,
    },
    Wrong {
        destroyed: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlassBridgeStep {
    pub outcome: Option<RoundOutcome>,
    pub transition: Option<SceneTransition>,
}

#[derive(Resource, Debug)]
pub struct GlassBridgeController {
    settings: GlassBridgeSettings,
    answers: Vec<PlateChoice>,
    statuses: Vec<PlateStatus>,
    current_index: usize,
    armed: Option<usize>,
    finish: Option<FinishLine>,
    round: RoundOutcomeReporter,
}

impl GlassBridgeController {
    /// Labels outside {1, 2} are read as 1; validation has normally fixed
    /// them already.
    pub fn new(settings: GlassBridgeSettings, routing: OutcomeRouting, finish: Option<FinishLine>) -> Self {
        let answers: Vec<PlateChoice> = settings
            .correct_choices
            .iter()
            .map(|label| PlateChoice::from_label(*label).unwrap_or(PlateChoice::First))
            .collect();
        let statuses = vec![PlateStatus::Pending; answers.len()];
        Self {
            settings,
            answers,
            statuses,
            current_index: 0,
            armed: None,
            finish,
            round: RoundOutcomeReporter::new(routing),
        }
    }

    pub fn start(&mut self, gate: &mut MovementGate) {
        gate.grant(HOLDER);
        info!("GlassBridge: bridge of {} plates ready", self.plate_count());
    }

    /// Fresh round with every plate back in place.
    pub fn restart(&mut self, gate: &mut MovementGate) {
        self.round.restart();
        self.statuses.fill(PlateStatus::Pending);
        self.current_index = 0;
        self.armed = None;
        info!("GlassBridge: round restarted");
        self.start(gate);
    }

    pub fn stop(&mut self, gate: &mut MovementGate) {
        self.round.cancel();
        self.armed = None;
        gate.revoke(HOLDER);
    }

    /// The player landed on plate `index`.
    pub fn enter_plate(&mut self, index: usize, gate: &mut MovementGate) -> PlateEntry {
        if !self.round.is_active() || index >= self.plate_count() || self.armed.is_some() {
            return PlateEntry::Ignored;
        }
        if index < self.current_index {
            return PlateEntry::AlreadyResolved;
        }
        if index > self.current_index {
            debug!(
                "GlassBridge: plate {} entered ahead of plate {}",
                index, self.current_index
            );
            return PlateEntry::Ahead;
        }

        self.armed = Some(index);
        gate.disable(HOLDER);
        info!("GlassBridge: on plate {}, waiting for a choice", index);
        PlateEntry::Armed
    }

    /// The player left plate `index`. Disarms without side effects if it was
    /// waiting for a choice.
    pub fn exit_plate(&mut self, index: usize, gate: &mut MovementGate) -> bool {
        if self.armed != Some(index) {
            return false;
        }
        self.armed = None;
        gate.enable(HOLDER);
        debug!("GlassBridge: left plate {} without choosing", index);
        true
    }

    /// Arm the current plate if the player already stands on it. Its contact
    /// began while an earlier plate was armed and was reported as `Ahead`.
    pub fn arm_touched(&mut self, touched: &[usize], gate: &mut MovementGate) -> PlateEntry {
        if !touched.contains(&self.current_index) {
            return PlateEntry::Ignored;
        }
        self.enter_plate(self.current_index, gate)
    }

    pub fn choose(&mut self, choice: PlateChoice, gate: &mut MovementGate) -> Option<ChoiceResult> {
        if !self.round.is_active() {
            return None;
        }
        let index = self.armed.take()?;
        gate.enable(HOLDER);

        if self.answers[index] == choice {
            self.statuses[index] = PlateStatus::Passed;
            self.current_index = index + 1;
            let bridge_cleared = self.current_index == self.plate_count();
            info!(
                "GlassBridge: plate {} holds ({} of {})",
                index,
                self.current_index,
                self.plate_count()
            );
            Some(ChoiceResult::Correct {
                passed: index,
                next_index: self.current_index,
                bridge_cleared,
            })
        } else {
            self.statuses[index] = PlateStatus::Destroyed;
            info!("GlassBridge: plate {} shatters", index);
            Some(ChoiceResult::Wrong { destroyed: index })
        }
    }

    /// The player reached the hazard floor under the bridge.
    pub fn hit_deadly_ground(&mut self, gate: &mut MovementGate) -> Option<RoundOutcome> {
        self.resolve(RoundOutcome::Failure(FailureCause::FellOffBridge), gate)
    }

    pub fn tick(
        &mut self,
        delta: Duration,
        player_position: Option<Vec2>,
        gate: &mut MovementGate,
    ) -> GlassBridgeStep {
        let mut step = GlassBridgeStep::default();

        if !self.round.is_active() {
            step.transition = self.round.tick(delta);
            return step;
        }

        if self.is_cleared() && finish_reached(self.finish, player_position) {
            step.outcome = self.resolve(RoundOutcome::Success, gate);
        }

        step
    }

    fn resolve(&mut self, outcome: RoundOutcome, gate: &mut MovementGate) -> Option<RoundOutcome> {
        let outcome = self.round.report(outcome)?;
        self.armed = None;
        gate.disable(HOLDER);
        info!("GlassBridge: round resolved as {:?}", outcome);
        Some(outcome)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn plate_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_cleared(&self) -> bool {
        self.current_index == self.plate_count()
    }

    pub fn armed_plate(&self) -> Option<usize> {
        self.armed
    }

    pub fn status(&self, index: usize) -> Option<PlateStatus> {
        self.statuses.get(index).copied()
    }

    pub fn round_state(&self) -> RoundState {
        self.round.state()
    }

    pub fn settings(&self) -> &GlassBridgeSettings {
        &self.settings
    }
}
