//! Core domain: the single authority over whether player input is honoured.

use bevy::prelude::*;

use crate::core::outcome::MinigameKind;

/// Who currently holds the right to open and close the gate.
pub type GateHolder = MinigameKind;

/// Movement permission for the player-motion component.
///
/// Only the controller that was granted the gate may toggle it. Revoking
/// always leaves movement enabled, so a torn-down controller can never strand
/// the player.
#[derive(Resource, Debug)]
pub struct MovementGate {
    can_move: bool,
    holder: Option<GateHolder>,
}

impl Default for MovementGate {
    fn default() -> Self {
        Self {
            can_move: true,
            holder: None,
        }
    }
}

impl MovementGate {
    pub fn can_move(&self) -> bool {
        self.can_move
    }

    pub fn holder(&self) -> Option<GateHolder> {
        self.holder
    }

    /// Hand the gate to a controller. Movement starts enabled.
    pub fn grant(&mut self, holder: GateHolder) {
        if let Some(previous) = self.holder {
            if previous != holder {
                warn!(
                    "MovementGate: {:?} granted while still held by {:?}",
                    holder, previous
                );
            }
        }
        self.holder = Some(holder);
        self.can_move = true;
    }

    /// Take the gate back. Ignored if `holder` does not own it.
    pub fn revoke(&mut self, holder: GateHolder) {
        if self.holder != Some(holder) {
            return;
        }
        self.holder = None;
        self.can_move = true;
    }

    /// Returns true if the call changed the gate.
    pub fn enable(&mut self, holder: GateHolder) -> bool {
        self.set(holder, true)
    }

    /// Returns true if the call changed the gate.
    pub fn disable(&mut self, holder: GateHolder) -> bool {
        self.set(holder, false)
    }

    fn set(&mut self, holder: GateHolder, can_move: bool) -> bool {
        if self.holder != Some(holder) {
            debug!(
                "MovementGate: ignoring {:?} from non-holder {:?}",
                can_move, holder
            );
            return false;
        }
        if self.can_move == can_move {
            return false;
        }
        self.can_move = can_move;
        true
    }
}
