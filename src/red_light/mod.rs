//! Red-Light domain: green light / red light movement detection game.

mod clock;
mod controller;
mod events;
mod systems;

#[cfg(test)]
mod tests;

pub use clock::{ClockSettings, ClockUrgency, RoundClock, format_clock};
pub use controller::{
    LightPhase, PhaseChange, RedLightController, RedLightSample, RedLightSettings, RedLightStep,
};
pub use events::LightPhaseChanged;

use bevy::prelude::*;

use crate::core::{GameState, GameplaySet};
use crate::red_light::systems::{
    restart_red_light, setup_red_light, teardown_red_light, tick_red_light,
};

pub struct RedLightPlugin;

impl Plugin for RedLightPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<LightPhaseChanged>()
            .add_systems(OnEnter(GameState::Playing), setup_red_light)
            .add_systems(OnExit(GameState::Playing), teardown_red_light)
            .add_systems(
                Update,
                (restart_red_light, tick_red_light)
                    .chain()
                    .in_set(GameplaySet::Rules)
                    .run_if(in_state(GameState::Playing))
                    .run_if(resource_exists::<RedLightController>),
            );
    }
}
