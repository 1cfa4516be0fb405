//! Glass-Bridge domain: cross the bridge one plate at a time, guessing which
//! glass holds.

mod components;
mod controller;
mod systems;


pub use components::Plate;
pub use controller::{
    ChoiceResult, DEFAULT_PLATE_COUNT, GlassBridgeController, GlassBridgeSettings, GlassBridgeStep,
    PlateChoice, PlateEntry, PlateStatus,
};

use bevy::prelude::*;

use crate::core::{GameState, GameplaySet};
use crate::glass_bridge::systems::{
    read_plate_choice, restart_glass_bridge, route_bridge_contacts, setup_glass_bridge,
    teardown_glass_bridge, tick_glass_bridge,
};

pub struct GlassBridgePlugin;

impl Plugin for GlassBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), setup_glass_bridge)
            .add_systems(OnExit(GameState::Playing), teardown_glass_bridge)
            .add_systems(
                Update,
                (
                    restart_glass_bridge,
                    route_bridge_contacts,
                    read_plate_choice,
                    tick_glass_bridge,
                )
                    .chain()
                    .in_set(GameplaySet::Rules)
                    .run_if(in_state(GameState::Playing))
                    .run_if(resource_exists::<GlassBridgeController>),
            );
    }
}
