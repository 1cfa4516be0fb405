//! Debug domain: dev-tools hotkeys for fast iteration.
//!
//! - F3 toggles the info overlay
//! - F5 restarts the current round
//! - F6 skips to the next scene
//! - F7 starts or stops bullet spawning

mod state;
mod systems;


pub use state::DebugState;

use bevy::prelude::*;

use crate::core::GameState;
use crate::debug::systems::{handle_debug_hotkeys, update_debug_info_overlay, update_status_message};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>().add_systems(
            Update,
            (
                handle_debug_hotkeys.run_if(in_state(GameState::Playing)),
                update_status_message,
                update_debug_info_overlay,
            ),
        );
    }
}
