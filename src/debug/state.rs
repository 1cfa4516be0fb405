//! Debug domain: dev-tools state.

use bevy::prelude::*;

/// Resource tracking debug mode state
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    /// Whether to show the info overlay (scene, gate, player)
    pub show_info: bool,
    /// Message to display temporarily, with seconds left
    pub status_message: Option<(String, f32)>,
}

impl DebugState {
    /// Set a status message that will fade after a duration
    pub fn set_message(&mut self, message: impl Into<String>, duration: f32) {
        self.status_message = Some((message.into(), duration));
    }

    /// Count the status message down; drops it once expired.
    pub fn tick_message(&mut self, delta_secs: f32) {
        if let Some((_, ref mut remaining)) = self.status_message {
            *remaining -= delta_secs;
            if *remaining <= 0.0 {
                self.status_message = None;
            }
        }
    }
}
