//! UI domain: minigame HUD and outcome banner.

mod hud;
mod outcome;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::core::{GameState, GameplaySet};
use crate::ui::hud::{spawn_hud, update_clock_text, update_light_indicator, update_plate_prompt};
use crate::ui::outcome::{clear_banner_on_restart, clear_outcome_banner, show_outcome_banner};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(OnExit(GameState::Playing), clear_outcome_banner)
            .add_systems(
                Update,
                (
                    update_light_indicator,
                    update_clock_text,
                    update_plate_prompt,
                    (clear_banner_on_restart, show_outcome_banner).chain(),
                )
                    .in_set(GameplaySet::Feedback),
            );
    }
}
