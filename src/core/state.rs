//! Core domain: game state and frame ordering.

use bevy::prelude::*;

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Default)]
pub enum GameState {
    /// Configuration applied, first scene not chosen yet
    #[default]
    Boot,
    /// One-frame hop between scenes so a scene can reload itself
    Loading,
    Playing,
}

/// Per-frame ordering of gameplay systems across domains.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    /// Keyboard sampling
    Input,
    /// Physics contacts turned into domain messages
    Contacts,
    /// Minigame controllers decide phases and outcomes
    Rules,
    /// Player motion, after the gate has been updated for this frame
    Motion,
    /// Outcome bookkeeping, transitions, HUD and audio
    Feedback,
}
