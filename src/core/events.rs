//! Core domain: messages for round flow.

use bevy::ecs::message::Message;

use crate::core::{MinigameKind, RoundOutcome};

/// A minigame round resolved. Written exactly once per round.
#[derive(Debug, Clone, Copy)]
pub struct RoundOutcomeEvent {
    pub game: MinigameKind,
    pub outcome: RoundOutcome,
}

impl Message for RoundOutcomeEvent {}

/// Ask for a scene change. An empty destination reloads the current scene.
#[derive(Debug, Clone)]
pub struct SceneTransitionRequest {
    pub destination: String,
}

impl Message for SceneTransitionRequest {}

/// A controller was reset to a fresh round without reloading the scene.
#[derive(Debug, Clone, Copy)]
pub struct RoundRestartedEvent {
    pub game: MinigameKind,
}

impl Message for RoundRestartedEvent {}

/// Ask the active minigame to reset its round in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRestartRequest;

impl Message for RoundRestartRequest {}
