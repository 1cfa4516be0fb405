//! Bullets domain: messages that drive the spawn schedule from outside.

use bevy::ecs::message::Message;

/// Begin spawning in a round that did not start on load.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulletStartRequest;

impl Message for BulletStartRequest {}

/// Halt spawning and clear projectiles without resolving the round.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulletStopRequest;

impl Message for BulletStopRequest {}
