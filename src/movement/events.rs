//! Movement domain: contact messages between the player and tagged surfaces.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::movement::SurfaceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Began,
    Ended,
}

/// The player started or stopped touching a `Surface` collider.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceContactEvent {
    pub surface: Entity,
    pub kind: SurfaceKind,
    pub phase: ContactPhase,
}

impl Message for SurfaceContactEvent {}
