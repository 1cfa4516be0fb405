//! Red-Light domain: phase change messages for presentation.

use bevy::ecs::message::Message;

use crate::red_light::LightPhase;

#[derive(Debug, Clone, Copy)]
pub struct LightPhaseChanged {
    pub phase: LightPhase,
    pub duration: f32,
}

impl Message for LightPhaseChanged {}
