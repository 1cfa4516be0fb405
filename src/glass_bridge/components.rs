//! Glass-Bridge domain: plate entities.

use bevy::prelude::*;

/// One glass plate, by position in the bridge sequence.
#[derive(Component, Debug, Clone, Copy)]
pub struct Plate {
    pub index: usize,
}
