//! Core domain: shared session resources.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::content::{GameConfig, SceneDef};

/// Session-wide random source. Every random draw in the game goes through it
/// so a configured seed reproduces a run.
#[derive(Resource, Debug)]
pub struct SessionRng {
    pub seed: u64,
    pub rng: ChaCha8Rng,
}

impl SessionRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Use `seed` when given, otherwise draw one from entropy.
    pub fn from_config(seed: Option<u64>) -> Self {
        Self::from_seed(seed.unwrap_or_else(|| rand::rng().random()))
    }
}

/// Name of the scene currently loaded (or about to be).
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveScene {
    pub name: String,
}

impl ActiveScene {
    pub fn def<'a>(&self, config: &'a GameConfig) -> Option<&'a SceneDef> {
        config.scene(&self.name)
    }
}

/// The player's life state, shared by the motion systems and the minigames.
#[derive(Resource, Debug, Default)]
pub struct PlayerCondition {
    dead: bool,
}

impl PlayerCondition {
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn set_dead(&mut self) {
        self.dead = true;
    }

    pub fn revive(&mut self) {
        self.dead = false;
    }
}
