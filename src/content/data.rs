//! Data definitions for the game configuration file.
//!
//! These structs mirror assets/config/squid_escape.ron and are used for
//! deserialization. Every tunable the minigames read lives here; nothing is
//! computed from scene contents at runtime.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bullets::BulletSettings;
use crate::core::{DEFAULT_TRANSITION_DELAY, MinigameKind, OutcomeRouting};
use crate::glass_bridge::GlassBridgeSettings;
use crate::movement::{MovementProfile, SurfaceKind};
use crate::red_light::RedLightSettings;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Root (squid_escape.ron)
// ============================================================================

#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
pub struct GameConfig {
    pub schema_version: u32,
    /// Fixed session seed; drawn from entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    pub start_scene: String,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    pub scenes: Vec<SceneDef>,
}

impl GameConfig {
    pub fn scene(&self, name: &str) -> Option<&SceneDef> {
        self.scenes.iter().find(|s| s.name == name)
    }

    /// Scene following `name` in declaration order, wrapping around.
    pub fn next_scene_after(&self, name: &str) -> Option<&SceneDef> {
        let index = self.scenes.iter().position(|s| s.name == name)?;
        self.scenes.get((index + 1) % self.scenes.len())
    }
}

// ============================================================================
// Player
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub jump_velocity: f32,
    /// Downward acceleration applied by the movement systems
    pub gravity: f32,
    pub size: (f32, f32),
    pub spawn: (f32, f32),
    #[serde(default)]
    pub profile: MovementProfile,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 500.0,
            jump_velocity: 1000.0,
            gravity: 1962.0,
            size: (40.0, 80.0),
            spawn: (0.0, 60.0),
            profile: MovementProfile::InstantStop,
        }
    }
}

// ============================================================================
// Audio
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioConfig {
    #[serde(default)]
    pub green_light: Option<String>,
    #[serde(default)]
    pub red_light: Option<String>,
    #[serde(default)]
    pub game_over: Option<String>,
    #[serde(default)]
    pub bullet_spawn: Option<String>,
    #[serde(default)]
    pub hit: Option<String>,
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub correct_choice: Option<String>,
    #[serde(default)]
    pub wrong_choice: Option<String>,
    /// Natural length of the green light clip, used to stretch it
    pub green_light_clip_secs: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            green_light: None,
            red_light: None,
            game_over: None,
            bullet_spawn: None,
            hit: None,
            success: None,
            correct_choice: None,
            wrong_choice: None,
            green_light_clip_secs: 3.0,
            min_pitch: 0.5,
            max_pitch: 2.0,
        }
    }
}

// ============================================================================
// Scenes
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneDef {
    pub name: String,
    pub game: MinigameDef,
    /// Scene loaded after a success; empty reloads this scene
    #[serde(default)]
    pub success_scene: String,
    /// Scene loaded after a failure; empty reloads this scene
    #[serde(default)]
    pub failure_scene: String,
    #[serde(default = "default_transition_delay")]
    pub transition_delay: f32,
    /// Finish point; the round cannot be won without one
    #[serde(default)]
    pub finish: Option<(f32, f32)>,
    #[serde(default = "default_finish_distance")]
    pub finish_distance: f32,
    #[serde(default)]
    pub surfaces: Vec<SurfaceDef>,
}

impl SceneDef {
    pub fn routing(&self) -> OutcomeRouting {
        OutcomeRouting {
            success_scene: self.success_scene.clone(),
            failure_scene: self.failure_scene.clone(),
            transition_delay: self.transition_delay,
        }
    }
}

fn default_transition_delay() -> f32 {
    DEFAULT_TRANSITION_DELAY
}

/// How close to the finish point counts as reaching it.
pub const DEFAULT_FINISH_DISTANCE: f32 = 100.0;

fn default_finish_distance() -> f32 {
    DEFAULT_FINISH_DISTANCE
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum MinigameDef {
    RedLight(RedLightSettings),
    BulletHazard(BulletSettings),
    GlassBridge(GlassBridgeSettings),
}

impl MinigameDef {
    pub fn kind(&self) -> MinigameKind {
        match self {
            MinigameDef::RedLight(_) => MinigameKind::RedLight,
            MinigameDef::BulletHazard(_) => MinigameKind::BulletHazard,
            MinigameDef::GlassBridge(_) => MinigameKind::GlassBridge,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SurfaceDef {
    pub kind: SurfaceKind,
    pub center: (f32, f32),
    pub size: (f32, f32),
}

impl SurfaceDef {
    pub fn new(kind: SurfaceKind, center: (f32, f32), size: (f32, f32)) -> Self {
        Self { kind, center, size }
    }
}

// ============================================================================
// Built-in defaults (used when the config file is missing or unreadable)
// ============================================================================

impl Default for GameConfig {
    fn default() -> Self {
        let ground_strip = || SurfaceDef::new(SurfaceKind::Ground, (1400.0, -20.0), (3600.0, 40.0));

        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            seed: None,
            start_scene: "red_light".to_string(),
            player: PlayerConfig::default(),
            audio: AudioConfig::default(),
            scenes: vec![
                SceneDef {
                    name: "red_light".to_string(),
                    game: MinigameDef::RedLight(RedLightSettings::default()),
                    success_scene: "bullet_dodge".to_string(),
                    failure_scene: String::new(),
                    transition_delay: DEFAULT_TRANSITION_DELAY,
                    finish: Some((2800.0, 40.0)),
                    finish_distance: default_finish_distance(),
                    surfaces: vec![ground_strip()],
                },
                SceneDef {
                    name: "bullet_dodge".to_string(),
                    game: MinigameDef::BulletHazard(BulletSettings::default()),
                    success_scene: "glass_bridge".to_string(),
                    failure_scene: String::new(),
                    transition_delay: DEFAULT_TRANSITION_DELAY,
                    finish: Some((2800.0, 40.0)),
                    finish_distance: default_finish_distance(),
                    surfaces: vec![ground_strip()],
                },
                SceneDef {
                    name: "glass_bridge".to_string(),
                    game: MinigameDef::GlassBridge(GlassBridgeSettings::default()),
                    success_scene: "red_light".to_string(),
                    failure_scene: String::new(),
                    transition_delay: DEFAULT_TRANSITION_DELAY,
                    finish: Some((2800.0, 40.0)),
                    finish_distance: default_finish_distance(),
                    surfaces: vec![
                        SurfaceDef::new(SurfaceKind::Ground, (0.0, -20.0), (700.0, 40.0)),
                        SurfaceDef::new(SurfaceKind::Ground, (2650.0, -20.0), (700.0, 40.0)),
                        SurfaceDef::new(SurfaceKind::DeadlyGround, (1300.0, -600.0), (4000.0, 40.0)),
                    ],
                },
            ],
        }
    }
}
