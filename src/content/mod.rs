//! Content domain: game configuration loading and validation.

mod data;
mod loader;
mod validation;

#[cfg(test)]
mod tests;

use std::path::Path;

use bevy::prelude::*;

pub use data::{
    AudioConfig, CONFIG_SCHEMA_VERSION, GameConfig, MinigameDef, PlayerConfig, SceneDef,
    SurfaceDef,
};
pub use loader::{CONFIG_PATH, ContentLoadError, load_config, parse_config};
pub use validation::{ConfigWarning, validate_config};

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        // Loaded synchronously so every later plugin and startup system can
        // rely on the resource being present.
        app.insert_resource(load_validated_config(Path::new(CONFIG_PATH)));
    }
}

/// Load, fall back to defaults on error, and auto-correct. Never fails.
pub fn load_validated_config(path: &Path) -> GameConfig {
    let mut config = match load_config(path) {
        Ok(config) => {
            info!("Content: loaded {} scenes from {}", config.scenes.len(), path.display());
            config
        }
        Err(e) => {
            warn!("Content: {}; using built-in configuration", e);
            GameConfig::default()
        }
    };

    if config.schema_version != CONFIG_SCHEMA_VERSION {
        warn!(
            "Content: schema_version {} does not match expected {}",
            config.schema_version, CONFIG_SCHEMA_VERSION
        );
    }

    let warnings = validate_config(&mut config);
    for warning in &warnings {
        warn!("Content: {}", warning);
    }
    if !warnings.is_empty() {
        warn!("Content: applied {} configuration corrections", warnings.len());
    }

    config
}
