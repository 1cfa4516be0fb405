//! Validation and auto-correction of a loaded configuration.
//!
//! Nothing here is fatal: every problem is repaired in place and reported as a
//! `ConfigWarning` so the game always starts with a playable setup.

use std::collections::HashSet;

use super::data::*;
use crate::bullets::{BulletSettings, SpawnOrigin};
use crate::core::DEFAULT_TRANSITION_DELAY;
use crate::glass_bridge::{DEFAULT_PLATE_COUNT, GlassBridgeSettings, PlateChoice};
use crate::movement::SurfaceKind;
use crate::red_light::{ClockSettings, RedLightSettings};

/// A correction applied to the configuration, with context about where.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    /// Scene name, or empty for root-level fields
    pub scene: String,
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.scene.is_empty() {
            write!(f, "'{}': {}", self.field, self.message)
        } else {
            write!(f, "scene '{}' field '{}': {}", self.scene, self.field, self.message)
        }
    }
}

struct Warnings<'a> {
    scene: &'a str,
    list: &'a mut Vec<ConfigWarning>,
}

impl Warnings<'_> {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.list.push(ConfigWarning {
            scene: self.scene.to_string(),
            field,
            message: message.into(),
        });
    }

    /// Replace NaN and infinities, which RON accepts and every timer and
    /// random range rejects.
    fn finite(&mut self, field: &'static str, value: &mut f32, fallback: f32) -> bool {
        if value.is_finite() {
            return true;
        }
        self.push(field, format!("non-finite value {} replaced with {}", value, fallback));
        *value = fallback;
        false
    }

    fn finite_pair(&mut self, field: &'static str, value: &mut (f32, f32), fallback: (f32, f32)) {
        self.finite(field, &mut value.0, fallback.0);
        self.finite(field, &mut value.1, fallback.1);
    }

    fn non_negative(&mut self, field: &'static str, value: &mut f32, fallback: f32) {
        if self.finite(field, value, fallback) && *value < 0.0 {
            self.push(field, format!("negative value {} clamped to 0", value));
            *value = 0.0;
        }
    }

    fn non_negative_pair(&mut self, field: &'static str, value: &mut (f32, f32), fallback: (f32, f32)) {
        self.non_negative(field, &mut value.0, fallback.0);
        self.non_negative(field, &mut value.1, fallback.1);
    }

    /// Repair both ends to be finite and non-negative, then swap if inverted.
    fn range(&mut self, field: &'static str, min: &mut f32, max: &mut f32, fallback: (f32, f32)) {
        self.non_negative(field, min, fallback.0);
        self.non_negative(field, max, fallback.1);
        self.ordered(field, min, max);
    }

    fn ordered(&mut self, field: &'static str, min: &mut f32, max: &mut f32) {
        if *min > *max {
            self.push(field, format!("min {} greater than max {}, swapped", min, max));
            std::mem::swap(min, max);
        }
    }
}

/// Repair `config` in place. Returns every correction made, empty when the
/// configuration was already valid.
pub fn validate_config(config: &mut GameConfig) -> Vec<ConfigWarning> {
    let mut list = Vec::new();

    if config.scenes.is_empty() {
        list.push(ConfigWarning {
            scene: String::new(),
            field: "scenes",
            message: "no scenes defined, using built-in scene set".to_string(),
        });
        config.scenes = GameConfig::default().scenes;
    }

    {
        let mut root = Warnings {
            scene: "",
            list: &mut list,
        };
        let player = PlayerConfig::default();
        root.non_negative("player.move_speed", &mut config.player.move_speed, player.move_speed);
        root.non_negative(
            "player.jump_velocity",
            &mut config.player.jump_velocity,
            player.jump_velocity,
        );
        root.finite("player.gravity", &mut config.player.gravity, player.gravity);
        root.non_negative_pair("player.size", &mut config.player.size, player.size);
        root.finite_pair("player.spawn", &mut config.player.spawn, player.spawn);

        let audio = AudioConfig::default();
        root.non_negative(
            "audio.green_light_clip_secs",
            &mut config.audio.green_light_clip_secs,
            audio.green_light_clip_secs,
        );
        root.range(
            "audio.pitch",
            &mut config.audio.min_pitch,
            &mut config.audio.max_pitch,
            (audio.min_pitch, audio.max_pitch),
        );
    }

    let known: HashSet<String> = config.scenes.iter().map(|s| s.name.clone()).collect();

    for scene in &mut config.scenes {
        let name = scene.name.clone();
        let mut warnings = Warnings {
            scene: &name,
            list: &mut list,
        };

        if !scene.success_scene.is_empty() && !known.contains(&scene.success_scene) {
            warnings.push(
                "success_scene",
                format!("unknown scene '{}', will reload current", scene.success_scene),
            );
            scene.success_scene.clear();
        }
        if !scene.failure_scene.is_empty() && !known.contains(&scene.failure_scene) {
            warnings.push(
                "failure_scene",
                format!("unknown scene '{}', will reload current", scene.failure_scene),
            );
            scene.failure_scene.clear();
        }

        warnings.non_negative(
            "transition_delay",
            &mut scene.transition_delay,
            DEFAULT_TRANSITION_DELAY,
        );
        warnings.non_negative("finish_distance", &mut scene.finish_distance, DEFAULT_FINISH_DISTANCE);
        if scene.finish.is_some_and(|(x, y)| !(x.is_finite() && y.is_finite())) {
            warnings.push("finish", "non-finite finish point removed");
            scene.finish = None;
        }

        for surface in &mut scene.surfaces {
            if surface.kind == SurfaceKind::Plate {
                warnings.push("surfaces", "plates come from the bridge sequence, treated as Ground");
                surface.kind = SurfaceKind::Ground;
            }
            warnings.finite_pair("surfaces.center", &mut surface.center, (0.0, 0.0));
            warnings.non_negative_pair("surfaces.size", &mut surface.size, (0.0, 0.0));
        }

        match &mut scene.game {
            MinigameDef::RedLight(settings) => {
                let defaults = RedLightSettings::default();
                warnings.range(
                    "green_secs",
                    &mut settings.min_green_secs,
                    &mut settings.max_green_secs,
                    (defaults.min_green_secs, defaults.max_green_secs),
                );
                warnings.range(
                    "red_secs",
                    &mut settings.min_red_secs,
                    &mut settings.max_red_secs,
                    (defaults.min_red_secs, defaults.max_red_secs),
                );
                warnings.non_negative(
                    "detection_delay_secs",
                    &mut settings.detection_delay_secs,
                    defaults.detection_delay_secs,
                );
                warnings.non_negative(
                    "velocity_threshold",
                    &mut settings.velocity_threshold,
                    defaults.velocity_threshold,
                );
                if let Some(clock) = settings.clock.as_mut() {
                    let clock_defaults = ClockSettings::default();
                    warnings.non_negative(
                        "clock.limit_secs",
                        &mut clock.limit_secs,
                        clock_defaults.limit_secs,
                    );
                    warnings.non_negative(
                        "clock.warning_secs",
                        &mut clock.warning_secs,
                        clock_defaults.warning_secs,
                    );
                }
            }
            MinigameDef::BulletHazard(settings) => {
                let defaults = BulletSettings::default();
                warnings.range(
                    "spawn_interval",
                    &mut settings.min_spawn_interval,
                    &mut settings.max_spawn_interval,
                    (defaults.min_spawn_interval, defaults.max_spawn_interval),
                );
                warnings.finite_pair("y_range", &mut settings.y_range, defaults.y_range);
                warnings.ordered("y_range", &mut settings.y_range.0, &mut settings.y_range.1);
                match &mut settings.origin {
                    SpawnOrigin::Fixed(point) => warnings.finite_pair("origin", point, (0.0, 0.0)),
                    SpawnOrigin::CameraRightEdge { x_offset } => {
                        warnings.finite("origin", x_offset, 0.0);
                    }
                }
                warnings.non_negative(
                    "projectile_speed",
                    &mut settings.projectile_speed,
                    defaults.projectile_speed,
                );
                warnings.non_negative(
                    "projectile_radius",
                    &mut settings.projectile_radius,
                    defaults.projectile_radius,
                );
                warnings.non_negative(
                    "despawn_distance",
                    &mut settings.despawn_distance,
                    defaults.despawn_distance,
                );
                warnings.non_negative(
                    "indicator_length",
                    &mut settings.indicator_length,
                    defaults.indicator_length,
                );
                warnings.non_negative(
                    "indicator_fade_secs",
                    &mut settings.indicator_fade_secs,
                    defaults.indicator_fade_secs,
                );
            }
            MinigameDef::GlassBridge(settings) => {
                let defaults = GlassBridgeSettings::default();
                warnings.finite_pair("first_plate", &mut settings.first_plate, defaults.first_plate);
                warnings.finite("plate_spacing", &mut settings.plate_spacing, defaults.plate_spacing);
                warnings.non_negative_pair("plate_size", &mut settings.plate_size, defaults.plate_size);
                if settings.correct_choices.is_empty() {
                    warnings.push(
                        "correct_choices",
                        format!("empty sequence, using {} plates of choice 1", DEFAULT_PLATE_COUNT),
                    );
                    settings.correct_choices = vec![PlateChoice::First.label(); DEFAULT_PLATE_COUNT];
                }
                for (index, label) in settings.correct_choices.iter_mut().enumerate() {
                    if PlateChoice::from_label(*label).is_none() {
                        warnings.push(
                            "correct_choices",
                            format!("plate {} has label {}, expected 1 or 2; using 1", index, label),
                        );
                        *label = PlateChoice::First.label();
                    }
                }
            }
        }
    }

    if !known.contains(&config.start_scene) {
        let fallback = config.scenes[0].name.clone();
        list.push(ConfigWarning {
            scene: String::new(),
            field: "start_scene",
            message: format!(
                "unknown scene '{}', starting at '{}'",
                config.start_scene, fallback
            ),
        });
        config.start_scene = fallback;
    }

    list
}
