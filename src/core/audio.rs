//! Core domain: audio cue dispatch.
//!
//! Controllers never touch audio directly; systems emit `AudioCueEvent`s and
//! this module turns them into one-shot players when a clip is configured.

use bevy::audio::{AudioPlayer, AudioSource, PlaybackSettings};
use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;

use crate::content::{AudioConfig, GameConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCue {
    /// Green light started; the clip is stretched to the phase duration
    GreenLight { duration: f32 },
    RedLight,
    GameOver,
    BulletSpawn,
    Hit,
    Success,
    CorrectChoice,
    WrongChoice,
}

#[derive(Debug)]
pub struct AudioCueEvent {
    pub cue: AudioCue,
}

impl Message for AudioCueEvent {}

/// Loaded clip handles. A missing entry means the cue is silent.
#[derive(Resource, Debug, Default)]
pub struct AudioLibrary {
    pub green_light: Option<Handle<AudioSource>>,
    pub red_light: Option<Handle<AudioSource>>,
    pub game_over: Option<Handle<AudioSource>>,
    pub bullet_spawn: Option<Handle<AudioSource>>,
    pub hit: Option<Handle<AudioSource>>,
    pub success: Option<Handle<AudioSource>>,
    pub correct_choice: Option<Handle<AudioSource>>,
    pub wrong_choice: Option<Handle<AudioSource>>,
}

impl AudioLibrary {
    fn handle_for(&self, cue: AudioCue) -> Option<&Handle<AudioSource>> {
        match cue {
            AudioCue::GreenLight { .. } => self.green_light.as_ref(),
            AudioCue::RedLight => self.red_light.as_ref(),
            AudioCue::GameOver => self.game_over.as_ref(),
            AudioCue::BulletSpawn => self.bullet_spawn.as_ref(),
            AudioCue::Hit => self.hit.as_ref(),
            AudioCue::Success => self.success.as_ref(),
            AudioCue::CorrectChoice => self.correct_choice.as_ref(),
            AudioCue::WrongChoice => self.wrong_choice.as_ref(),
        }
    }
}

/// Marker for the looping-length green light player so it can be cut short
/// when the light turns red.
#[derive(Component, Debug)]
pub struct GreenLightVoice;

/// Playback speed that makes a clip of `clip_secs` last `target_secs`,
/// clamped so it never sounds absurdly slow or fast.
pub fn fit_playback_speed(clip_secs: f32, target_secs: f32, min_speed: f32, max_speed: f32) -> f32 {
    if clip_secs <= 0.0 || target_secs <= 0.0 {
        return 1.0;
    }
    (clip_secs / target_secs).clamp(min_speed, max_speed)
}

pub(crate) fn load_audio_library(
    mut commands: Commands,
    config: Res<GameConfig>,
    asset_server: Res<AssetServer>,
) {
    let audio: &AudioConfig = &config.audio;
    let load = |path: &Option<String>| path.as_ref().map(|p| asset_server.load(p.clone()));

    let library = AudioLibrary {
        green_light: load(&audio.green_light),
        red_light: load(&audio.red_light),
        game_over: load(&audio.game_over),
        bullet_spawn: load(&audio.bullet_spawn),
        hit: load(&audio.hit),
        success: load(&audio.success),
        correct_choice: load(&audio.correct_choice),
        wrong_choice: load(&audio.wrong_choice),
    };

    info!(
        "Audio: {} of 8 cues configured",
        [
            &library.green_light,
            &library.red_light,
            &library.game_over,
            &library.bullet_spawn,
            &library.hit,
            &library.success,
            &library.correct_choice,
            &library.wrong_choice,
        ]
        .iter()
        .filter(|h| h.is_some())
        .count()
    );

    commands.insert_resource(library);
}

pub(crate) fn play_audio_cues(
    mut commands: Commands,
    mut cues: MessageReader<AudioCueEvent>,
    library: Option<Res<AudioLibrary>>,
    config: Res<GameConfig>,
    green_voices: Query<Entity, With<GreenLightVoice>>,
) {
    let Some(library) = library else {
        let skipped = cues.read().count();
        if skipped > 0 {
            debug!("Audio: library not loaded, skipped {} cues", skipped);
        }
        return;
    };

    for event in cues.read() {
        // Any non-green cue cuts a stretched green light short.
        if !matches!(event.cue, AudioCue::GreenLight { .. }) {
            for entity in &green_voices {
                commands.entity(entity).despawn();
            }
        }

        let Some(handle) = library.handle_for(event.cue) else {
            continue;
        };

        match event.cue {
            AudioCue::GreenLight { duration } => {
                let speed = fit_playback_speed(
                    config.audio.green_light_clip_secs,
                    duration,
                    config.audio.min_pitch,
                    config.audio.max_pitch,
                );
                debug!(
                    "Audio: green light stretched to {:.2}s at speed {:.2}",
                    duration, speed
                );
                commands.spawn((
                    GreenLightVoice,
                    AudioPlayer::new(handle.clone()),
                    PlaybackSettings::DESPAWN.with_speed(speed),
                ));
            }
            _ => {
                commands.spawn((AudioPlayer::new(handle.clone()), PlaybackSettings::DESPAWN));
            }
        }
    }
}
