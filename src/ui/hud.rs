//! UI domain: minigame HUD (light phase, round clock, plate prompt).

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::glass_bridge::GlassBridgeController;
use crate::red_light::{ClockUrgency, LightPhase, LightPhaseChanged, RedLightController};

pub(crate) const HUD_PADDING: f32 = 16.0;

/// Marker for the HUD root column
#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct LightIndicator;

#[derive(Component)]
pub struct ClockText;

#[derive(Component)]
pub struct PlatePrompt;

pub fn phase_label(phase: LightPhase) -> &'static str {
    match phase {
        LightPhase::Green => "GREEN LIGHT",
        LightPhase::Red => "RED LIGHT",
    }
}

pub fn phase_color(phase: LightPhase) -> Color {
    match phase {
        LightPhase::Green => Color::srgb(0.2, 0.85, 0.35),
        LightPhase::Red => Color::srgb(0.9, 0.15, 0.15),
    }
}

pub fn urgency_color(urgency: ClockUrgency) -> Color {
    match urgency {
        ClockUrgency::Normal => Color::srgb(0.9, 0.9, 0.9),
        ClockUrgency::Warning => Color::srgb(0.95, 0.75, 0.2),
        ClockUrgency::Danger => Color::srgb(0.9, 0.15, 0.15),
    }
}

/// Text under the bridge progress. Plates are shown 1-based.
pub fn plate_prompt(armed: Option<usize>, current: usize, count: usize) -> String {
    match armed {
        Some(index) => format!("Plate {}/{}: Press 1 or 2 to choose", index + 1, count),
        None if current >= count => "Bridge crossed! Reach the finish".to_string(),
        None => format!("Plate {}/{}", current + 1, count),
    }
}

pub(crate) fn spawn_hud(mut commands: Commands) {
    let line = |size: f32| {
        (
            Text::new(""),
            TextFont {
                font_size: size,
                ..default()
            },
            TextColor(Color::srgb(0.9, 0.9, 0.9)),
        )
    };

    commands
        .spawn((
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(HUD_PADDING),
                top: Val::Px(HUD_PADDING),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((LightIndicator, line(36.0)));
            parent.spawn((ClockText, line(28.0)));
            parent.spawn((PlatePrompt, line(22.0)));
        });
}

pub(crate) fn update_light_indicator(
    mut changes: MessageReader<LightPhaseChanged>,
    controller: Option<Res<RedLightController>>,
    mut query: Query<(&mut Text, &mut TextColor), With<LightIndicator>>,
) {
    let Ok((mut text, mut color)) = query.single_mut() else {
        return;
    };

    if controller.is_none() {
        changes.read().count();
        if !text.0.is_empty() {
            text.0.clear();
        }
        return;
    }

    if let Some(change) = changes.read().last() {
        text.0 = phase_label(change.phase).to_string();
        color.0 = phase_color(change.phase);
    }
}

pub(crate) fn update_clock_text(
    controller: Option<Res<RedLightController>>,
    mut query: Query<(&mut Text, &mut TextColor), With<ClockText>>,
) {
    let Ok((mut text, mut color)) = query.single_mut() else {
        return;
    };

    match controller.as_deref().and_then(|c| c.clock()) {
        Some(clock) => {
            text.0 = clock.formatted();
            color.0 = urgency_color(clock.urgency());
        }
        None => {
            if !text.0.is_empty() {
                text.0.clear();
            }
        }
    }
}

pub(crate) fn update_plate_prompt(
    controller: Option<Res<GlassBridgeController>>,
    mut query: Query<&mut Text, With<PlatePrompt>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };

    let prompt = controller
        .as_deref()
        .map(|c| plate_prompt(c.armed_plate(), c.current_index(), c.plate_count()))
        .unwrap_or_default();
    if text.0 != prompt {
        text.0 = prompt;
    }
}
