//! UI domain: round outcome banner.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::core::{RoundOutcome, RoundOutcomeEvent, RoundRestartedEvent};

/// Marker for the outcome overlay
#[derive(Component)]
pub struct OutcomeBanner;

pub fn banner_color(outcome: RoundOutcome) -> Color {
    match outcome {
        RoundOutcome::Success => Color::srgb(0.3, 0.9, 0.4),
        RoundOutcome::Failure(_) => Color::srgb(0.85, 0.15, 0.15),
    }
}

fn spawn_banner(commands: &mut Commands, outcome: RoundOutcome) {
    commands
        .spawn((
            OutcomeBanner,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                bottom: Val::Px(0.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            // Above the HUD
            ZIndex(100),
        ))
        .with_child((
            Text::new(outcome.message()),
            TextFont {
                font_size: 72.0,
                ..default()
            },
            TextColor(banner_color(outcome)),
        ));
}

pub(crate) fn show_outcome_banner(
    mut commands: Commands,
    mut outcomes: MessageReader<RoundOutcomeEvent>,
    existing: Query<(), With<OutcomeBanner>>,
) {
    let Some(event) = outcomes.read().last() else {
        return;
    };
    if !existing.is_empty() {
        return;
    }
    spawn_banner(&mut commands, event.outcome);
}

pub(crate) fn clear_banner_on_restart(
    mut commands: Commands,
    mut restarted: MessageReader<RoundRestartedEvent>,
    banners: Query<Entity, With<OutcomeBanner>>,
) {
    if restarted.read().count() == 0 {
        return;
    }
    for entity in &banners {
        commands.entity(entity).despawn();
    }
}

pub(crate) fn clear_outcome_banner(mut commands: Commands, banners: Query<Entity, With<OutcomeBanner>>) {
    for entity in &banners {
        commands.entity(entity).despawn();
    }
}
