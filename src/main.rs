mod bullets;
mod content;
mod core;
#[cfg(feature = "dev-tools")]
mod debug;
mod glass_bridge;
mod movement;
mod red_light;
mod ui;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::window::WindowResolution;

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Squid Escape".to_string(),
            resolution: WindowResolution::new(1280, 720),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .add_plugins((
        core::CorePlugin,
        content::ContentPlugin,
        movement::MovementPlugin,
        red_light::RedLightPlugin,
        bullets::BulletsPlugin,
        glass_bridge::GlassBridgePlugin,
        ui::UiPlugin,
    ));

    #[cfg(feature = "dev-tools")]
    app.add_plugins(debug::DebugPlugin);

    app.run();
}
