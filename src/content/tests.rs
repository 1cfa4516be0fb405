use super::*;
use crate::bullets::SpawnOrigin;
use crate::glass_bridge::DEFAULT_PLATE_COUNT;
use crate::movement::{MovementProfile, SurfaceKind};

const SHIPPED_CONFIG: &str = include_str!("../../assets/config/squid_escape.ron");

fn minimal(game: &str) -> String {
    format!(
        r#"(
            schema_version: 1,
            start_scene: "only",
            scenes: [
                (
                    name: "only",
                    game: {},
                    finish: (500.0, 0.0),
                ),
            ],
        )"#,
        game
    )
}

fn parse(contents: &str) -> GameConfig {
    match parse_config("test.ron", contents) {
        Ok(config) => config,
        Err(e) => panic!("{}", e),
    }
}

#[test]
fn test_shipped_config_parses_cleanly() {
    let mut config = parse(SHIPPED_CONFIG);
    assert_eq!(config.schema_version, CONFIG_SCHEMA_VERSION);
    assert_eq!(config.start_scene, "red_light");
    assert_eq!(config.scenes.len(), 3);
    assert_eq!(config.player.profile, MovementProfile::InstantStop);

    let warnings = validate_config(&mut config);
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
}

#[test]
fn test_shipped_config_chains_the_three_games() {
    let config = parse(SHIPPED_CONFIG);
    let kinds: Vec<_> = config.scenes.iter().map(|s| s.game.kind()).collect();
    let defaults: Vec<_> = GameConfig::default().scenes.iter().map(|s| s.game.kind()).collect();
    assert_eq!(kinds, defaults);

    let bridge = config.scene("glass_bridge").expect("bridge scene");
    let MinigameDef::GlassBridge(settings) = &bridge.game else {
        panic!("glass_bridge should be a bridge game");
    };
    assert_eq!(settings.correct_choices, vec![1, 1, 2, 1, 2, 2, 1, 2, 1]);
    assert_eq!(bridge.success_scene, "red_light");
    assert!(bridge.surfaces.iter().any(|s| s.kind == SurfaceKind::DeadlyGround));
}

#[test]
fn test_omitted_fields_take_defaults() {
    let config = parse(&minimal("RedLight(())"));
    let scene = &config.scenes[0];
    assert_eq!(config.seed, None);
    assert_eq!(scene.transition_delay, 2.0);
    assert_eq!(scene.finish_distance, 100.0);
    assert!(scene.success_scene.is_empty());
    assert_eq!(scene.finish, Some((500.0, 0.0)));

    let MinigameDef::RedLight(settings) = &scene.game else {
        panic!("expected a red light game");
    };
    assert_eq!(settings.detection_delay_secs, 0.5);
    assert!(settings.clock.is_some());
}

#[test]
fn test_spawn_origin_variants_parse() {
    let config = parse(&minimal("BulletHazard((origin: Fixed((900.0, 30.0)), start_on_load: false))"));
    let MinigameDef::BulletHazard(settings) = &config.scenes[0].game else {
        panic!("expected a bullet game");
    };
    assert_eq!(settings.origin, SpawnOrigin::Fixed((900.0, 30.0)));
    assert!(!settings.start_on_load);
    assert_eq!(settings.min_spawn_interval, 1.0);
}

#[test]
fn test_unknown_surface_kind_is_rejected() {
    let contents = r#"(
        schema_version: 1,
        start_scene: "a",
        scenes: [
            (
                name: "a",
                game: RedLight(()),
                surfaces: [(kind: Lava, center: (0.0, 0.0), size: (1.0, 1.0))],
            ),
        ],
    )"#;
    let err = match parse_config("bad.ron", contents) {
        Ok(_) => panic!("Lava is not a surface kind"),
        Err(e) => e,
    };
    assert_eq!(err.file, "bad.ron");
    assert!(err.to_string().starts_with("Failed to load bad.ron"));
}

#[test]
fn test_missing_file_reports_io_error() {
    let result = load_config(std::path::Path::new("does/not/exist.ron"));
    assert!(matches!(result, Err(ContentLoadError { ref message, .. }) if message.starts_with("IO error")));
}

#[test]
fn test_validation_repairs_ranges_and_labels() {
    let mut config = parse(
        r#"(
            schema_version: 1,
            start_scene: "missing",
            scenes: [
                (
                    name: "light",
                    game: RedLight((min_green_secs: 6.0, max_green_secs: 2.0, detection_delay_secs: -1.0)),
                    success_scene: "bridge",
                    failure_scene: "nowhere",
                    surfaces: [(kind: Plate, center: (0.0, 0.0), size: (10.0, 10.0))],
                ),
                (
                    name: "bridge",
                    game: GlassBridge((correct_choices: [1, 3, 2, 0])),
                ),
            ],
        )"#,
    );

    let warnings = validate_config(&mut config);
    assert!(!warnings.is_empty());

    assert_eq!(config.start_scene, "light");
    let light = &config.scenes[0];
    assert_eq!(light.success_scene, "bridge");
    assert!(light.failure_scene.is_empty());
    assert_eq!(light.surfaces[0].kind, SurfaceKind::Ground);
    let MinigameDef::RedLight(settings) = &light.game else {
        panic!("expected a red light game");
    };
    assert_eq!((settings.min_green_secs, settings.max_green_secs), (2.0, 6.0));
    assert_eq!(settings.detection_delay_secs, 0.0);

    let MinigameDef::GlassBridge(settings) = &config.scenes[1].game else {
        panic!("expected a bridge game");
    };
    assert_eq!(settings.correct_choices, vec![1, 1, 2, 1]);

    for field in ["start_scene", "failure_scene", "surfaces", "green_secs", "correct_choices"] {
        assert!(
            warnings.iter().any(|w| w.field == field),
            "no warning for {}",
            field
        );
    }
}

#[test]
fn test_validation_replaces_non_finite_numbers() {
    // RON reads `NaN` directly and `1e40` overflows f32 to infinity
    let mut config = parse(
        r#"(
            schema_version: 1,
            start_scene: "light",
            player: (move_speed: NaN, jump_velocity: 1000.0, gravity: 1962.0, size: (40.0, 80.0), spawn: (0.0, 60.0)),
            scenes: [
                (
                    name: "light",
                    game: RedLight((max_green_secs: NaN, max_red_secs: 1e40, clock: (limit_secs: 1e40, countdown: true, warning_secs: 10.0))),
                    transition_delay: NaN,
                    finish: (NaN, 0.0),
                ),
                (
                    name: "bullets",
                    game: BulletHazard((max_spawn_interval: 1e40, y_range: (NaN, 60.0), indicator_fade_secs: NaN)),
                ),
            ],
        )"#,
    );
    let MinigameDef::RedLight(parsed) = &config.scenes[0].game else {
        panic!("expected a red light game");
    };
    assert!(parsed.max_green_secs.is_nan());
    assert!(parsed.max_red_secs.is_infinite());

    let warnings = validate_config(&mut config);
    for field in [
        "player.move_speed",
        "green_secs",
        "red_secs",
        "clock.limit_secs",
        "transition_delay",
        "finish",
        "spawn_interval",
        "y_range",
        "indicator_fade_secs",
    ] {
        assert!(
            warnings.iter().any(|w| w.field == field),
            "no warning for {}",
            field
        );
    }

    let red_defaults = crate::red_light::RedLightSettings::default();
    let light = &config.scenes[0];
    let MinigameDef::RedLight(settings) = &light.game else {
        panic!("expected a red light game");
    };
    assert_eq!(settings.max_green_secs, red_defaults.max_green_secs);
    assert_eq!(settings.max_red_secs, red_defaults.max_red_secs);
    let clock = settings.clock.as_ref().expect("clock kept");
    assert_eq!(clock.limit_secs, 60.0);
    assert_eq!(light.transition_delay, 2.0);
    assert_eq!(light.finish, None);
    assert_eq!(config.player.move_speed, PlayerConfig::default().move_speed);

    let bullet_defaults = crate::bullets::BulletSettings::default();
    let MinigameDef::BulletHazard(settings) = &config.scenes[1].game else {
        panic!("expected a bullet game");
    };
    assert_eq!(settings.max_spawn_interval, bullet_defaults.max_spawn_interval);
    assert_eq!(settings.y_range, bullet_defaults.y_range);
    assert_eq!(settings.indicator_fade_secs, bullet_defaults.indicator_fade_secs);

    // Everything left must be drawable without panicking
    let mut rng = crate::core::SessionRng::from_seed(1);
    let interval = crate::core::draw_duration(&mut rng.rng, settings.min_spawn_interval, settings.max_spawn_interval);
    assert!(interval.is_finite());
}

#[test]
fn test_validation_fills_empty_bridge_and_scenes() {
    let mut config = parse(&minimal("GlassBridge((correct_choices: []))"));
    validate_config(&mut config);
    let MinigameDef::GlassBridge(settings) = &config.scenes[0].game else {
        panic!("expected a bridge game");
    };
    assert_eq!(settings.correct_choices, vec![1; DEFAULT_PLATE_COUNT]);

    let mut empty = GameConfig {
        scenes: Vec::new(),
        ..GameConfig::default()
    };
    let warnings = validate_config(&mut empty);
    assert_eq!(empty.scenes.len(), 3);
    assert_eq!(warnings[0].field, "scenes");
}

#[test]
fn test_next_scene_wraps_around() {
    let config = GameConfig::default();
    let next = |name: &str| config.next_scene_after(name).map(|s| s.name.clone());
    assert_eq!(next("red_light").as_deref(), Some("bullet_dodge"));
    assert_eq!(next("glass_bridge").as_deref(), Some("red_light"));
    assert_eq!(next("unknown"), None);
}

#[test]
fn test_warning_display() {
    let warning = ConfigWarning {
        scene: "bridge".to_string(),
        field: "correct_choices",
        message: "bad".to_string(),
    };
    assert_eq!(
        warning.to_string(),
        "scene 'bridge' field 'correct_choices': bad"
    );
}
