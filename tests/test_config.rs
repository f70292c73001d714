use dungeon_shooter::config::GameConfig;
use dungeon_shooter::error::{ConfigError, MapError};

#[test]
fn defaults_are_valid() {
    let config = GameConfig::default();
    config.validate().unwrap();
    assert_eq!(config.frame_rate, 60);
    assert_eq!(config.weapons.len(), 2);
    assert_eq!(config.tile_map.len(), 9);
    assert!(config.tile_map.iter().all(|row| row.len() == 14));
}

#[test]
fn partial_override_keeps_other_defaults() {
    let config = GameConfig::from_ron_str("(frame_rate: 30, player: (speed: 8.0))").unwrap();
    assert_eq!(config.frame_rate, 30);
    assert_eq!(config.player.speed, 8.0);
    assert_eq!(config.player.size, 50.0);
    assert_eq!(config.player.start, [256.0, 256.0]);
    assert_eq!(config.screen, GameConfig::default().screen);
    assert_eq!(config.spawns, GameConfig::default().spawns);
}

#[test]
fn weapon_override_defaults_bullet_speed() {
    let source = r#"(
        weapons: [
            (name: "Shotgun", damage: 40, fire_interval: 1.0, max_ammo: 6,
             reload_time: 3.0, spread: 10.0, scale: 0.5),
        ],
    )"#;
    let config = GameConfig::from_ron_str(source).unwrap();
    assert_eq!(config.weapons.len(), 1);
    assert_eq!(config.weapons[0].name, "Shotgun");
    assert_eq!(config.weapons[0].bullet_speed, 15.0);
}

#[test]
fn key_bindings_can_be_rebound() {
    let config = GameConfig::from_ron_str("(keys: (switch_weapon: 'e'))").unwrap();
    assert_eq!(config.keys.switch_weapon, 'e');
    assert_eq!(config.keys.reload, 'r');
}

#[test]
fn zero_smoothing_is_rejected() {
    let err = GameConfig::from_ron_str("(camera_smoothing: 0.0)").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn empty_catalog_is_rejected() {
    let err = GameConfig::from_ron_str("(weapons: [])").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn ragged_map_is_rejected() {
    let err = GameConfig::from_ron_str("(tile_map: [[1, 1, 1], [1, 0]])").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Map(MapError::Ragged {
            row: 1,
            expected: 3,
            found: 2
        })
    ));
}

#[test]
fn unknown_tile_is_rejected() {
    let err = GameConfig::from_ron_str("(tile_map: [[1, 7]])").unwrap_err();
    assert!(matches!(err, ConfigError::Map(MapError::UnknownTile { value: 7, .. })));
}

#[test]
fn start_inside_a_wall_is_rejected() {
    let err = GameConfig::from_ron_str("(player: (start: (0.0, 0.0)))").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn garbage_is_a_parse_error() {
    let err = GameConfig::from_ron_str("(frame_rate: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("dungeon_shooter_{}.ron", std::process::id()));
    std::fs::write(&path, "(tile_size: 64.0, player: (start: (128.0, 128.0)))").unwrap();
    let config = GameConfig::load(&path);
    std::fs::remove_file(&path).unwrap();

    let config = config.unwrap();
    assert_eq!(config.tile_size, 64.0);
    assert_eq!(config.build_map().unwrap().world_width(), 14.0 * 64.0);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = GameConfig::load("/nonexistent/dungeon_shooter.ron").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn nan_speeds_are_rejected() {
    let mut config = GameConfig::default();
    config.enemy.speed = f32::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = GameConfig::default();
    config.player.speed = f32::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn nan_weapon_timing_is_rejected() {
    let mut config = GameConfig::default();
    config.weapons[0].fire_interval = f64::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = GameConfig::default();
    config.weapons[1].spread = f32::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn nan_smoothing_and_spawns_are_rejected() {
    let mut config = GameConfig::default();
    config.camera_smoothing = f32::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = GameConfig::default();
    config.spawns[0].x = f32::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}
