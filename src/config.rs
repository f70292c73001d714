/// Static game configuration.
///
/// `GameConfig::default()` is the reference instance. A RON file can
/// override any part of it; omitted sections keep their defaults.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::dungeon::{TileMap, REFERENCE_LAYOUT};
use crate::error::ConfigError;
use crate::weapon::WeaponSpec;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            width: 800.0,
            height: 700.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Top-left of the player's box at session start.
    pub start: [f32; 2],
    pub size: f32,
    /// World units per tick, per held direction.
    pub speed: f32,
    pub max_health: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            start: [256.0, 256.0],
            size: 50.0,
            speed: 5.0,
            max_health: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub health: i32,
    pub speed: f32,
    pub size: f32,
    pub contact_damage: i32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        EnemyConfig {
            health: 100,
            speed: 3.0,
            size: 64.0,
            contact_damage: 10,
        }
    }
}

/// Where an enemy waits and how long after session start it wakes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    /// Seconds.
    pub delay: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub reload: char,
    pub switch_weapon: char,
    /// Only honoured while the game is over.
    pub restart: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            reload: 'r',
            switch_weapon: 'q',
            restart: 'r',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub tile_size: f32,
    /// Ticks per second.
    pub frame_rate: u32,
    pub camera_smoothing: f32,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub spawns: Vec<SpawnPoint>,
    pub weapons: Vec<WeaponSpec>,
    pub keys: KeyBindings,
    /// Rows of 0 (floor) and 1 (wall).
    pub tile_map: Vec<Vec<u8>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen: ScreenConfig::default(),
            tile_size: 128.0,
            frame_rate: 60,
            camera_smoothing: 0.1,
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            spawns: vec![SpawnPoint {
                x: 400.0,
                y: 300.0,
                delay: 3.0,
            }],
            weapons: WeaponSpec::reference_catalog(),
            keys: KeyBindings::default(),
            tile_map: REFERENCE_LAYOUT.iter().map(|row| row.to_vec()).collect(),
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(source: &str) -> Result<GameConfig, ConfigError> {
        let config: GameConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<GameConfig, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        GameConfig::from_ron_str(&source)
    }

    pub fn build_map(&self) -> Result<TileMap, ConfigError> {
        Ok(TileMap::from_rows(&self.tile_map, self.tile_size)?)
    }

    /// Catalog entries wrapped for sharing between players.
    pub fn catalog(&self) -> Vec<Arc<WeaponSpec>> {
        self.weapons.iter().cloned().map(Arc::new).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !positive(self.screen.width) || !positive(self.screen.height) {
            return invalid("screen dimensions must be positive");
        }
        if !positive(self.tile_size) {
            return invalid("tile_size must be positive");
        }
        if self.frame_rate == 0 {
            return invalid("frame_rate must be positive");
        }
        if !positive(self.camera_smoothing) || self.camera_smoothing > 1.0 {
            return invalid("camera_smoothing must be in (0, 1]");
        }
        if !positive(self.player.size) || !positive(self.player.speed) || self.player.max_health <= 0 {
            return invalid("player size, speed and max_health must be positive");
        }
        if !positive(self.enemy.size) || !positive(self.enemy.speed) || self.enemy.health <= 0 {
            return invalid("enemy size, speed and health must be positive");
        }
        if self.weapons.is_empty() {
            return invalid("weapon catalog is empty");
        }
        for weapon in &self.weapons {
            if !non_negative(weapon.fire_interval)
                || !non_negative(weapon.spread)
                || !non_negative(weapon.scale)
                || !positive(weapon.bullet_speed)
                || weapon.reload_time.is_nan()
            {
                return Err(ConfigError::Invalid(format!(
                    "weapon {} has a negative or NaN interval, spread or scale, or a bad bullet speed or reload time",
                    weapon.name
                )));
            }
        }

        for spawn in &self.spawns {
            if !spawn.x.is_finite() || !spawn.y.is_finite() || spawn.delay.is_nan() {
                return invalid("spawn points need finite coordinates and a delay");
            }
        }

        let map = self.build_map()?;
        let [x, y] = self.player.start;
        if !map.can_occupy(x, y, self.player.size, self.player.size) {
            return invalid("player start overlaps a wall");
        }
        Ok(())
    }
}

/// False for NaN as well as for zero and negatives.
fn positive<T: Into<f64>>(value: T) -> bool {
    value.into() > 0.0
}

fn non_negative<T: Into<f64>>(value: T) -> bool {
    value.into() >= 0.0
}
