/// Error types for the simulation core.
///
/// Nothing in here is fatal to a running session: `FireError` is a refused
/// trigger pull, and the other two only surface while building a session.

use thiserror::Error;

/// Why a weapon declined to fire this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FireError {
    #[error("weapon is still cooling down")]
    Cooldown,
    #[error("out of ammo")]
    OutOfAmmo,
    #[error("weapon is reloading")]
    Reloading,
    #[error("no weapon in hand")]
    NoWeapon,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("tile map has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile value {value} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, value: u8 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("invalid config: {0}")]
    Invalid(String),
}
