//! Error taxonomy for the game core.
//!
//! Most of the simulation cannot fail: entity kinds are closed enums, so the
//! "unknown type" variants only surface when raw numeric ids are converted
//! (see the `TryFrom<u8>` impls in `entities`).  Asset failures are logged
//! and stall the loading screen rather than aborting the session.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A required asset could not be read from disk.
    #[error("failed to load asset '{}': {source}", path.display())]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown entity type {0} (expected 1..=6)")]
    UnknownEntityType(u8),

    #[error("unknown power-up type {0} (expected 1..=5)")]
    UnknownPowerUpType(u8),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type GameResult<T> = Result<T, GameError>;
