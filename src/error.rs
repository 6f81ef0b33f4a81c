//! Centralized error types for the simulation core.
//!
//! Only construction-time operations (parsing a board, validating a maze,
//! loading configuration) can fail. Per-tick operations never return errors;
//! they log and degrade to "nothing happens this tick".

use glam::IVec2;

/// Main error type for the simulation core.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Error type for board parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0}")]
    UnknownCharacter(char),
    #[error("Board row {row} has {found} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Board is empty")]
    Empty,
}

/// Errors related to maze validation.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MapError {
    #[error("Invalid tile code {code} at index {index}")]
    InvalidTileCode { code: u8, index: usize },

    #[error("Tile data has {found} entries, expected {expected}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("Border tile at {0} is open but is not part of a portal pair")]
    OpenBorder(IVec2),

    #[error("Tunnel portals must be a single left/right pair on one row, found {0:?}")]
    InvalidPortals(Vec<IVec2>),

    #[error("Tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),

    #[error("Required landmark missing: {0}")]
    MissingLandmark(&'static str),

    #[error("Cannot spawn at {0}: the tile is blocked or outside the maze")]
    BlockedSpawn(IVec2),
}

/// Result type for simulation construction.
pub type GameResult<T> = Result<T, GameError>;
