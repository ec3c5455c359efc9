//! Error types for configuration, tile data and generation passes.
//!
//! Cells that cannot be satisfied and solver runs that hit their iteration cap
//! are not errors: they are reported through `SolveOutcome` and
//! `GenerationReport`.

use crate::tile::TileId;
use thiserror::Error;

/// Rejected before any generation stage runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("dungeon size must be positive, got {width}x{height}")]
    InvalidDungeonSize { width: i32, height: i32 },

    #[error("minimum room size must be positive, got {width}x{height}")]
    InvalidMinRoomSize { width: i32, height: i32 },

    #[error("maximum room size {max_width}x{max_height} is smaller than minimum {min_width}x{min_height}")]
    MaxRoomSmallerThanMin {
        min_width: i32,
        min_height: i32,
        max_width: i32,
        max_height: i32,
    },

    #[error("room offset {offset} outside 0..={max}")]
    OffsetOutOfRange { offset: i32, max: i32 },

    #[error("room offset {offset} leaves no floor in a {min_width}x{min_height} room")]
    OffsetTooLarge {
        offset: i32,
        min_width: i32,
        min_height: i32,
    },

    #[error("corner walk range {min}..={max} is invalid (max {limit})")]
    InvalidCornerWalks { min: u32, max: u32, limit: u32 },

    #[error("puddle chance {0} must be within 0.0..=1.0")]
    InvalidPuddleChance(f64),

    #[error("iteration cap must be at least 1")]
    ZeroIterationCap,
}

/// Problems found while building a `TileSet`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TileSetError {
    #[error("tile id {0} is defined more than once")]
    DuplicateTile(TileId),

    #[error("tile {tile} lists unknown neighbour {neighbor}")]
    UnknownNeighbor { tile: TileId, neighbor: TileId },
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("theme catalog has no entry for the None theme")]
    MissingDefaultTheme,

    #[error("theme {theme} references unknown tile {tile}")]
    UnknownTile { theme: String, tile: TileId },

    #[error("invalid tile set: {0}")]
    TileSet(#[from] TileSetError),

    #[error("failed to parse theme catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A generation pass that had to stop early.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("partition produced no usable rooms inside {width}x{height}")]
    NoRooms { width: i32, height: i32 },

    #[error("room entity {0:?} is not part of this session")]
    UnknownRoom(hecs::Entity),
}

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;
