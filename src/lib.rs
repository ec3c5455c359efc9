//! Procedural dungeon generation.
//!
//! A pass partitions the area into rooms, shapes them with random walks,
//! links their centers with corridors and then fills every floor cell with a
//! tile that agrees with its neighbours. `DungeonEngine` drives the pass; it
//! reads tiles from a `ThemeCatalog` and writes through a `TileRenderer`.

pub mod config;
pub mod constants;
pub mod dungeon_gen;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod rooms;
pub mod theme;
pub mod tile;
pub mod wfc;

pub use config::{CornerWalks, DungeonConfig, Extent, WfcConfig};
pub use engine::{DungeonEngine, EngineState, GenerationReport, StepStatus};
pub use error::{CatalogError, ConfigError, GenerationError, TileSetError};
pub use geometry::{Bounds, Direction, Position, PositionSet};
pub use renderer::{Surface, TileCanvas, TileRenderer};
pub use rooms::RoomSet;
pub use theme::{Theme, ThemeCatalog, ThemeTable, TileBundle};
pub use tile::{Color, TileId, TileSet, TileVariant};
pub use wfc::{SelectionPolicy, TileConstraintSolver, WfcScope};
