//! Dungeon layout constants.

/// Default dungeon width
pub const DUNGEON_DEFAULT_WIDTH: i32 = 20;
/// Default dungeon height
pub const DUNGEON_DEFAULT_HEIGHT: i32 = 20;
/// Default minimum room size (both axes)
pub const DUNGEON_MIN_ROOM_SIZE: i32 = 4;
/// Default inset applied to every BSP leaf
pub const DUNGEON_ROOM_OFFSET: i32 = 1;
/// Largest accepted room inset
pub const DUNGEON_MAX_ROOM_OFFSET: i32 = 15;
/// Number of quarter points a room can be walked from
pub const MAX_CORNER_WALKS: u32 = 4;
/// Chance that a room gets a puddle painted over its floor
pub const PUDDLE_CHANCE: f64 = 0.5;
/// Default maximum room size (both axes)
pub const DUNGEON_MAX_ROOM_SIZE: i32 = 20;
/// Default lower bound of corner walks per room
pub const DEFAULT_CORNER_WALKS_MIN: u32 = 0;
/// Default upper bound of corner walks per room
pub const DEFAULT_CORNER_WALKS_MAX: u32 = 2;
/// Pixels per cell in PNG previews
pub const PREVIEW_CELL_PIXELS: u32 = 8;
