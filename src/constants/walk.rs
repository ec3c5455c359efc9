//! Random walk constants.

/// Walks per corner-walk run
pub const CORNER_WALK_ITERATIONS: u32 = 10;
/// Steps per corner walk
pub const CORNER_WALK_LENGTH: u32 = 10;
/// Walks per puddle
pub const PUDDLE_WALK_ITERATIONS: u32 = 1;
/// Steps per puddle walk
pub const PUDDLE_WALK_LENGTH: u32 = 8;
/// Walks per organic room floor
pub const ROOM_WALK_ITERATIONS: u32 = 20;
/// Steps per organic room walk
pub const ROOM_WALK_LENGTH: u32 = 12;
