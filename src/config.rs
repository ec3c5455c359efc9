//! Generation settings.
//!
//! Every field has a default, so a JSON file only needs the values it changes.

use crate::constants::*;
use crate::dungeon_gen::WalkParameters;
use crate::error::ConfigError;
use crate::geometry::{Bounds, Position};
use crate::wfc::{SelectionPolicy, WfcScope};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub const fn square(size: i32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
}

/// How many quarter points each room is walked from, drawn per room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerWalks {
    pub min: u32,
    pub max: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WfcConfig {
    pub enabled: bool,
    pub policy: SelectionPolicy,
    pub scope: WfcScope,
    /// Cells processed per solver job; `None` means one per target cell
    pub iteration_cap: Option<usize>,
    /// Delay between steps when animating
    pub step_delay_ms: u64,
}

impl Default for WfcConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: SelectionPolicy::Sequential,
            scope: WfcScope::Dungeon,
            iteration_cap: None,
            step_delay_ms: WFC_DEFAULT_STEP_DELAY_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Bottom-left corner of the dungeon area
    pub origin: Position,
    pub size: Extent,
    pub min_room_size: Extent,
    /// Rooms larger than this are shrunk around their center
    pub max_room_size: Extent,
    /// Inset applied to every partition leaf
    pub room_offset: i32,
    /// Shape room floors with a random walk instead of filling the rectangle
    pub random_walk_rooms: bool,
    pub room_walk: WalkParameters,
    pub corner_walks: CornerWalks,
    pub corner_walk: WalkParameters,
    /// Chance that a room gets a puddle
    pub puddle_chance: f64,
    pub wfc: WfcConfig,
    pub seed: u64,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            origin: Position::new(0, 0),
            size: Extent {
                width: DUNGEON_DEFAULT_WIDTH,
                height: DUNGEON_DEFAULT_HEIGHT,
            },
            min_room_size: Extent::square(DUNGEON_MIN_ROOM_SIZE),
            max_room_size: Extent::square(DUNGEON_MAX_ROOM_SIZE),
            room_offset: DUNGEON_ROOM_OFFSET,
            random_walk_rooms: false,
            room_walk: WalkParameters {
                iterations: ROOM_WALK_ITERATIONS,
                walk_length: ROOM_WALK_LENGTH,
                start_randomly_each_iteration: true,
            },
            corner_walks: CornerWalks {
                min: DEFAULT_CORNER_WALKS_MIN,
                max: DEFAULT_CORNER_WALKS_MAX,
            },
            corner_walk: WalkParameters::default(),
            puddle_chance: PUDDLE_CHANCE,
            wfc: WfcConfig::default(),
            seed: 0,
        }
    }
}

impl DungeonConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The area handed to the partitioner.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.origin.x, self.origin.y, self.size.width, self.size.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Extent { width, height } = self.size;
        if width <= 0 || height <= 0 {
            return Err(ConfigError::InvalidDungeonSize { width, height });
        }

        let min = self.min_room_size;
        if min.width <= 0 || min.height <= 0 {
            return Err(ConfigError::InvalidMinRoomSize {
                width: min.width,
                height: min.height,
            });
        }

        let max = self.max_room_size;
        if max.width < min.width || max.height < min.height {
            return Err(ConfigError::MaxRoomSmallerThanMin {
                min_width: min.width,
                min_height: min.height,
                max_width: max.width,
                max_height: max.height,
            });
        }

        if !(0..=DUNGEON_MAX_ROOM_OFFSET).contains(&self.room_offset) {
            return Err(ConfigError::OffsetOutOfRange {
                offset: self.room_offset,
                max: DUNGEON_MAX_ROOM_OFFSET,
            });
        }
        // The inset must leave at least one cell in the smallest possible room
        if 2 * self.room_offset >= min.width.min(min.height) {
            return Err(ConfigError::OffsetTooLarge {
                offset: self.room_offset,
                min_width: min.width,
                min_height: min.height,
            });
        }

        let CornerWalks { min: lo, max: hi } = self.corner_walks;
        if lo > hi || hi > MAX_CORNER_WALKS {
            return Err(ConfigError::InvalidCornerWalks {
                min: lo,
                max: hi,
                limit: MAX_CORNER_WALKS,
            });
        }

        if !(0.0..=1.0).contains(&self.puddle_chance) {
            return Err(ConfigError::InvalidPuddleChance(self.puddle_chance));
        }

        if self.wfc.iteration_cap == Some(0) {
            return Err(ConfigError::ZeroIterationCap);
        }
        Ok(())
    }
}
