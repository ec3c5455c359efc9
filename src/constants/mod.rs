//! Generator constants organized by domain.
//!
//! These are the defaults `DungeonConfig` and the built-in theme table start from.

mod dungeon;
mod walk;
mod wfc;

pub use dungeon::*;
pub use walk::*;
pub use wfc::*;
