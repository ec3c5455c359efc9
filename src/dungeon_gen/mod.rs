//! Layout algorithms: space partitioning, random walks and corridor routing.
//!
//! Everything here is a pure function of its inputs and the RNG passed in;
//! the `engine` module decides how they are sequenced.

pub mod bsp;
pub mod corridors;
pub mod random_walk;

pub use bsp::{apply_offset, clamp_to_max, partition};
pub use corridors::{carve, connect, route};
pub use random_walk::{organic_floor, random_walk, run_walk, walk_from_corners, WalkParameters};
