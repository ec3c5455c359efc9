//! Random walks for organic floor shapes, corner blobs and puddles.

use crate::constants::{CORNER_WALK_ITERATIONS, CORNER_WALK_LENGTH, MAX_CORNER_WALKS};
use crate::geometry::{Bounds, Direction, Position, PositionSet};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a blob is walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkParameters {
    /// Number of walks unioned into one blob
    pub iterations: u32,
    /// Steps per walk
    pub walk_length: u32,
    /// Restart each walk from a random already-visited cell
    pub start_randomly_each_iteration: bool,
}

impl Default for WalkParameters {
    fn default() -> Self {
        Self {
            iterations: CORNER_WALK_ITERATIONS,
            walk_length: CORNER_WALK_LENGTH,
            start_randomly_each_iteration: true,
        }
    }
}

/// Walk `steps` cardinal steps from `start`, collecting every visited cell.
pub fn random_walk(start: Position, steps: u32, rng: &mut impl Rng) -> PositionSet {
    let mut visited = PositionSet::new();
    visited.insert(start);

    let mut current = start;
    for _ in 0..steps {
        let dir = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        current = current.neighbor(dir);
        visited.insert(current);
    }
    visited
}

/// Run `params.iterations` walks and union them.
pub fn run_walk(params: &WalkParameters, start: Position, rng: &mut impl Rng) -> PositionSet {
    let mut floor = PositionSet::new();
    let mut current = start;

    for _ in 0..params.iterations {
        let path = random_walk(current, params.walk_length, rng);
        floor.extend(path);

        if params.start_randomly_each_iteration {
            let pick = rng.gen_range(0..floor.len());
            if let Some(next) = floor.iter().nth(pick) {
                current = *next;
            }
        }
    }
    floor
}

/// Walk from `count` of the room's quarter points (clamped to 0..=4),
/// chosen in random order.
pub fn walk_from_corners(
    room: &Bounds,
    count: u32,
    params: &WalkParameters,
    rng: &mut impl Rng,
) -> PositionSet {
    let count = count.min(MAX_CORNER_WALKS) as usize;

    let mut starts = room.quarter_points();
    starts.shuffle(rng);

    let mut floor = PositionSet::new();
    for start in starts.iter().take(count) {
        floor.extend(run_walk(params, *start, rng));
    }
    floor
}

/// Organic room floor: a walk from the room center kept inside the room.
pub fn organic_floor(room: &Bounds, params: &WalkParameters, rng: &mut impl Rng) -> PositionSet {
    run_walk(params, room.center(), rng)
        .into_iter()
        .filter(|p| room.contains(*p))
        .collect()
}
