//! Per-pass generation state - everything one pass produces.

use crate::geometry::{Position, PositionSet};
use crate::rooms::RoomSet;
use crate::tile::{TileId, TileSet};

use std::collections::{BTreeMap, VecDeque};

/// A batch of cells handed to the tile solver.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveJob {
    /// Shown in logs
    pub label: String,
    /// Cells to assign, in solve order
    pub targets: Vec<Position>,
    /// Candidate tiles; empty means every tile
    pub domain: Vec<TileId>,
    /// Seed for this job's solver run
    pub seed: u64,
}

/// State of one generation pass. Reset before every pass.
#[derive(Default)]
pub struct Session {
    /// Room entities
    pub rooms: RoomSet,

    /// Corridor cells
    pub corridors: PositionSet,

    /// Every room floor cell plus every corridor cell
    pub floor: PositionSet,

    /// Solver output so far
    pub tiles: BTreeMap<Position, TileId>,

    /// Cells the solver could not fill
    pub unsatisfiable: Vec<Position>,

    /// Some solver job hit its iteration cap
    pub incomplete: bool,

    /// Adjacency rules the queued jobs solve against
    pub(crate) rules: TileSet,

    /// Solver jobs waiting to run
    pub(crate) pending: VecDeque<SolveJob>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has been generated.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
            && self.corridors.is_empty()
            && self.floor.is_empty()
            && self.tiles.is_empty()
            && self.unsatisfiable.is_empty()
            && self.pending.is_empty()
            && self.rules.is_empty()
    }

    pub fn pending_jobs(&self) -> usize {
        self.pending.len()
    }
}
