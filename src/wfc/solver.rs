use super::SelectionPolicy;
use crate::geometry::{Direction, Position};
use crate::tile::{TileId, TileSet};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

/// Keep the candidates that appear in `allowed`, in candidate order.
pub fn filter(candidates: &[TileId], allowed: &[TileId]) -> Vec<TileId> {
    candidates
        .iter()
        .copied()
        .filter(|candidate| allowed.contains(candidate))
        .collect()
}

/// One collapsed cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveEvent {
    Assigned { position: Position, tile: TileId },
    /// No candidate survived the neighbour checks; the cell stays empty.
    Unsatisfiable { position: Position },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveOutcome {
    /// New assignments in the order they were made
    pub assignments: Vec<(Position, TileId)>,
    pub unsatisfiable: Vec<Position>,
    /// The iteration cap stopped the run with cells left
    pub incomplete: bool,
    pub iterations: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileConstraintSolver {
    pub policy: SelectionPolicy,
    /// Cells processed before giving up; `None` means one per target
    pub iteration_cap: Option<usize>,
}

impl TileConstraintSolver {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            iteration_cap: None,
        }
    }

    pub fn with_iteration_cap(mut self, cap: Option<usize>) -> Self {
        self.iteration_cap = cap;
        self
    }

    /// Start a resumable run over `targets`.
    ///
    /// `domain` lists the candidate tiles (empty means every tile in `tiles`).
    /// Cells in `context` are already decided: they constrain their neighbours
    /// and are never reassigned, even when listed in `targets`.
    pub fn begin(
        &self,
        tiles: &TileSet,
        targets: &[Position],
        domain: &[TileId],
        context: &BTreeMap<Position, TileId>,
        rng: StdRng,
    ) -> SolverRun {
        SolverRun::new(self, tiles, targets, domain, context, rng)
    }

    /// Run to completion.
    pub fn solve(
        &self,
        tiles: &TileSet,
        targets: &[Position],
        domain: &[TileId],
        context: &BTreeMap<Position, TileId>,
        rng: StdRng,
    ) -> SolveOutcome {
        puffin::profile_function!();
        self.begin(tiles, targets, domain, context, rng).into_outcome()
    }
}

/// Min-entropy queue entry. Stale entries are skipped on pop.
#[derive(Clone, Copy, PartialEq, Eq)]
struct ScoredCell {
    entropy: usize,
    index: usize,
}

// BinaryHeap is a max-heap, so reverse for lowest entropy (then lowest index) first
impl Ord for ScoredCell {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .entropy
            .cmp(&self.entropy)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for ScoredCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

enum Frontier {
    Sequential(VecDeque<usize>),
    MinEntropy {
        heap: BinaryHeap<ScoredCell>,
        entropy: Vec<usize>,
    },
}

/// An in-progress solve. Each `next()` collapses exactly one cell.
pub struct SolverRun {
    tiles: TileSet,
    domain: Vec<TileId>,
    targets: Vec<Position>,
    index: BTreeMap<Position, usize>,
    done: Vec<bool>,
    frontier: Frontier,
    /// Context plus everything assigned so far
    assigned: BTreeMap<Position, TileId>,
    assignments: Vec<(Position, TileId)>,
    unsatisfiable: Vec<Position>,
    iteration_cap: usize,
    iterations: usize,
    incomplete: bool,
    finished: bool,
    rng: StdRng,
}

impl SolverRun {
    fn new(
        solver: &TileConstraintSolver,
        tiles: &TileSet,
        targets: &[Position],
        domain: &[TileId],
        context: &BTreeMap<Position, TileId>,
        rng: StdRng,
    ) -> Self {
        let mut unique = Vec::with_capacity(targets.len());
        let mut index = BTreeMap::new();
        for position in targets {
            if context.contains_key(position) || index.contains_key(position) {
                continue;
            }
            index.insert(*position, unique.len());
            unique.push(*position);
        }

        let domain = if domain.is_empty() {
            tiles.ids()
        } else {
            domain.to_vec()
        };

        let mut run = Self {
            tiles: tiles.clone(),
            domain,
            done: vec![false; unique.len()],
            iteration_cap: solver.iteration_cap.unwrap_or(unique.len()),
            targets: unique,
            index,
            frontier: Frontier::Sequential(VecDeque::new()),
            assigned: context.clone(),
            assignments: Vec::new(),
            unsatisfiable: Vec::new(),
            iterations: 0,
            incomplete: false,
            finished: false,
            rng,
        };

        run.frontier = match solver.policy {
            SelectionPolicy::Sequential => Frontier::Sequential((0..run.targets.len()).collect()),
            SelectionPolicy::MinEntropy => {
                let entropy: Vec<usize> = run
                    .targets
                    .iter()
                    .map(|p| run.candidates(*p).len())
                    .collect();
                let heap = entropy
                    .iter()
                    .enumerate()
                    .map(|(index, entropy)| ScoredCell {
                        entropy: *entropy,
                        index,
                    })
                    .collect();
                Frontier::MinEntropy { heap, entropy }
            }
        };
        run
    }

    /// Candidates for `position` given every neighbour assigned so far.
    ///
    /// A candidate survives a neighbour only when each of the two tiles lists
    /// the other on the facing side.
    fn candidates(&self, position: Position) -> Vec<TileId> {
        let mut candidates = self.domain.clone();
        for dir in Direction::ALL {
            let Some(&neighbor) = self.assigned.get(&position.neighbor(dir)) else {
                continue;
            };
            let Some(variant) = self.tiles.get(neighbor) else {
                continue;
            };
            candidates = filter(&candidates, variant.allowed(dir.opposite()));
            candidates.retain(|candidate| {
                self.tiles
                    .get(*candidate)
                    .map_or(false, |v| v.allows(dir, neighbor))
            });
        }
        candidates
    }

    fn pop_next(&mut self) -> Option<usize> {
        match &mut self.frontier {
            Frontier::Sequential(queue) => queue.pop_front(),
            Frontier::MinEntropy { heap, entropy } => {
                while let Some(cell) = heap.pop() {
                    if !self.done[cell.index] && entropy[cell.index] == cell.entropy {
                        return Some(cell.index);
                    }
                }
                None
            }
        }
    }

    /// Re-score unassigned cardinal neighbours after `position` collapsed.
    fn refresh_neighbors(&mut self, position: Position) {
        for dir in Direction::ALL {
            let neighbor = position.neighbor(dir);
            let Some(&index) = self.index.get(&neighbor) else {
                continue;
            };
            if self.done[index] {
                continue;
            }
            let score = self.candidates(neighbor).len();
            if let Frontier::MinEntropy { heap, entropy } = &mut self.frontier {
                entropy[index] = score;
                heap.push(ScoredCell {
                    entropy: score,
                    index,
                });
            }
        }
    }

    fn remaining(&self) -> usize {
        self.targets.len() - self.iterations
    }

    fn finish(&mut self) {
        self.finished = true;
        log::debug!(
            "tile solve finished: {} assigned, {} unsatisfiable, {} iterations",
            self.assignments.len(),
            self.unsatisfiable.len(),
            self.iterations
        );
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Context plus every tile assigned so far.
    pub fn assigned(&self) -> &BTreeMap<Position, TileId> {
        &self.assigned
    }

    /// Drive the run to the end and collect the result.
    pub fn into_outcome(mut self) -> SolveOutcome {
        while self.next().is_some() {}
        SolveOutcome {
            assignments: self.assignments,
            unsatisfiable: self.unsatisfiable,
            incomplete: self.incomplete,
            iterations: self.iterations,
        }
    }
}

impl Iterator for SolverRun {
    type Item = SolveEvent;

    fn next(&mut self) -> Option<SolveEvent> {
        if self.finished {
            return None;
        }
        if self.remaining() == 0 {
            self.finish();
            return None;
        }
        if self.iterations >= self.iteration_cap {
            self.incomplete = true;
            log::warn!(
                "tile solve hit its cap of {} iterations with {} cells left",
                self.iteration_cap,
                self.remaining()
            );
            self.finish();
            return None;
        }

        let Some(index) = self.pop_next() else {
            self.finish();
            return None;
        };
        self.done[index] = true;
        self.iterations += 1;

        let position = self.targets[index];
        let candidates = self.candidates(position);
        match candidates.choose(&mut self.rng) {
            Some(&tile) => {
                self.assigned.insert(position, tile);
                self.assignments.push((position, tile));
                self.refresh_neighbors(position);
                Some(SolveEvent::Assigned { position, tile })
            }
            None => {
                log::warn!("no tile fits {}, leaving it empty", position);
                self.unsatisfiable.push(position);
                Some(SolveEvent::Unsatisfiable { position })
            }
        }
    }
}
