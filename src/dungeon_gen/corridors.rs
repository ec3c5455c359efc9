//! Corridor routing between room centers.
//!
//! The route is a greedy nearest-neighbour tour from a random start, not a
//! spanning tree: one open path visiting each center once. Every hop is carved
//! as an L, vertical leg first.

use crate::geometry::{Position, PositionSet};
use rand::Rng;

/// Order the centers into hops `(from, to)`. `k` centers give `k - 1` hops.
pub fn route(centers: &[Position], rng: &mut impl Rng) -> Vec<(Position, Position)> {
    if centers.len() < 2 {
        return Vec::new();
    }

    let mut remaining = centers.to_vec();
    let mut current = remaining.remove(rng.gen_range(0..remaining.len()));
    let mut hops = Vec::with_capacity(remaining.len());

    while let Some(index) = closest_index(current, &remaining) {
        let next = remaining.remove(index);
        hops.push((current, next));
        current = next;
    }
    hops
}

/// Index of the center nearest to `from`. Ties keep the earliest entry.
fn closest_index(from: Position, candidates: &[Position]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let distance = from.distance(*candidate);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Carve an L-shaped corridor: move along y until level with `to`, then along x.
pub fn carve(from: Position, to: Position) -> PositionSet {
    let mut corridor = PositionSet::new();
    let mut position = from;
    corridor.insert(position);

    while position.y != to.y {
        position.y += (to.y - position.y).signum();
        corridor.insert(position);
    }
    while position.x != to.x {
        position.x += (to.x - position.x).signum();
        corridor.insert(position);
    }
    corridor
}

/// Connect all centers and return every corridor cell.
pub fn connect(centers: &[Position], rng: &mut impl Rng) -> PositionSet {
    puffin::profile_function!();

    let mut corridors = PositionSet::new();
    for (from, to) in route(centers, rng) {
        corridors.extend(carve(from, to));
    }
    corridors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    #[test]
    fn test_carve_moves_vertically_first() {
        let from = Position::new(2, 2);
        let to = Position::new(10, 10);
        let cells = carve(from, to);

        assert_eq!(cells.len(), 17);
        // Vertical leg stays on x = 2, horizontal leg stays on y = 10
        for y in 2..=10 {
            assert!(cells.contains(&Position::new(2, y)));
        }
        for x in 2..=10 {
            assert!(cells.contains(&Position::new(x, 10)));
        }
        assert!(!cells.contains(&Position::new(10, 2)));
    }

    #[test]
    fn test_carve_handles_negative_direction() {
        let cells = carve(Position::new(5, 5), Position::new(1, 3));
        assert!(cells.contains(&Position::new(5, 3)));
        assert!(cells.contains(&Position::new(1, 3)));
        assert_eq!(cells.len(), 7);
    }

    #[test]
    fn test_two_centers_route_is_single_hop() {
        let mut rng = StdRng::seed_from_u64(4);
        let centers = [Position::new(2, 2), Position::new(10, 10)];
        let hops = route(&centers, &mut rng);
        assert_eq!(hops.len(), 1);

        let cells = connect(&centers, &mut StdRng::seed_from_u64(4));
        let (from, to) = hops[0];
        assert_eq!(cells, carve(from, to));
    }

    #[test]
    fn test_route_visits_every_center_once() {
        let centers = [
            Position::new(0, 0),
            Position::new(20, 3),
            Position::new(5, 17),
            Position::new(12, 12),
            Position::new(-4, 8),
        ];
        let mut rng = StdRng::seed_from_u64(21);
        let hops = route(&centers, &mut rng);
        assert_eq!(hops.len(), centers.len() - 1);

        // Consecutive hops chain together
        for pair in hops.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        let mut visited: Vec<Position> = vec![hops[0].0];
        visited.extend(hops.iter().map(|(_, to)| *to));
        visited.sort();
        let mut expected = centers.to_vec();
        expected.sort();
        assert_eq!(visited, expected);
    }

    #[test]
    fn test_connect_is_connected_and_covers_centers() {
        let centers = [
            Position::new(3, 3),
            Position::new(15, 4),
            Position::new(9, 14),
            Position::new(2, 16),
        ];
        let cells = connect(&centers, &mut StdRng::seed_from_u64(8));
        assert!(centers.iter().all(|c| cells.contains(c)));

        let start = centers[0];
        let mut seen = PositionSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            for dir in Direction::ALL {
                let n = p.neighbor(dir);
                if cells.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        assert_eq!(seen.len(), cells.len());
    }

    #[test]
    fn test_nearest_tie_keeps_first() {
        let candidates = [Position::new(2, 0), Position::new(-2, 0), Position::new(0, 2)];
        assert_eq!(closest_index(Position::new(0, 0), &candidates), Some(0));
        assert_eq!(closest_index(Position::new(0, 0), &[]), None);
    }

    #[test]
    fn test_fewer_than_two_centers_has_no_corridor() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(connect(&[], &mut rng).is_empty());
        assert!(connect(&[Position::new(1, 1)], &mut rng).is_empty());
    }
}
