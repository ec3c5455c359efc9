//! Integer grid geometry shared by every generation stage.
//!
//! Positions use a y-up convention: `North` is `+y`. Sets of positions are
//! `BTreeSet`s ordered row-major so every pass iterates cells in the same order
//! for a given seed.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Unique, deterministically ordered collection of cells.
pub type PositionSet = BTreeSet<Position>;

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent cell one step in `direction`.
    pub fn neighbor(self, direction: Direction) -> Self {
        self + direction.offset()
    }

    pub fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Euclidean distance between two cells.
    pub fn distance(self, other: Position) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }
}

// Row-major: bottom row first, left to right.
impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<IVec2> for Position {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Position> for IVec2 {
    fn from(p: Position) -> Self {
        p.as_ivec2()
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::ops::Add<IVec2> for Position {
    type Output = Position;

    fn add(self, rhs: IVec2) -> Position {
        Position::from(self.as_ivec2() + rhs)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions used for walks and tile adjacency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::Y,
            Direction::East => IVec2::X,
            Direction::South => IVec2::NEG_Y,
            Direction::West => IVec2::NEG_X,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// Axis-aligned integer rectangle. `max_x`/`max_y` are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from a min corner and exclusive max corner.
    pub fn from_min_max(min: Position, max: Position) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn min(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn max_x(&self) -> i32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i32 {
        self.width.max(0) * self.height.max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Exact (fractional) center, `min + size / 2`.
    pub fn center_f32(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Center cell, halves rounded to even.
    pub fn center(&self) -> Position {
        let c = self.center_f32();
        Position::new(c.x.round_ties_even() as i32, c.y.round_ties_even() as i32)
    }

    /// Check if a cell is inside this rectangle
    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.x && p.x < self.max_x() && p.y >= self.y && p.y < self.max_y()
    }

    /// Check whether two rectangles share at least one cell.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// Shrink by `offset` on every side. The result may be empty.
    pub fn inset(&self, offset: i32) -> Bounds {
        Bounds::new(
            self.x + offset,
            self.y + offset,
            self.width - 2 * offset,
            self.height - 2 * offset,
        )
    }

    /// Every cell inside the rectangle.
    pub fn positions(&self) -> PositionSet {
        let mut cells = PositionSet::new();
        for y in self.y..self.max_y() {
            for x in self.x..self.max_x() {
                cells.insert(Position::new(x, y));
            }
        }
        cells
    }

    /// The centers of the four quadrants, truncated toward zero.
    /// Order: bottom-left, bottom-right, top-left, top-right.
    pub fn quarter_points(&self) -> [Position; 4] {
        let c = self.center_f32();
        let x1 = c.x - (c.x - self.x as f32) / 2.0;
        let x2 = c.x + (self.max_x() as f32 - c.x) / 2.0;
        let y1 = c.y - (c.y - self.y as f32) / 2.0;
        let y2 = c.y + (self.max_y() as f32 - c.y) / 2.0;
        [
            Position::new(x1 as i32, y1 as i32),
            Position::new(x2 as i32, y1 as i32),
            Position::new(x1 as i32, y2 as i32),
            Position::new(x2 as i32, y2 as i32),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_center() {
        let rect = Bounds::new(0, 0, 10, 10);
        assert_eq!(rect.center(), Position::new(5, 5));

        let rect2 = Bounds::new(5, 5, 4, 6);
        assert_eq!(rect2.center(), Position::new(7, 8));

        // Halves go to the even neighbour
        let odd = Bounds::new(0, 0, 5, 5);
        assert_eq!(odd.center(), Position::new(2, 2));
        assert_eq!(Bounds::new(0, 0, 1, 1).center(), Position::new(0, 0));
        assert_eq!(Bounds::new(0, 0, 3, 7).center(), Position::new(2, 4));
    }

    #[test]
    fn test_positions_fill_whole_rectangle() {
        let rect = Bounds::new(2, 3, 4, 2);
        let cells = rect.positions();
        assert_eq!(cells.len(), 8);
        assert!(cells.iter().all(|p| rect.contains(*p)));
    }

    #[test]
    fn test_position_order_is_row_major() {
        let mut cells: Vec<Position> = vec![
            Position::new(1, 1),
            Position::new(0, 1),
            Position::new(5, 0),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![Position::new(5, 0), Position::new(0, 1), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_direction_opposites_cancel() {
        let origin = Position::new(3, -2);
        for dir in Direction::ALL {
            assert_eq!(origin.neighbor(dir).neighbor(dir.opposite()), origin);
        }
        assert_eq!(origin.neighbor(Direction::North), Position::new(3, -1));
    }

    #[test]
    fn test_inset_and_intersects() {
        let rect = Bounds::new(0, 0, 10, 6);
        let inner = rect.inset(2);
        assert_eq!(inner, Bounds::new(2, 2, 6, 2));
        assert!(rect.intersects(&inner));
        assert!(!Bounds::new(0, 0, 2, 2).intersects(&Bounds::new(2, 0, 2, 2)));
        assert!(rect.inset(3).is_empty());
    }

    #[test]
    fn test_quarter_points_inside_room() {
        let rect = Bounds::new(0, 0, 8, 8);
        let points = rect.quarter_points();
        assert_eq!(points[0], Position::new(2, 2));
        assert_eq!(points[3], Position::new(6, 6));
        assert!(points.iter().all(|p| rect.contains(*p)));
    }
}
