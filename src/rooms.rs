//! Room entities for one generation session.
//!
//! Rooms live in a private `hecs::World` so every pass starts from an empty
//! world and nothing outlives `RoomSet::clear`.

use crate::error::{GenerationError, Result};
use crate::geometry::{Bounds, Position, PositionSet};
use crate::theme::Theme;
use hecs::{Entity, World};
use rand::Rng;

/// Creation order of a room within the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomIndex(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomBounds(pub Bounds);

/// Center of the rectangle the room was created from. Growing the room
/// later does not move it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomCenter(pub Position);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomFloor(pub PositionSet);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomTheme(pub Theme);

/// Snapshot of one room's components.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomView {
    pub entity: Entity,
    pub index: usize,
    pub bounds: Bounds,
    pub center: Position,
    pub theme: Theme,
    pub floor: PositionSet,
}

#[derive(Default)]
pub struct RoomSet {
    world: World,
    /// Entities in creation order
    order: Vec<Entity>,
}

impl RoomSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a room whose floor is every cell of `bounds`.
    pub fn create_room(&mut self, bounds: Bounds, theme: Theme) -> Entity {
        self.create_room_with_floor(bounds, bounds.positions(), theme)
    }

    /// Spawn a room with an explicit floor (organic rooms).
    pub fn create_room_with_floor(
        &mut self,
        bounds: Bounds,
        floor: PositionSet,
        theme: Theme,
    ) -> Entity {
        let entity = self.world.spawn((
            RoomIndex(self.order.len()),
            RoomBounds(bounds),
            RoomCenter(bounds.center()),
            RoomFloor(floor),
            RoomTheme(theme),
        ));
        self.order.push(entity);
        entity
    }

    /// Spawn one full-rectangle room per bounds, each with a random room theme.
    pub fn create_rooms(&mut self, bounds_list: &[Bounds], rng: &mut impl Rng) -> Vec<Entity> {
        bounds_list
            .iter()
            .map(|bounds| self.create_room(*bounds, Theme::random_room_theme(rng)))
            .collect()
    }

    /// Merge `positions` into a room's floor and grow its bounds.
    ///
    /// Returns the new bounds. See `expand_bounds` for the growth rule.
    pub fn add_positions(&mut self, room: Entity, positions: &PositionSet) -> Result<Bounds> {
        let (bounds, floor) = self
            .world
            .query_one_mut::<(&mut RoomBounds, &mut RoomFloor)>(room)
            .map_err(|_| GenerationError::UnknownRoom(room))?;

        floor.0.extend(positions.iter().copied());
        bounds.0 = expand_bounds(bounds.0, positions);
        Ok(bounds.0)
    }

    pub fn get(&self, room: Entity) -> Option<RoomView> {
        let mut query = self
            .world
            .query_one::<(&RoomIndex, &RoomBounds, &RoomCenter, &RoomTheme, &RoomFloor)>(room)
            .ok()?;
        let (index, bounds, center, theme, floor) = query.get()?;
        Some(RoomView {
            entity: room,
            index: index.0,
            bounds: bounds.0,
            center: center.0,
            theme: theme.0,
            floor: floor.0.clone(),
        })
    }

    /// All rooms in creation order.
    pub fn rooms(&self) -> Vec<RoomView> {
        self.order.iter().filter_map(|e| self.get(*e)).collect()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    /// Creation-time center of each room, in creation order.
    pub fn centers(&self) -> Vec<Position> {
        self.order
            .iter()
            .filter_map(|e| self.world.get::<&RoomCenter>(*e).ok().map(|c| c.0))
            .collect()
    }

    /// Union of every room floor.
    pub fn floor_union(&self) -> PositionSet {
        let mut floor = PositionSet::new();
        for (_, room_floor) in self.world.query::<&RoomFloor>().iter() {
            floor.extend(room_floor.0.iter().copied());
        }
        floor
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Despawn every room.
    pub fn clear(&mut self) {
        self.world.clear();
        self.order.clear();
    }
}

/// Grow `old` to take in `positions`.
///
/// Min edges move to the smallest coordinate seen. A max edge (exclusive)
/// only moves when some coordinate is strictly greater than it, and then lands
/// one past that coordinate. A coordinate equal to the old max edge leaves it
/// in place, so such a cell stays outside the bounds.
pub fn expand_bounds(old: Bounds, positions: &PositionSet) -> Bounds {
    let mut min_x = old.x;
    let mut min_y = old.y;
    let mut max_x = old.max_x();
    let mut max_y = old.max_y();

    for p in positions {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        if p.x > max_x {
            max_x = p.x;
        }
        if p.y > max_y {
            max_y = p.y;
        }
    }

    if max_x != old.max_x() {
        max_x += 1;
    }
    if max_y != old.max_y() {
        max_y += 1;
    }

    Bounds::from_min_max(Position::new(min_x, min_y), Position::new(max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_create_rooms_fill_rectangles() {
        let mut rooms = RoomSet::new();
        let mut rng = StdRng::seed_from_u64(1);
        let entities = rooms.create_rooms(
            &[Bounds::new(0, 0, 4, 3), Bounds::new(10, 10, 5, 5)],
            &mut rng,
        );
        assert_eq!(entities.len(), 2);
        assert_eq!(rooms.len(), 2);

        let views = rooms.rooms();
        assert_eq!(views[0].floor.len(), 12);
        assert_eq!(views[1].floor.len(), 25);
        assert_eq!(views[1].index, 1);
        assert!(views.iter().all(|r| r.theme != Theme::None));
        assert_eq!(rooms.centers(), vec![Position::new(2, 2), Position::new(12, 12)]);
        assert_eq!(rooms.floor_union().len(), 37);
    }

    #[test]
    fn test_add_positions_merges_floor() {
        let mut rooms = RoomSet::new();
        let room = rooms.create_room(Bounds::new(0, 0, 4, 4), Theme::Snow);
        let extra = PositionSet::from([Position::new(1, 1), Position::new(6, 2)]);

        let bounds = rooms.add_positions(room, &extra).unwrap();
        let view = rooms.get(room).unwrap();
        assert_eq!(view.floor.len(), 17);
        assert_eq!(bounds, Bounds::new(0, 0, 7, 4));
        assert_eq!(view.bounds, bounds);
        // Growing the bounds keeps the original center
        assert_eq!(view.center, Position::new(2, 2));
        assert_eq!(rooms.centers(), vec![Position::new(2, 2)]);
    }

    #[test]
    fn test_expand_bounds_grows_min_edges() {
        let grown = expand_bounds(
            Bounds::new(0, 0, 4, 4),
            &PositionSet::from([Position::new(-2, -3)]),
        );
        assert_eq!(grown, Bounds::new(-2, -3, 6, 7));
    }

    #[test]
    fn test_expand_bounds_keeps_edge_for_cell_on_old_max() {
        // x = 4 is one past the exclusive edge of a 4-wide room; the edge stays
        let old = Bounds::new(0, 0, 4, 4);
        let grown = expand_bounds(old, &PositionSet::from([Position::new(4, 1)]));
        assert_eq!(grown, old);
        assert!(!grown.contains(Position::new(4, 1)));
    }

    #[test]
    fn test_expand_bounds_beyond_edge_lands_one_past() {
        let grown = expand_bounds(
            Bounds::new(0, 0, 4, 4),
            &PositionSet::from([Position::new(5, 9)]),
        );
        assert_eq!(grown, Bounds::new(0, 0, 6, 10));
    }

    #[test]
    fn test_add_positions_unknown_room() {
        let mut rooms = RoomSet::new();
        let room = rooms.create_room(Bounds::new(0, 0, 2, 2), Theme::Fire);
        rooms.clear();
        assert!(rooms.is_empty());
        let result = rooms.add_positions(room, &PositionSet::new());
        assert!(matches!(result, Err(GenerationError::UnknownRoom(_))));
        assert!(rooms.get(room).is_none());
    }
}
