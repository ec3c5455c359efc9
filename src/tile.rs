//! Tile variants and their adjacency rules.
//!
//! A `TileVariant` lists, per direction, which variants may sit next to it.
//! Lists are not required to be symmetric: A allowing B to its north says
//! nothing about B allowing A to its south.

use crate::error::TileSetError;
use crate::geometry::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a tile variant (and of the asset a renderer draws for it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// RGB display color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

fn default_symbol() -> char {
    '.'
}

/// One tile variant with its four adjacency lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileVariant {
    pub id: TileId,
    #[serde(default)]
    pub name: String,
    /// Variants allowed directly north of this one
    #[serde(default)]
    pub north: Vec<TileId>,
    #[serde(default)]
    pub east: Vec<TileId>,
    #[serde(default)]
    pub south: Vec<TileId>,
    #[serde(default)]
    pub west: Vec<TileId>,
    /// ASCII glyph used by `TileCanvas::to_ascii`
    #[serde(default = "default_symbol")]
    pub symbol: char,
    /// Pixel color used by `TileCanvas::to_image`
    #[serde(default)]
    pub color: Color,
}

impl TileVariant {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id: TileId(id),
            name: name.to_string(),
            north: Vec::new(),
            east: Vec::new(),
            south: Vec::new(),
            west: Vec::new(),
            symbol: default_symbol(),
            color: Color::default(),
        }
    }

    /// Set the same adjacency list for all four directions.
    pub fn allow_all(mut self, ids: &[TileId]) -> Self {
        for dir in Direction::ALL {
            *self.allowed_mut(dir) = ids.to_vec();
        }
        self
    }

    pub fn allow(mut self, direction: Direction, ids: &[TileId]) -> Self {
        *self.allowed_mut(direction) = ids.to_vec();
        self
    }

    pub fn with_display(mut self, symbol: char, color: Color) -> Self {
        self.symbol = symbol;
        self.color = color;
        self
    }

    /// Variants allowed on the `direction` side of this one.
    pub fn allowed(&self, direction: Direction) -> &[TileId] {
        match direction {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }

    fn allowed_mut(&mut self, direction: Direction) -> &mut Vec<TileId> {
        match direction {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        }
    }

    pub fn allows(&self, direction: Direction, other: TileId) -> bool {
        self.allowed(direction).contains(&other)
    }
}

/// Validated set of tile variants, indexed by id.
///
/// Deserializes from a JSON array of variants; validation runs on load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<TileVariant>", into = "Vec<TileVariant>")]
pub struct TileSet {
    variants: Vec<TileVariant>,
    index: HashMap<TileId, usize>,
}

impl TileSet {
    pub fn new(variants: Vec<TileVariant>) -> Result<Self, TileSetError> {
        let mut index = HashMap::with_capacity(variants.len());
        for (i, variant) in variants.iter().enumerate() {
            if index.insert(variant.id, i).is_some() {
                return Err(TileSetError::DuplicateTile(variant.id));
            }
        }

        for variant in &variants {
            for dir in Direction::ALL {
                if let Some(missing) = variant
                    .allowed(dir)
                    .iter()
                    .find(|id| !index.contains_key(id))
                {
                    return Err(TileSetError::UnknownNeighbor {
                        tile: variant.id,
                        neighbor: *missing,
                    });
                }
            }
        }

        Ok(Self { variants, index })
    }

    pub fn get(&self, id: TileId) -> Option<&TileVariant> {
        self.index.get(&id).map(|&i| &self.variants[i])
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.index.contains_key(&id)
    }

    /// All ids in definition order.
    pub fn ids(&self) -> Vec<TileId> {
        self.variants.iter().map(|v| v.id).collect()
    }

    pub fn variants(&self) -> &[TileVariant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl TryFrom<Vec<TileVariant>> for TileSet {
    type Error = TileSetError;

    fn try_from(variants: Vec<TileVariant>) -> Result<Self, Self::Error> {
        TileSet::new(variants)
    }
}

impl From<TileSet> for Vec<TileVariant> {
    fn from(set: TileSet) -> Self {
        set.variants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_set_indexes_variants() {
        let a = TileVariant::new(1, "a").allow_all(&[TileId(1), TileId(2)]);
        let b = TileVariant::new(2, "b").allow(Direction::North, &[TileId(1)]);
        let set = TileSet::new(vec![a, b]).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.ids(), vec![TileId(1), TileId(2)]);
        assert!(set.get(TileId(2)).unwrap().allows(Direction::North, TileId(1)));
        assert!(!set.get(TileId(2)).unwrap().allows(Direction::South, TileId(1)));
        assert!(set.get(TileId(3)).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = TileSet::new(vec![TileVariant::new(4, "x"), TileVariant::new(4, "y")]);
        assert_eq!(result.unwrap_err(), TileSetError::DuplicateTile(TileId(4)));
    }

    #[test]
    fn test_dangling_neighbor_rejected() {
        let a = TileVariant::new(1, "a").allow(Direction::East, &[TileId(9)]);
        let result = TileSet::new(vec![a]);
        assert_eq!(
            result.unwrap_err(),
            TileSetError::UnknownNeighbor {
                tile: TileId(1),
                neighbor: TileId(9)
            }
        );
    }

    #[test]
    fn test_tile_set_from_json() {
        let json = r##"[
            {"id": 1, "name": "floor", "north": [1, 2], "east": [1], "south": [1], "west": [1], "symbol": "#"},
            {"id": 2, "name": "water", "south": [1]}
        ]"##;
        let set: TileSet = serde_json::from_str(json).unwrap();
        let floor = set.get(TileId(1)).unwrap();
        assert_eq!(floor.symbol, '#');
        assert_eq!(floor.north, vec![TileId(1), TileId(2)]);
        let water = set.get(TileId(2)).unwrap();
        assert!(water.east.is_empty());
        assert_eq!(water.symbol, '.');
    }

    #[test]
    fn test_tile_set_json_rejects_dangling_reference() {
        let json = r#"[{"id": 1, "north": [5]}]"#;
        assert!(serde_json::from_str::<TileSet>(json).is_err());
    }
}
