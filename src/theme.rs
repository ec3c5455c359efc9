//! Room themes and the catalog that maps them to tiles.
//!
//! The generator only reads from a `ThemeCatalog`. `ThemeTable` is the
//! in-crate implementation: a built-in table for the CLI and tests, or one
//! loaded from JSON.

use crate::constants::{PUDDLE_WALK_ITERATIONS, PUDDLE_WALK_LENGTH};
use crate::dungeon_gen::WalkParameters;
use crate::error::CatalogError;
use crate::geometry::Direction;
use crate::tile::{Color, TileId, TileSet, TileVariant};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Theme tag for a room. Corridors always use `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    None,
    Snow,
    Fire,
    Grass,
}

impl Theme {
    /// Themes a room can be given.
    pub const ROOM_THEMES: [Theme; 3] = [Theme::Snow, Theme::Fire, Theme::Grass];

    /// Pick a room theme uniformly.
    pub fn random_room_theme(rng: &mut impl Rng) -> Theme {
        *Self::ROOM_THEMES.choose(rng).unwrap_or(&Theme::None)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Theme::None => "none",
            Theme::Snow => "snow",
            Theme::Fire => "fire",
            Theme::Grass => "grass",
        };
        f.write_str(name)
    }
}

/// Tiles and walk settings a theme paints with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileBundle {
    pub floor: TileId,
    pub puddle: TileId,
    pub obstacle: TileId,
    pub decoration: TileId,
    /// Walk used to shape puddles
    #[serde(default = "default_puddle_walk")]
    pub puddle_walk: WalkParameters,
    /// Candidate tiles for the constraint solver; empty means every tile.
    #[serde(default)]
    pub possible_tiles: Vec<TileId>,
}

impl TileBundle {
    fn tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        [self.floor, self.puddle, self.obstacle, self.decoration]
            .into_iter()
            .chain(self.possible_tiles.iter().copied())
    }
}

fn default_puddle_walk() -> WalkParameters {
    WalkParameters {
        iterations: PUDDLE_WALK_ITERATIONS,
        walk_length: PUDDLE_WALK_LENGTH,
        start_randomly_each_iteration: false,
    }
}

/// Read-only lookup of per-theme data.
pub trait ThemeCatalog {
    fn tile_bundle(&self, theme: Theme) -> &TileBundle;

    fn display_color(&self, theme: Theme) -> Color;

    /// Every tile variant any theme can produce, with adjacency rules.
    fn tile_set(&self) -> &TileSet;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeEntry {
    #[serde(default)]
    pub color: Color,
    #[serde(flatten)]
    pub bundle: TileBundle,
}

#[derive(Deserialize)]
struct RawThemeTable {
    tiles: TileSet,
    themes: HashMap<Theme, ThemeEntry>,
}

/// Table-backed `ThemeCatalog`.
///
/// Themes without an entry fall back to the `None` entry, which must exist.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "RawThemeTable")]
pub struct ThemeTable {
    tiles: TileSet,
    themes: HashMap<Theme, ThemeEntry>,
    fallback: ThemeEntry,
}

impl TryFrom<RawThemeTable> for ThemeTable {
    type Error = CatalogError;

    fn try_from(raw: RawThemeTable) -> Result<Self, Self::Error> {
        ThemeTable::new(raw.tiles, raw.themes)
    }
}

impl ThemeTable {
    pub fn new(tiles: TileSet, themes: HashMap<Theme, ThemeEntry>) -> Result<Self, CatalogError> {
        let fallback = themes
            .get(&Theme::None)
            .cloned()
            .ok_or(CatalogError::MissingDefaultTheme)?;

        for (theme, entry) in &themes {
            if let Some(tile) = entry.bundle.tile_ids().find(|id| !tiles.contains(*id)) {
                return Err(CatalogError::UnknownTile {
                    theme: theme.to_string(),
                    tile,
                });
            }
        }

        Ok(Self {
            tiles,
            themes,
            fallback,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawThemeTable = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    fn entry(&self, theme: Theme) -> &ThemeEntry {
        self.themes.get(&theme).unwrap_or(&self.fallback)
    }

    /// Built-in table: four tiles per theme.
    ///
    /// Floors accept every tile on every side and every tile accepts every
    /// floor, so a floor is always a valid candidate and the solver never
    /// runs out of options with this table.
    pub fn builtin() -> Self {
        let palettes = [
            (
                Theme::None,
                0,
                Color::WHITE,
                [
                    Color::rgb(128, 128, 128),
                    Color::rgb(70, 90, 140),
                    Color::rgb(60, 60, 60),
                    Color::rgb(170, 150, 110),
                ],
            ),
            (
                Theme::Snow,
                10,
                Color::CYAN,
                [
                    Color::rgb(225, 240, 250),
                    Color::rgb(150, 200, 240),
                    Color::rgb(120, 140, 160),
                    Color::rgb(255, 255, 255),
                ],
            ),
            (
                Theme::Fire,
                20,
                Color::RED,
                [
                    Color::rgb(150, 60, 40),
                    Color::rgb(250, 120, 20),
                    Color::rgb(60, 20, 20),
                    Color::rgb(255, 200, 60),
                ],
            ),
            (
                Theme::Grass,
                30,
                Color::GREEN,
                [
                    Color::rgb(90, 160, 70),
                    Color::rgb(60, 110, 170),
                    Color::rgb(40, 80, 30),
                    Color::rgb(200, 220, 90),
                ],
            ),
        ];

        let all: Vec<TileId> = palettes
            .iter()
            .flat_map(|(_, base, _, _)| (0..4).map(move |i| TileId(base + i)))
            .collect();
        let floors: Vec<TileId> = palettes.iter().map(|(_, base, _, _)| TileId(*base)).collect();

        let mut variants = Vec::new();
        let mut themes = HashMap::new();
        for (theme, base, display, colors) in palettes {
            let floor = TileId(base);
            let puddle = TileId(base + 1);
            let obstacle = TileId(base + 2);
            let decoration = TileId(base + 3);
            let with_floors = |extra: &[TileId]| -> Vec<TileId> {
                floors.iter().chain(extra.iter()).copied().collect()
            };

            variants.push(
                TileVariant::new(floor.0, &format!("{theme}_floor"))
                    .allow_all(&all)
                    .with_display('.', colors[0]),
            );
            variants.push(
                TileVariant::new(puddle.0, &format!("{theme}_puddle"))
                    .allow_all(&with_floors(&[puddle, decoration]))
                    .with_display('~', colors[1]),
            );
            // Obstacles may stack upward but never sideways.
            variants.push(
                TileVariant::new(obstacle.0, &format!("{theme}_obstacle"))
                    .allow_all(&with_floors(&[decoration]))
                    .allow(Direction::North, &with_floors(&[obstacle, decoration]))
                    .with_display('#', colors[2]),
            );
            variants.push(
                TileVariant::new(decoration.0, &format!("{theme}_decoration"))
                    .allow_all(&with_floors(&[puddle, obstacle]))
                    .with_display('*', colors[3]),
            );

            themes.insert(
                theme,
                ThemeEntry {
                    color: display,
                    bundle: TileBundle {
                        floor,
                        puddle,
                        obstacle,
                        decoration,
                        puddle_walk: default_puddle_walk(),
                        possible_tiles: vec![floor, puddle, obstacle, decoration],
                    },
                },
            );
        }

        let fallback = themes[&Theme::None].clone();
        Self {
            tiles: TileSet::new(variants).expect("built-in tile table is valid"),
            themes,
            fallback,
        }
    }
}

impl ThemeCatalog for ThemeTable {
    fn tile_bundle(&self, theme: Theme) -> &TileBundle {
        &self.entry(theme).bundle
    }

    fn display_color(&self, theme: Theme) -> Color {
        self.entry(theme).color
    }

    fn tile_set(&self) -> &TileSet {
        &self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_consistent() {
        let table = ThemeTable::builtin();
        assert_eq!(table.tile_set().len(), 16);
        for theme in [Theme::None, Theme::Snow, Theme::Fire, Theme::Grass] {
            let bundle = table.tile_bundle(theme);
            assert!(table.tile_set().contains(bundle.floor));
            assert_eq!(bundle.possible_tiles.len(), 4);
        }
        assert_eq!(table.display_color(Theme::Snow), Color::CYAN);
        assert_eq!(table.display_color(Theme::None), Color::WHITE);
    }

    #[test]
    fn test_builtin_floors_accept_everything() {
        let table = ThemeTable::builtin();
        let tiles = table.tile_set();
        for theme in Theme::ROOM_THEMES {
            let floor = table.tile_bundle(theme).floor;
            for variant in tiles.variants() {
                for dir in Direction::ALL {
                    assert!(variant.allows(dir, floor));
                    assert!(tiles.get(floor).unwrap().allows(dir, variant.id));
                }
            }
        }
    }

    #[test]
    fn test_obstacle_rules_are_asymmetric() {
        let table = ThemeTable::builtin();
        let obstacle = table.tile_set().get(TileId(22)).unwrap();
        assert!(obstacle.allows(Direction::North, TileId(22)));
        assert!(!obstacle.allows(Direction::South, TileId(22)));
    }

    #[test]
    fn test_random_room_theme_never_none() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            assert_ne!(Theme::random_room_theme(&mut rng), Theme::None);
        }
    }

    #[test]
    fn test_from_json_falls_back_to_none_theme() {
        let json = r#"{
            "tiles": [
                {"id": 1, "north": [1], "east": [1], "south": [1], "west": [1]},
                {"id": 2}
            ],
            "themes": {
                "none": {"color": {"r": 1, "g": 2, "b": 3}, "floor": 1, "puddle": 2, "obstacle": 2, "decoration": 2}
            }
        }"#;
        let table = ThemeTable::from_json(json).unwrap();
        assert_eq!(table.tile_bundle(Theme::Fire).floor, TileId(1));
        assert_eq!(table.display_color(Theme::Grass), Color::rgb(1, 2, 3));
        assert!(table.tile_bundle(Theme::None).possible_tiles.is_empty());
    }

    #[test]
    fn test_from_json_requires_none_theme() {
        let json = r#"{"tiles": [{"id": 1}], "themes": {"snow": {"floor": 1, "puddle": 1, "obstacle": 1, "decoration": 1}}}"#;
        assert!(matches!(
            ThemeTable::from_json(json),
            Err(CatalogError::MissingDefaultTheme)
        ));
    }

    #[test]
    fn test_from_json_rejects_unknown_tile() {
        let json = r#"{"tiles": [{"id": 1}], "themes": {"none": {"floor": 1, "puddle": 7, "obstacle": 1, "decoration": 1}}}"#;
        assert!(matches!(
            ThemeTable::from_json(json),
            Err(CatalogError::UnknownTile { .. })
        ));
    }
}
