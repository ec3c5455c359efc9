//! Output side of generation.
//!
//! The engine only writes through `TileRenderer`. `TileCanvas` keeps every
//! surface in memory and can dump it as ASCII or as a PNG.

use crate::geometry::{Bounds, Position, PositionSet};
use crate::tile::{Color, TileId, TileSet};
use image::{Rgba, RgbaImage};
use std::collections::BTreeMap;
use std::path::Path;

/// Independent tile layers, drawn bottom to top in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Surface {
    Rooms,
    Corridors,
    Wfc,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Rooms, Surface::Corridors, Surface::Wfc];

    fn index(self) -> usize {
        match self {
            Surface::Rooms => 0,
            Surface::Corridors => 1,
            Surface::Wfc => 2,
        }
    }
}

pub trait TileRenderer {
    fn paint_cell(&mut self, surface: Surface, position: Position, tile: TileId);

    fn paint_cells(&mut self, surface: Surface, positions: &PositionSet, tile: TileId) {
        for position in positions {
            self.paint_cell(surface, *position, tile);
        }
    }

    /// Remove every tile from `surface`.
    fn clear(&mut self, surface: Surface);
}

/// In-memory renderer.
#[derive(Clone, Debug, Default)]
pub struct TileCanvas {
    layers: [BTreeMap<Position, TileId>; 3],
}

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

impl TileCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, surface: Surface) -> &BTreeMap<Position, TileId> {
        &self.layers[surface.index()]
    }

    /// Topmost tile at `position`.
    pub fn tile_at(&self, position: Position) -> Option<TileId> {
        Surface::ALL
            .iter()
            .rev()
            .find_map(|surface| self.layer(*surface).get(&position).copied())
    }

    pub fn is_blank(&self) -> bool {
        self.layers.iter().all(|layer| layer.is_empty())
    }

    /// Smallest rectangle holding every painted cell.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut cells = self.layers.iter().flat_map(|layer| layer.keys());
        let first = *cells.next()?;
        let (mut min, mut max) = (first, first);
        for p in cells {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Bounds::from_min_max(min, Position::new(max.x + 1, max.y + 1)))
    }

    /// One character per cell, north at the top. Empty cells are spaces.
    pub fn to_ascii(&self, tiles: &TileSet) -> String {
        let Some(bounds) = self.bounds() else {
            return String::new();
        };
        let mut out = String::with_capacity(((bounds.width + 1) * bounds.height) as usize);
        for y in (bounds.y..bounds.max_y()).rev() {
            let row: String = (bounds.x..bounds.max_x())
                .map(|x| match self.tile_at(Position::new(x, y)) {
                    Some(tile) => tiles.get(tile).map_or('?', |v| v.symbol),
                    None => ' ',
                })
                .collect();
            out.push_str(row.trim_end());
            out.push('\n');
        }
        out
    }

    /// Render each cell as a `scale` x `scale` block of its tile color.
    pub fn to_image(&self, tiles: &TileSet, scale: u32) -> RgbaImage {
        let Some(bounds) = self.bounds() else {
            return RgbaImage::new(0, 0);
        };
        let scale = scale.max(1);
        let mut img = RgbaImage::from_pixel(
            bounds.width as u32 * scale,
            bounds.height as u32 * scale,
            BACKGROUND,
        );

        for (row, y) in (bounds.y..bounds.max_y()).rev().enumerate() {
            for (col, x) in (bounds.x..bounds.max_x()).enumerate() {
                let Some(tile) = self.tile_at(Position::new(x, y)) else {
                    continue;
                };
                let color = tiles.get(tile).map_or(Color::WHITE, |v| v.color);
                let pixel = Rgba([color.r, color.g, color.b, 255]);
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(col as u32 * scale + dx, row as u32 * scale + dy, pixel);
                    }
                }
            }
        }
        img
    }

    pub fn save_png(&self, tiles: &TileSet, scale: u32, path: &Path) -> image::ImageResult<()> {
        self.to_image(tiles, scale).save(path)
    }
}

impl TileRenderer for TileCanvas {
    fn paint_cell(&mut self, surface: Surface, position: Position, tile: TileId) {
        self.layers[surface.index()].insert(position, tile);
    }

    fn clear(&mut self, surface: Surface) {
        self.layers[surface.index()].clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileVariant;

    fn tiles() -> TileSet {
        TileSet::new(vec![
            TileVariant::new(0, "floor").with_display('.', Color::rgb(10, 20, 30)),
            TileVariant::new(1, "wall").with_display('#', Color::RED),
        ])
        .unwrap()
    }

    #[test]
    fn test_upper_surface_wins() {
        let mut canvas = TileCanvas::new();
        let p = Position::new(2, 3);
        canvas.paint_cell(Surface::Rooms, p, TileId(0));
        canvas.paint_cell(Surface::Wfc, p, TileId(1));
        assert_eq!(canvas.tile_at(p), Some(TileId(1)));

        canvas.clear(Surface::Wfc);
        assert_eq!(canvas.tile_at(p), Some(TileId(0)));
        assert_eq!(canvas.layer(Surface::Rooms).len(), 1);
    }

    #[test]
    fn test_ascii_puts_north_on_top() {
        let mut canvas = TileCanvas::new();
        canvas.paint_cells(
            Surface::Rooms,
            &PositionSet::from([Position::new(0, 0), Position::new(1, 0)]),
            TileId(0),
        );
        canvas.paint_cell(Surface::Corridors, Position::new(0, 1), TileId(1));
        assert_eq!(canvas.to_ascii(&tiles()), "#\n..\n");
    }

    #[test]
    fn test_image_matches_bounds_and_colors() {
        let mut canvas = TileCanvas::new();
        canvas.paint_cell(Surface::Rooms, Position::new(-1, 0), TileId(0));
        canvas.paint_cell(Surface::Rooms, Position::new(1, 1), TileId(1));

        let img = canvas.to_image(&tiles(), 2);
        assert_eq!(img.dimensions(), (6, 4));
        // (-1, 0) is the bottom-left cell
        assert_eq!(*img.get_pixel(0, 3), Rgba([10, 20, 30, 255]));
        assert_eq!(*img.get_pixel(5, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(2, 0), BACKGROUND);
    }

    #[test]
    fn test_blank_canvas() {
        let canvas = TileCanvas::new();
        assert!(canvas.is_blank());
        assert_eq!(canvas.bounds(), None);
        assert_eq!(canvas.to_ascii(&tiles()), "");
        assert_eq!(canvas.to_image(&tiles(), 4).dimensions(), (0, 0));
    }
}
