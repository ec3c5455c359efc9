//! Generation stages.
//!
//! Each stage reads the config and catalog, writes into the session and paints
//! what it produced. Stages run in order; a failing stage stops the pass.

use super::session::{Session, SolveJob};
use crate::config::DungeonConfig;
use crate::dungeon_gen::{
    apply_offset, clamp_to_max, connect, organic_floor, partition, run_walk, walk_from_corners,
};
use crate::error::{GenerationError, Result};
use crate::geometry::{Position, PositionSet};
use crate::renderer::{Surface, TileRenderer};
use crate::theme::{Theme, ThemeCatalog};
use crate::tile::TileSet;
use crate::wfc::WfcScope;

use rand::rngs::StdRng;
use rand::Rng;

/// What a stage gets to work with.
pub struct GenerationContext<'a> {
    pub config: &'a DungeonConfig,
    pub catalog: &'a dyn ThemeCatalog,
    pub renderer: &'a mut dyn TileRenderer,
    pub rng: &'a mut StdRng,
}

pub trait Generator {
    fn name(&self) -> &'static str;

    fn generate(&self, session: &mut Session, ctx: &mut GenerationContext<'_>) -> Result<()>;

    /// Drop this stage's output from the session and its surfaces.
    fn clear(&self, session: &mut Session, renderer: &mut dyn TileRenderer);
}

/// Partition, rooms, walks and corridors.
pub struct RoomLayoutGenerator;

impl RoomLayoutGenerator {
    fn create_rooms(&self, session: &mut Session, ctx: &mut GenerationContext<'_>) -> Result<()> {
        puffin::profile_function!();
        let config = ctx.config;

        let leaves = partition(
            config.bounds(),
            config.min_room_size.width,
            config.min_room_size.height,
            ctx.rng,
        );
        let rects: Vec<_> = apply_offset(&leaves, config.room_offset)
            .into_iter()
            .map(|rect| {
                clamp_to_max(rect, config.max_room_size.width, config.max_room_size.height)
            })
            .collect();
        if rects.is_empty() {
            return Err(GenerationError::NoRooms {
                width: config.size.width,
                height: config.size.height,
            });
        }
        log::debug!("partition: {} leaves, {} rooms", leaves.len(), rects.len());

        for rect in rects {
            let theme = Theme::random_room_theme(ctx.rng);
            let room = if config.random_walk_rooms {
                let floor = organic_floor(&rect, &config.room_walk, ctx.rng);
                if floor.is_empty() {
                    log::debug!("walk missed room {:?}, filling it", rect);
                    session.rooms.create_room(rect, theme)
                } else {
                    session.rooms.create_room_with_floor(rect, floor, theme)
                }
            } else {
                session.rooms.create_room(rect, theme)
            };

            let walks = ctx
                .rng
                .gen_range(config.corner_walks.min..=config.corner_walks.max);
            if walks > 0 {
                let extra = walk_from_corners(&rect, walks, &config.corner_walk, ctx.rng);
                session.rooms.add_positions(room, &extra)?;
            }
        }
        Ok(())
    }

    /// Floor tile over every room, plus the occasional puddle.
    fn paint_rooms(&self, session: &Session, ctx: &mut GenerationContext<'_>) {
        for room in session.rooms.rooms() {
            let bundle = ctx.catalog.tile_bundle(room.theme);
            ctx.renderer.paint_cells(Surface::Rooms, &room.floor, bundle.floor);

            if ctx.rng.gen_bool(ctx.config.puddle_chance) {
                let puddle: PositionSet = run_walk(&bundle.puddle_walk, room.center, ctx.rng)
                    .intersection(&room.floor)
                    .copied()
                    .collect();
                ctx.renderer.paint_cells(Surface::Rooms, &puddle, bundle.puddle);
            }
        }
    }
}

impl Generator for RoomLayoutGenerator {
    fn name(&self) -> &'static str {
        "room layout"
    }

    fn generate(&self, session: &mut Session, ctx: &mut GenerationContext<'_>) -> Result<()> {
        puffin::profile_function!();

        self.create_rooms(session, ctx)?;
        self.paint_rooms(session, ctx);

        let centers = session.rooms.centers();
        session.corridors = connect(&centers, ctx.rng);
        let corridor_tile = ctx.catalog.tile_bundle(Theme::None).floor;
        ctx.renderer
            .paint_cells(Surface::Corridors, &session.corridors, corridor_tile);

        session.floor = session.rooms.floor_union();
        session.floor.extend(session.corridors.iter().copied());

        log::debug!(
            "room layout: {} rooms, {} corridor cells, {} floor cells",
            session.rooms.len(),
            session.corridors.len(),
            session.floor.len()
        );
        Ok(())
    }

    fn clear(&self, session: &mut Session, renderer: &mut dyn TileRenderer) {
        session.rooms.clear();
        session.corridors.clear();
        session.floor.clear();
        renderer.clear(Surface::Rooms);
        renderer.clear(Surface::Corridors);
    }
}

/// Queues tile solver jobs over the floor. The engine runs them.
pub struct TileSolveGenerator;

impl Generator for TileSolveGenerator {
    fn name(&self) -> &'static str {
        "tile solve"
    }

    fn generate(&self, session: &mut Session, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let wfc = &ctx.config.wfc;
        if !wfc.enabled {
            log::debug!("tile solver disabled");
            return Ok(());
        }

        session.rules = ctx.catalog.tile_set().clone();
        let corridor_domain = ctx.catalog.tile_bundle(Theme::None).possible_tiles.clone();

        match wfc.scope {
            WfcScope::Dungeon => {
                session.pending.push_back(SolveJob {
                    label: "dungeon".to_string(),
                    targets: session.floor.iter().copied().collect(),
                    domain: corridor_domain,
                    seed: ctx.rng.gen(),
                });
            }
            WfcScope::PerRoom => {
                let rooms = session.rooms.rooms();
                for room in &rooms {
                    session.pending.push_back(SolveJob {
                        label: format!("room {} ({})", room.index, room.theme),
                        targets: room.floor.iter().copied().collect(),
                        domain: ctx.catalog.tile_bundle(room.theme).possible_tiles.clone(),
                        seed: ctx.rng.gen(),
                    });
                }

                let room_floor = session.rooms.floor_union();
                let corridors: Vec<Position> = session
                    .corridors
                    .difference(&room_floor)
                    .copied()
                    .collect();
                if !corridors.is_empty() {
                    session.pending.push_back(SolveJob {
                        label: "corridors".to_string(),
                        targets: corridors,
                        domain: corridor_domain,
                        seed: ctx.rng.gen(),
                    });
                }
            }
        }

        log::debug!("queued {} solver jobs", session.pending.len());
        Ok(())
    }

    fn clear(&self, session: &mut Session, renderer: &mut dyn TileRenderer) {
        session.pending.clear();
        session.rules = TileSet::default();
        session.tiles.clear();
        session.unsatisfiable.clear();
        session.incomplete = false;
        renderer.clear(Surface::Wfc);
    }
}
