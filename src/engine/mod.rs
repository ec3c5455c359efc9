//! Dungeon engine - owns the session and sequences the generation stages.
//!
//! The engine handles:
//! - Config validation before any stage runs
//! - Running the layout stages in order
//! - Draining queued tile solver jobs, all at once or one cell per `step`
//! - Clearing the session and every surface
//!
//! Callers (the CLI, tests) only handle:
//! - Providing a `ThemeCatalog` and a `TileRenderer`
//! - Deciding when to step and what to do with the report

mod generators;
mod session;

pub use generators::{
    GenerationContext, Generator, RoomLayoutGenerator, TileSolveGenerator,
};
pub use session::{Session, SolveJob};

use crate::config::DungeonConfig;
use crate::error::{ConfigError, Result};
use crate::geometry::{Bounds, Position};
use crate::renderer::{Surface, TileRenderer};
use crate::theme::{Theme, ThemeCatalog};
use crate::wfc::{SolveEvent, SolverRun, TileConstraintSolver};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Whether a pass is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    /// Layout is done; solver jobs may still be pending
    Generating,
}

/// Result of one `step`.
#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    /// One cell was collapsed and painted
    Progress(SolveEvent),
    /// The pass just completed
    Done(GenerationReport),
    /// No pass in progress
    Idle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSummary {
    pub bounds: Bounds,
    pub theme: Theme,
    pub floor_cells: usize,
}

/// Summary of a finished pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub rooms: Vec<RoomSummary>,
    pub floor_cells: usize,
    pub corridor_cells: usize,
    pub assigned_cells: usize,
    pub unsatisfiable: Vec<Position>,
    pub incomplete: bool,
}

/// The dungeon engine - owns all generation state.
pub struct DungeonEngine {
    config: DungeonConfig,

    /// Stages, run in order
    generators: Vec<Box<dyn Generator>>,

    solver: TileConstraintSolver,

    /// Output of the current or last pass
    session: Session,

    state: EngineState,

    /// Solver run for the job at the front of the queue
    active: Option<SolverRun>,
}

impl DungeonEngine {
    /// Create an engine with the standard stages. The config is checked here.
    pub fn new(config: DungeonConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let solver = TileConstraintSolver::new(config.wfc.policy)
            .with_iteration_cap(config.wfc.iteration_cap);

        Ok(Self {
            config,
            generators: vec![Box::new(RoomLayoutGenerator), Box::new(TileSolveGenerator)],
            solver,
            session: Session::new(),
            state: EngineState::Idle,
            active: None,
        })
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Run a full pass and return its report.
    pub fn generate(
        &mut self,
        catalog: &dyn ThemeCatalog,
        renderer: &mut dyn TileRenderer,
    ) -> Result<GenerationReport> {
        puffin::profile_function!();

        self.begin(catalog, renderer)?;
        loop {
            match self.step(renderer) {
                StepStatus::Progress(_) => {}
                StepStatus::Done(report) => return Ok(report),
                StepStatus::Idle => return Ok(self.report()),
            }
        }
    }

    /// Clear, run every stage, and leave the solver jobs for `step`.
    ///
    /// When a stage fails the pass stops there, the session keeps what the
    /// earlier stages produced and the engine goes back to idle.
    pub fn begin(
        &mut self,
        catalog: &dyn ThemeCatalog,
        renderer: &mut dyn TileRenderer,
    ) -> Result<()> {
        self.config.validate()?;
        self.clear(renderer);
        self.state = EngineState::Generating;

        log::info!(
            "generating {}x{} dungeon at {} with seed {}",
            self.config.size.width,
            self.config.size.height,
            self.config.origin,
            self.config.seed
        );

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        for generator in &self.generators {
            puffin::profile_scope!("stage", generator.name());
            log::debug!("stage: {}", generator.name());

            let mut ctx = GenerationContext {
                config: &self.config,
                catalog,
                renderer: &mut *renderer,
                rng: &mut rng,
            };
            if let Err(e) = generator.generate(&mut self.session, &mut ctx) {
                log::warn!("stage {} failed: {}", generator.name(), e);
                self.state = EngineState::Idle;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Advance the solver by one cell, starting queued jobs as needed.
    pub fn step(&mut self, renderer: &mut dyn TileRenderer) -> StepStatus {
        if self.state != EngineState::Generating {
            return StepStatus::Idle;
        }

        loop {
            match self.active.as_mut().map(|run| run.next()) {
                Some(Some(event)) => {
                    self.apply(event, renderer);
                    return StepStatus::Progress(event);
                }
                Some(None) => {
                    if let Some(run) = self.active.take() {
                        let outcome = run.into_outcome();
                        self.session.incomplete |= outcome.incomplete;
                    }
                }
                None => match self.session.pending.pop_front() {
                    Some(job) => {
                        log::debug!("solving {}: {} cells", job.label, job.targets.len());
                        self.active = Some(self.solver.begin(
                            &self.session.rules,
                            &job.targets,
                            &job.domain,
                            &self.session.tiles,
                            StdRng::seed_from_u64(job.seed),
                        ));
                    }
                    None => {
                        self.state = EngineState::Idle;
                        let report = self.report();
                        log::info!(
                            "dungeon done: {} rooms, {}/{} cells tiled, {} unsatisfiable",
                            report.rooms.len(),
                            report.assigned_cells,
                            report.floor_cells,
                            report.unsatisfiable.len()
                        );
                        return StepStatus::Done(report);
                    }
                },
            }
        }
    }

    fn apply(&mut self, event: SolveEvent, renderer: &mut dyn TileRenderer) {
        match event {
            SolveEvent::Assigned { position, tile } => {
                self.session.tiles.insert(position, tile);
                renderer.paint_cell(Surface::Wfc, position, tile);
            }
            SolveEvent::Unsatisfiable { position } => {
                self.session.unsatisfiable.push(position);
            }
        }
    }

    /// Abandon any pass in progress and wipe the session and every surface.
    pub fn clear(&mut self, renderer: &mut dyn TileRenderer) {
        self.active = None;
        for generator in self.generators.iter().rev() {
            generator.clear(&mut self.session, renderer);
        }
        self.state = EngineState::Idle;
    }

    pub fn report(&self) -> GenerationReport {
        GenerationReport {
            seed: self.config.seed,
            rooms: self
                .session
                .rooms
                .rooms()
                .into_iter()
                .map(|room| RoomSummary {
                    bounds: room.bounds,
                    theme: room.theme,
                    floor_cells: room.floor.len(),
                })
                .collect(),
            floor_cells: self.session.floor.len(),
            corridor_cells: self.session.corridors.len(),
            assigned_cells: self.session.tiles.len(),
            unsatisfiable: self.session.unsatisfiable.clone(),
            incomplete: self.session.incomplete,
        }
    }
}
