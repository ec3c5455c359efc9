use anyhow::{Context, Result};
use bsp_wfc_dungeon::constants::PREVIEW_CELL_PIXELS;
use bsp_wfc_dungeon::{
    DungeonConfig, DungeonEngine, SelectionPolicy, StepStatus, TileCanvas, ThemeCatalog,
    ThemeTable, WfcScope,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a BSP dungeon and tile it", long_about = None)]
struct Args {
    /// Dungeon config JSON; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Theme catalog JSON; defaults to the built-in table
    #[arg(short, long)]
    themes: Option<PathBuf>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short = 'W', long)]
    width: Option<i32>,

    #[arg(short = 'H', long)]
    height: Option<i32>,

    /// sequential or min-entropy
    #[arg(long)]
    policy: Option<SelectionPolicy>,

    /// dungeon or per-room
    #[arg(long)]
    scope: Option<WfcScope>,

    /// Step the solver one cell at a time with the configured delay
    #[arg(long)]
    animate: bool,

    /// Write a PNG preview
    #[arg(long)]
    png: Option<PathBuf>,

    /// Print the generation report as JSON
    #[arg(long)]
    report: bool,

    /// Turn on puffin profile scopes
    #[arg(long)]
    profile: bool,
}

fn load_config(args: &Args) -> Result<DungeonConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            DungeonConfig::from_json(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => DungeonConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.size.width = width;
    }
    if let Some(height) = args.height {
        config.size.height = height;
    }
    if let Some(policy) = args.policy {
        config.wfc.policy = policy;
    }
    if let Some(scope) = args.scope {
        config.wfc.scope = scope;
    }
    Ok(config)
}

fn load_themes(args: &Args) -> Result<ThemeTable> {
    match &args.themes {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ThemeTable::from_json(&json)
                .with_context(|| format!("Failed to load themes from {}", path.display()))
        }
        None => Ok(ThemeTable::builtin()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.profile {
        puffin::set_scopes_on(true);
    }

    let config = load_config(&args)?;
    let catalog = load_themes(&args)?;
    let delay = Duration::from_millis(config.wfc.step_delay_ms);
    let mut engine = DungeonEngine::new(config).context("Invalid dungeon config")?;
    let mut canvas = TileCanvas::new();

    let report = if args.animate {
        engine.begin(&catalog, &mut canvas)?;
        loop {
            puffin::GlobalProfiler::lock().new_frame();
            match engine.step(&mut canvas) {
                StepStatus::Progress(event) => {
                    log::trace!("{:?}", event);
                    std::thread::sleep(delay);
                }
                StepStatus::Done(report) => break report,
                StepStatus::Idle => break engine.report(),
            }
        }
    } else {
        let report = engine.generate(&catalog, &mut canvas)?;
        puffin::GlobalProfiler::lock().new_frame();
        report
    };

    print!("{}", canvas.to_ascii(catalog.tile_set()));

    if let Some(path) = &args.png {
        canvas
            .save_png(catalog.tile_set(), PREVIEW_CELL_PIXELS, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
