//! MAPFIT: drag pieces from a slot bar onto the spots where they belong
//!
//! A small placement puzzle on top of a software rasterizer:
//! - Pieces are dealt from a shuffled deck into a few inventory slots
//! - A dragged piece follows the pointer as a billboarded proxy in the scene
//! - Dropping casts a ray at the target layer; the target decides if it fits
//! - Model pieces get their slot icons from an isolated offscreen render

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod asset;
mod config;
mod game;
mod input;
mod puzzle;
mod quiz;
mod rasterizer;
mod storage;
mod thumbnail;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use macroquad::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::{Mode, PuzzleApp};
use config::PuzzleDefinition;
use game::World;
use storage::{LocalStorage, ResultStore};
use thumbnail::ThumbnailRenderer;

#[derive(Debug, Parser)]
#[command(name = "mapfit", version, about = "Drag-and-drop map placement puzzle")]
struct Args {
    /// Puzzle file to load (defaults to the bundled demo)
    #[arg(long)]
    puzzle: Option<PathBuf>,

    /// Play the name quiz instead of the drag puzzle
    #[arg(long)]
    quiz: bool,

    /// Where results.ron lives
    #[arg(long)]
    results_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render every model piece's slot thumbnail to PNG and exit
    ExportThumbnails {
        /// Output directory
        dir: PathBuf,
    },
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("MAPFIT v{}", VERSION),
        window_width: 1280,
        window_height: 800,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mapfit=info")))
        .init();
}

fn default_results_dir() -> PathBuf {
    #[cfg(not(target_arch = "wasm32"))]
    let base = dirs::data_dir();
    #[cfg(target_arch = "wasm32")]
    let base: Option<PathBuf> = None;
    base.map(|dir| dir.join("mapfit")).unwrap_or_else(|| PathBuf::from("."))
}

fn load_puzzle(path: Option<&Path>) -> anyhow::Result<PuzzleDefinition> {
    let def = match path {
        Some(path) => PuzzleDefinition::load(path).with_context(|| format!("loading puzzle {}", path.display()))?,
        None => PuzzleDefinition::bundled().context("loading bundled puzzle")?,
    };
    Ok(def)
}

/// Headless: no window is opened
fn export_thumbnails(def: &PuzzleDefinition, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let renderer = ThumbnailRenderer::new(def.thumbnails.clone());
    let mut world = World::new();
    let mut written = 0;
    for (id, model) in def.models() {
        let path = dir.join(format!("{id}.png"));
        renderer
            .render(&mut world, &model)
            .save_png(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        written += 1;
    }
    info!(count = written, dir = %dir.display(), "thumbnails exported");
    Ok(())
}

async fn run(mut app: PuzzleApp) {
    loop {
        app.update(get_frame_time());
        app.draw();
        next_frame().await;
    }
}

fn main() -> anyhow::Result<()> {
    // Crash logging first, before anything can panic
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    init_tracing();
    let args = Args::parse();
    let def = load_puzzle(args.puzzle.as_deref())?;

    if let Some(Command::ExportThumbnails { dir }) = &args.command {
        return export_thumbnails(&def, dir);
    }

    let results_dir = args.results_dir.unwrap_or_else(default_results_dir);
    let results = ResultStore::open(LocalStorage::with_base_dir(&results_dir))
        .with_context(|| format!("opening results in {}", results_dir.display()))?;
    let mode = if args.quiz { Mode::Quiz } else { Mode::Drag };

    let app = match PuzzleApp::new(def, mode, results) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "puzzle failed to start");
            return Err(e.into());
        }
    };

    info!(version = VERSION, ?mode, "=== MAPFIT ===");
    macroquad::Window::from_config(window_conf(), run(app));
    Ok(())
}
