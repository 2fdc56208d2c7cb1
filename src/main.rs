//! Maze Escape entry point
//!
//! Headless driver: runs one autopilot session at the fixed timestep and
//! prints the final snapshot. The windowed front end lives elsewhere and
//! drives the same `tick` entry point.

use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use maze_escape::consts::SIM_DT;
use maze_escape::input::InputState;
use maze_escape::sim::{GameEvent, GamePhase, GameState, LayoutError, MazeGrid, UiAction, tick};
use maze_escape::{Settings, SettingsError};

#[derive(Parser, Debug)]
#[command(name = "maze-escape", about = "Run a headless maze escape session")]
struct Args {
    /// Maze layout file (one row per line); built-in maze if omitted
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Settings JSON file; defaults if omitted or missing
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
}

/// Why a session could not be set up
#[derive(Error, Debug)]
enum AppError {
    #[error("could not read layout '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed layout '{}'", .path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: LayoutError,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

fn load_grid(path: Option<&Path>) -> Result<MazeGrid, AppError> {
    let Some(path) = path else {
        return Ok(MazeGrid::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    MazeGrid::parse(&text).map_err(|source| AppError::Layout {
        path: path.to_path_buf(),
        source,
    })
}

fn setup(args: &Args) -> Result<GameState, AppError> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let grid = load_grid(args.layout.as_deref())?;
    Ok(GameState::new(grid, &settings)?)
}

fn run(args: &Args) -> Result<GameState, AppError> {
    let mut state = setup(args)?;

    let mut input = InputState::new();
    input.set_autopilot(true);
    input.ui_action(UiAction::Start);

    let mut ticks = 0;
    while !state.phase().is_terminal() && ticks < args.max_ticks {
        let events = tick(&mut state, &input.take(), SIM_DT);
        ticks += 1;

        for event in events {
            match event {
                GameEvent::CollectibleEaten { eaten, total, .. } => {
                    log::info!("Collected {}/{} at tick {}", eaten, total, ticks);
                }
                GameEvent::EscapeOpened => log::info!("Exit open, run!"),
                _ => {}
            }
        }
    }

    match state.phase() {
        GamePhase::Won => log::info!(
            "Escaped after {} ticks with {:.1}s left",
            ticks,
            state.timer.remaining()
        ),
        GamePhase::Lost => log::info!("Time ran out after {} ticks", ticks),
        phase => log::warn!("Stopped after {} ticks in {:?}", ticks, phase),
    }
    Ok(state)
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Maze Escape (headless) starting...");

    let args = Args::parse();
    match run(&args) {
        Ok(state) => {
            match serde_json::to_string_pretty(&state.snapshot()) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Could not encode snapshot: {e}"),
            }
            if state.phase() == GamePhase::Won {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            log::error!("{e}");
            let mut source = e.source();
            while let Some(cause) = source {
                log::error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
