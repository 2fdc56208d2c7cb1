//! Game settings and tuning
//!
//! Loaded from an optional JSON file; every field falls back to the
//! built-in default when missing.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{CellCoord, GamePhase, MazeCell, MazeGrid, Player, blocking_cell};

/// Configuration that could not be read
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("spawn point ({x}, {z}) is not open floor in this maze")]
    BlockedSpawn { x: f32, z: f32 },

    #[error("maze has no open floor to spawn on")]
    NoSpawn,

    #[error("maze has no exit cell")]
    NoExit,

    #[error("exit column {0} is outside the maze")]
    ExitOutside(i32),
}

/// How reaching the exit is judged while escaping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitCondition {
    /// Stand in column `cell_x` past the `min_z` line
    PastCoordinate { cell_x: i32, min_z: f32 },
    /// The opened exit is a hole: standing over it drops the eye height at
    /// `fall_speed` per second, and falling below `win_height` escapes
    FallThroughHole { fall_speed: f32, win_height: f32 },
}

impl ExitCondition {
    /// Walk into `exit` past the middle of the cell
    pub fn past(exit: CellCoord) -> Self {
        ExitCondition::PastCoordinate {
            cell_x: exit.x,
            min_z: exit.center().y,
        }
    }

    pub fn hole() -> Self {
        ExitCondition::FallThroughHole {
            fall_speed: FALL_SPEED,
            win_height: FALL_WIN_HEIGHT,
        }
    }

    /// Whether the player pose satisfies this condition
    pub fn reached(&self, player: &Player) -> bool {
        match *self {
            ExitCondition::PastCoordinate { cell_x, min_z } => {
                player.cell().x == cell_x && player.pos.z > min_z
            }
            ExitCondition::FallThroughHole { win_height, .. } => player.pos.y < win_height,
        }
    }

    /// Planar point inside the exit region next to an exit cell
    pub fn target_near(&self, exit: CellCoord) -> glam::Vec2 {
        let center = exit.center();
        match *self {
            ExitCondition::PastCoordinate { cell_x, min_z } => {
                // Aim a little past the line, inside the column
                let column = CellCoord::new(cell_x, exit.z).center();
                glam::Vec2::new(column.x, center.y.max(min_z + 0.2 * CUBE_SIZE))
            }
            ExitCondition::FallThroughHole { .. } => center,
        }
    }
}

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Distance per tick per held direction
    pub player_speed: f32,
    /// Footprint edge length
    pub player_size: f32,
    /// Radians per unit of mouse motion
    pub mouse_sensitivity: f32,
    pub pitch_limit: f32,
    /// Spawn point (x, z); the open cell nearest the maze centre if unset
    pub spawn: Option<Vec2>,
    pub spawn_yaw: f32,
    /// Length of the escape window (seconds)
    pub escape_seconds: f32,
    /// How escaping is judged; walking into the maze's exit cell if unset
    pub exit: Option<ExitCondition>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            player_size: PLAYER_SIZE,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            pitch_limit: PITCH_LIMIT,
            spawn: None,
            spawn_yaw: SPAWN_YAW,
            escape_seconds: ESCAPE_SECONDS,
            exit: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a file, or defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(SettingsError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("player_speed", self.player_speed),
            ("player_size", self.player_size),
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("pitch_limit", self.pitch_limit),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(SettingsError::Invalid(format!("{name} must be positive")));
        }
        if self.player_size >= CUBE_SIZE {
            return Err(SettingsError::Invalid(
                "player_size must be smaller than a maze cell".into(),
            ));
        }
        if !(self.escape_seconds.is_finite() && self.escape_seconds >= 0.0) {
            return Err(SettingsError::Invalid(
                "escape_seconds must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Fit spawn point and exit rule to a loaded maze
    ///
    /// Unset values are derived from the layout; set values must make
    /// sense in it.
    pub fn fit(&self, grid: &MazeGrid) -> Result<(Player, ExitCondition), SettingsError> {
        let spawn = match self.spawn {
            Some(at) => {
                let open = grid
                    .get(CellCoord::containing(at))
                    .is_some_and(|cell| !cell.is_solid_in(GamePhase::Playing));
                if !open || blocking_cell(at, self.player_size, grid, GamePhase::Playing).is_some()
                {
                    return Err(SettingsError::BlockedSpawn { x: at.x, z: at.y });
                }
                at
            }
            None => central_floor(grid).ok_or(SettingsError::NoSpawn)?.center(),
        };

        let exit = match self.exit {
            Some(ExitCondition::PastCoordinate { cell_x, .. })
                if !(0..grid.width() as i32).contains(&cell_x) =>
            {
                return Err(SettingsError::ExitOutside(cell_x));
            }
            Some(exit @ ExitCondition::FallThroughHole { .. }) => {
                grid.exit_cell().ok_or(SettingsError::NoExit)?;
                exit
            }
            Some(exit) => exit,
            None => ExitCondition::past(grid.exit_cell().ok_or(SettingsError::NoExit)?),
        };

        Ok((self.player_at(spawn), exit))
    }

    /// A player at `spawn` with these tunings
    pub fn player_at(&self, spawn: Vec2) -> Player {
        let spawn = Vec3::new(spawn.x, EYE_HEIGHT, spawn.y);
        Player {
            pos: spawn,
            yaw: self.spawn_yaw,
            pitch: 0.0,
            speed: self.player_speed,
            size: self.player_size,
            sensitivity: self.mouse_sensitivity,
            pitch_limit: self.pitch_limit,
            spawn,
            spawn_yaw: self.spawn_yaw,
        }
    }
}

/// Empty cell closest to the middle of the maze
fn central_floor(grid: &MazeGrid) -> Option<CellCoord> {
    let mid = CellCoord::new((grid.width() / 2) as i32, (grid.depth() / 2) as i32);
    grid.coords_of(MazeCell::Empty)
        .min_by_key(|c| (c.x - mid.x).abs() + (c.z - mid.z).abs())
}
