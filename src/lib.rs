//! Maze Escape - simulation core for a first-person maze game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, movement, collisions, game state)
//! - `input`: Keyboard state to per-tick input mapping
//! - `settings`: Data-driven tuning loaded from JSON

pub mod input;
pub mod settings;
pub mod sim;

pub use settings::{ExitCondition, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (the driver runs at ~60 Hz, 16 ms per frame)
    pub const SIM_DT: f32 = 16.0 / 1000.0;

    /// Default maze dimensions (cells)
    pub const MAZE_WIDTH: usize = 15;
    pub const MAZE_DEPTH: usize = 15;
    /// World-space edge length of one maze cell
    pub const CUBE_SIZE: f32 = 1.0;
    /// Wall height (rendering only, exposed for the presentation layer)
    pub const WALL_HEIGHT: f32 = 1.5;

    /// Player footprint edge length
    pub const PLAYER_SIZE: f32 = 0.2;
    /// Distance moved per tick per held direction
    pub const PLAYER_SPEED: f32 = 0.03;
    /// Camera eye height above the floor
    pub const EYE_HEIGHT: f32 = 0.5;
    /// Radians per pixel of mouse motion
    pub const MOUSE_SENSITIVITY: f32 = 0.003;
    /// Pitch clamp, just shy of straight up/down
    pub const PITCH_LIMIT: f32 = 1.55;

    /// Spawn pose (the centre of the built-in maze)
    pub const SPAWN_X: f32 = 7.5;
    pub const SPAWN_Z: f32 = 7.5;
    pub const SPAWN_YAW: f32 = std::f32::consts::FRAC_PI_2;

    /// Escape window length (seconds)
    pub const ESCAPE_SECONDS: f32 = 30.0;

    /// Hole exit: fall rate (units/sec) and the eye height that counts as escaped
    pub const FALL_SPEED: f32 = 2.0;
    pub const FALL_WIN_HEIGHT: f32 = -0.5;
}

/// Planar forward vector (x, z) for a yaw angle
///
/// Yaw 0 faces +x; increasing yaw turns toward -z.
#[inline]
pub fn yaw_forward(yaw: f32) -> Vec2 {
    Vec2::new(yaw.cos(), -yaw.sin())
}

/// Planar right-hand vector (x, z) for a yaw angle
#[inline]
pub fn yaw_right(yaw: f32) -> Vec2 {
    Vec2::new(yaw.sin(), yaw.cos())
}

/// Yaw that faces along a planar direction (inverse of [`yaw_forward`])
#[inline]
pub fn yaw_toward(dir: Vec2) -> f32 {
    (-dir.y).atan2(dir.x)
}

/// Wrap an angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
