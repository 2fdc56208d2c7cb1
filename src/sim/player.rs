//! Player pose and collision-aware movement

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::blocking_cell;
use super::maze::{CellCoord, MazeGrid};
use super::state::GamePhase;
use crate::consts::*;
use crate::{yaw_forward, yaw_right};

/// Movement keys held during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    pub const FORWARD: Self = Self {
        forward: true,
        back: false,
        left: false,
        right: false,
    };

    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// The player (first-person camera plus square footprint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// World position: x and z on the maze plane, y is eye height
    pub pos: Vec3,
    /// Heading (radians, unbounded)
    pub yaw: f32,
    /// Look up/down (radians, clamped to ±pitch_limit)
    pub pitch: f32,
    /// Distance per tick per held direction
    pub speed: f32,
    /// Footprint edge length
    pub size: f32,
    /// Radians per unit of look delta
    pub sensitivity: f32,
    pub pitch_limit: f32,
    /// Pose restored by `respawn`
    pub spawn: Vec3,
    pub spawn_yaw: f32,
}

impl Default for Player {
    fn default() -> Self {
        let spawn = Vec3::new(SPAWN_X, EYE_HEIGHT, SPAWN_Z);
        Self {
            pos: spawn,
            yaw: SPAWN_YAW,
            pitch: 0.0,
            speed: PLAYER_SPEED,
            size: PLAYER_SIZE,
            sensitivity: MOUSE_SENSITIVITY,
            pitch_limit: PITCH_LIMIT,
            spawn,
            spawn_yaw: SPAWN_YAW,
        }
    }
}

impl Player {
    /// Planar (x, z) position
    #[inline]
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.z)
    }

    /// Grid cell the player stands in
    #[inline]
    pub fn cell(&self) -> CellCoord {
        CellCoord::containing(self.planar())
    }

    /// Return to the spawn pose
    pub fn respawn(&mut self) {
        self.pos = self.spawn;
        self.yaw = self.spawn_yaw;
        self.pitch = 0.0;
    }

    /// Planar displacement for the held keys at the current yaw
    ///
    /// Directions add up without normalization, so diagonals are faster.
    pub fn compute_intent(&self, keys: MoveKeys) -> Vec2 {
        let forward = yaw_forward(self.yaw) * self.speed;
        let right = yaw_right(self.yaw) * self.speed;

        let mut intent = Vec2::ZERO;
        if keys.forward {
            intent += forward;
        }
        if keys.back {
            intent -= forward;
        }
        if keys.left {
            intent -= right;
        }
        if keys.right {
            intent += right;
        }
        intent
    }

    /// Apply a movement intent, all or nothing
    ///
    /// Returns true if the player moved.
    pub fn try_move(&mut self, intent: Vec2, grid: &MazeGrid, phase: GamePhase) -> bool {
        if intent == Vec2::ZERO {
            return false;
        }
        let candidate = self.planar() + intent;
        if let Some(cell) = blocking_cell(candidate, self.size, grid, phase) {
            log::trace!("Move blocked by cell ({}, {})", cell.x, cell.z);
            return false;
        }
        self.pos.x = candidate.x;
        self.pos.z = candidate.y;
        true
    }

    /// Mouse look; ignored outside active play
    pub fn turn(&mut self, delta: Vec2, phase: GamePhase) {
        if !phase.is_active() {
            return;
        }
        self.yaw -= delta.x * self.sensitivity;
        self.pitch = (self.pitch - delta.y * self.sensitivity)
            .clamp(-self.pitch_limit, self.pitch_limit);
    }

    /// Unit view direction from yaw and pitch
    pub fn look_direction(&self) -> Vec3 {
        let horizontal = self.pitch.cos();
        Vec3::new(
            self.yaw.cos() * horizontal,
            self.pitch.sin(),
            -self.yaw.sin() * horizontal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn open_room() -> MazeGrid {
        MazeGrid::parse(
            "#####\n\
             #...#\n\
             #...#\n\
             #...#\n\
             #####",
        )
        .unwrap()
    }

    fn player_at(x: f32, z: f32, yaw: f32) -> Player {
        let mut p = Player::default();
        p.pos = Vec3::new(x, EYE_HEIGHT, z);
        p.yaw = yaw;
        p
    }

    #[test]
    fn test_intent_directions() {
        let p = player_at(2.5, 2.5, 0.0);
        let f = p.compute_intent(MoveKeys::FORWARD);
        assert!((f - Vec2::new(PLAYER_SPEED, 0.0)).length() < 1e-6);

        let b = p.compute_intent(MoveKeys {
            back: true,
            ..Default::default()
        });
        assert!((b + f).length() < 1e-6);

        let r = p.compute_intent(MoveKeys {
            right: true,
            ..Default::default()
        });
        assert!((r - Vec2::new(0.0, PLAYER_SPEED)).length() < 1e-6);

        // Forward and back cancel out
        let none = p.compute_intent(MoveKeys {
            forward: true,
            back: true,
            ..Default::default()
        });
        assert!(none.length() < 1e-6);
    }

    #[test]
    fn test_diagonal_is_unnormalized() {
        let p = player_at(2.5, 2.5, 0.4);
        let diag = p.compute_intent(MoveKeys {
            forward: true,
            left: true,
            ..Default::default()
        });
        assert!((diag.length() - PLAYER_SPEED * 2.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_try_move_commits_in_open_space() {
        let grid = open_room();
        let mut p = player_at(2.5, 2.5, 0.0);
        let intent = p.compute_intent(MoveKeys::FORWARD);
        assert!(p.try_move(intent, &grid, GamePhase::Playing));
        assert!((p.pos.x - (2.5 + PLAYER_SPEED)).abs() < 1e-6);
        assert_eq!(p.pos.z, 2.5);
    }

    #[test]
    fn test_try_move_rejects_whole_move() {
        let grid = open_room();
        // Hugging the +x wall (x = 4); diagonal push must not slide along z
        let mut p = player_at(3.88, 2.5, 0.0);
        let before = p.pos;
        let moved = p.try_move(Vec2::new(0.05, 0.05), &grid, GamePhase::Playing);
        assert!(!moved);
        assert_eq!(p.pos, before);
    }

    #[test]
    fn test_move_up_to_wall_edge_is_allowed() {
        let grid = open_room();
        // Footprint 0.25 wide; from x = 3.75 a step of 0.125 lands flush on x = 4
        let mut p = player_at(3.75, 2.5, 0.0);
        p.size = 0.25;
        assert!(p.try_move(Vec2::new(0.125, 0.0), &grid, GamePhase::Playing));
        assert_eq!(p.pos.x, 3.875);
        // Any further is a collision
        assert!(!p.try_move(Vec2::new(0.125, 0.0), &grid, GamePhase::Playing));
        assert_eq!(p.pos.x, 3.875);
    }

    #[test]
    fn test_zero_intent_is_noop() {
        let grid = open_room();
        let mut p = player_at(2.5, 2.5, 0.0);
        assert!(!p.try_move(Vec2::ZERO, &grid, GamePhase::Playing));
    }

    #[test]
    fn test_turn_clamps_pitch() {
        let mut p = Player::default();
        p.turn(Vec2::new(100.0, -10_000.0), GamePhase::Playing);
        assert!((p.yaw - (SPAWN_YAW - 100.0 * MOUSE_SENSITIVITY)).abs() < 1e-5);
        assert_eq!(p.pitch, PITCH_LIMIT);

        p.turn(Vec2::new(0.0, 10_000.0), GamePhase::Escaping);
        assert_eq!(p.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_turn_ignored_when_inactive() {
        let mut p = Player::default();
        for phase in [GamePhase::MainMenu, GamePhase::Paused, GamePhase::Won, GamePhase::Lost] {
            p.turn(Vec2::new(50.0, 50.0), phase);
        }
        assert_eq!(p.yaw, SPAWN_YAW);
        assert_eq!(p.pitch, 0.0);
    }

    #[test]
    fn test_respawn() {
        let mut p = player_at(1.5, 1.5, 2.0);
        p.pitch = 0.8;
        p.respawn();
        assert_eq!(p.pos, Vec3::new(SPAWN_X, EYE_HEIGHT, SPAWN_Z));
        assert_eq!(p.yaw, SPAWN_YAW);
        assert_eq!(p.pitch, 0.0);
    }

    #[test]
    fn test_look_direction() {
        let p = player_at(2.5, 2.5, FRAC_PI_2);
        let dir = p.look_direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!((dir.z + 1.0).abs() < 1e-5);
    }
}
