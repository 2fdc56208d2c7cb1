//! Collision detection against the maze grid
//!
//! The player is a square footprint on the (x, z) plane and every solid
//! cell is a unit square. Only the 3x3 block of cells around the candidate
//! position can touch a footprint smaller than one cell, so nothing else is
//! tested. Overlap uses strict inequalities: boxes that share an edge do not
//! collide.

use glam::Vec2;

use super::maze::{CellCoord, MazeGrid};
use super::state::GamePhase;
use crate::consts::CUBE_SIZE;

/// Axis-aligned box on the (x, z) plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square of edge `size` centred on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap on both axes; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// Player footprint at a planar position
#[inline]
pub fn footprint(center: Vec2, size: f32) -> Aabb {
    Aabb::centered(center, size)
}

/// World-space box of a grid cell
#[inline]
pub fn cell_box(cell: CellCoord) -> Aabb {
    let min = Vec2::new(cell.x as f32 * CUBE_SIZE, cell.z as f32 * CUBE_SIZE);
    Aabb::new(min, min + Vec2::splat(CUBE_SIZE))
}

/// First solid cell overlapping a footprint of `size` at `center`
///
/// Scans the 3x3 neighbourhood of the containing cell in x-major order.
pub fn blocking_cell(
    center: Vec2,
    size: f32,
    grid: &MazeGrid,
    phase: GamePhase,
) -> Option<CellCoord> {
    let body = footprint(center, size);
    CellCoord::containing(center)
        .neighborhood()
        .filter(|&cell| grid.is_solid(cell, phase))
        .find(|&cell| body.overlaps(&cell_box(cell)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_SIZE;

    fn corridor() -> MazeGrid {
        MazeGrid::parse(
            "#####\n\
             #...#\n\
             #...#\n\
             #..X#\n\
             #####",
        )
        .unwrap()
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let touching = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let inside = Aabb::new(Vec2::new(0.9, 0.5), Vec2::new(1.1, 0.7));
        let apart = Aabb::new(Vec2::new(1.5, 1.5), Vec2::new(2.0, 2.0));

        assert!(!a.overlaps(&touching));
        assert!(!touching.overlaps(&a));
        assert!(a.overlaps(&inside));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_open_cell_center_is_free() {
        let grid = corridor();
        assert_eq!(blocking_cell(Vec2::new(2.5, 2.5), PLAYER_SIZE, &grid, GamePhase::Playing), None);
    }

    #[test]
    fn test_wall_overlap_blocks() {
        let grid = corridor();
        // Footprint reaches x = 0.95, into wall column x in [0, 1)
        let hit = blocking_cell(Vec2::new(1.05, 2.5), PLAYER_SIZE, &grid, GamePhase::Playing);
        assert_eq!(hit, Some(CellCoord::new(0, 2)));
    }

    #[test]
    fn test_touching_wall_edge_is_free() {
        let grid = corridor();
        // Half of 0.25 is exactly representable: left edge lands on x = 1.0
        let hit = blocking_cell(Vec2::new(1.125, 2.5), 0.25, &grid, GamePhase::Playing);
        assert_eq!(hit, None);
    }

    #[test]
    fn test_exit_solid_only_while_playing() {
        let grid = corridor();
        let pos = Vec2::new(3.05, 3.5);
        assert_eq!(
            blocking_cell(pos, PLAYER_SIZE, &grid, GamePhase::Playing),
            Some(CellCoord::new(3, 3))
        );
        assert_eq!(blocking_cell(pos, PLAYER_SIZE, &grid, GamePhase::Escaping), None);
    }

    #[test]
    fn test_out_of_bounds_is_open() {
        let grid = MazeGrid::parse("...\n...\n...").unwrap();
        assert_eq!(blocking_cell(Vec2::new(-0.5, -0.5), PLAYER_SIZE, &grid, GamePhase::Playing), None);
    }
}
