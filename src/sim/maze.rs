//! Maze grid and collectible tracking
//!
//! The grid is a fixed rectangle of tagged cells. The layout it was loaded
//! from is kept untouched so a session can be restored to it at any time.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::GamePhase;
use crate::consts::CUBE_SIZE;

/// Built-in 15x15 layout. Row index is x, column index is z.
const DEFAULT_LAYOUT: &str = "\
###############
#..#.....##.#.#
##.###.#..#.#.#
#....#.#.##...#
#.##.#.#.#..#.#
#..#.#...#..#.#
##.#..####.##.#
#....##.......#
#.####..#.###.#
#......##...#.#
#.####.#.##.#o#
#....#....#...#
###.#####.###.#
#.......#....X#
###############";

/// A single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MazeCell {
    #[default]
    Empty,
    Wall,
    /// Pickup, becomes `Empty` once consumed
    Collectible,
    /// The exit: solid while `Playing`, open once the escape window starts
    ConditionalWall,
}

impl MazeCell {
    /// Whether this cell blocks movement in the given phase
    #[inline]
    pub fn is_solid_in(self, phase: GamePhase) -> bool {
        match self {
            MazeCell::Wall => true,
            MazeCell::ConditionalWall => phase == GamePhase::Playing,
            MazeCell::Empty | MazeCell::Collectible => false,
        }
    }

    /// Parse a layout glyph
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '#' | '1' => Some(MazeCell::Wall),
            '.' | ' ' | '0' => Some(MazeCell::Empty),
            'o' | '2' => Some(MazeCell::Collectible),
            'X' | '9' => Some(MazeCell::ConditionalWall),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            MazeCell::Empty => '.',
            MazeCell::Wall => '#',
            MazeCell::Collectible => 'o',
            MazeCell::ConditionalWall => 'X',
        }
    }
}

/// Integer cell coordinates; may lie outside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell containing a planar (x, z) world position
    #[inline]
    pub fn containing(pos: Vec2) -> Self {
        Self {
            x: (pos.x / CUBE_SIZE).floor() as i32,
            z: (pos.y / CUBE_SIZE).floor() as i32,
        }
    }

    /// World-space centre of this cell
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(
            (self.x as f32 + 0.5) * CUBE_SIZE,
            (self.z as f32 + 0.5) * CUBE_SIZE,
        )
    }

    /// The 3x3 block of cells centred on this one
    pub fn neighborhood(self) -> impl Iterator<Item = CellCoord> {
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dz| CellCoord::new(self.x + dx, self.z + dz)))
    }
}

/// Malformed layout, reported once at load time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("maze layout is empty")]
    Empty,

    #[error("maze row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown maze glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { row: usize, col: usize, glyph: char },

    #[error("maze has {found} cells, expected {expected}")]
    CellCount { expected: usize, found: usize },
}

/// Mutable maze plus the pristine layout it was loaded from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct MazeGrid {
    /// Cells along x
    width: usize,
    /// Cells along z
    depth: usize,
    /// Current layout, indexed `x * depth + z`
    cells: Vec<MazeCell>,
    /// Layout as loaded, for resets
    original: Vec<MazeCell>,
    total_collectibles: u32,
    collectibles_eaten: u32,
}

/// Serialized grid, checked before it becomes a [`MazeGrid`]
#[derive(Deserialize)]
struct GridData {
    width: usize,
    depth: usize,
    cells: Vec<MazeCell>,
    original: Vec<MazeCell>,
}

impl TryFrom<GridData> for MazeGrid {
    type Error = LayoutError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let expected = data.width * data.depth;
        for found in [data.cells.len(), data.original.len()] {
            if found != expected {
                return Err(LayoutError::CellCount { expected, found });
            }
        }

        // Counters are recomputed rather than trusted
        let rows = data
            .original
            .chunks(data.depth.max(1))
            .map(<[MazeCell]>::to_vec)
            .collect();
        let mut grid = Self::load(rows)?;
        let left = data
            .cells
            .iter()
            .filter(|c| **c == MazeCell::Collectible)
            .count() as u32;
        grid.collectibles_eaten = grid.total_collectibles.saturating_sub(left);
        grid.cells = data.cells;
        Ok(grid)
    }
}

impl Default for MazeGrid {
    fn default() -> Self {
        // The built-in layout is a compile-time constant and always well formed
        match Self::parse(DEFAULT_LAYOUT) {
            Ok(grid) => grid,
            Err(e) => unreachable!("built-in layout is malformed: {e}"),
        }
    }
}

impl MazeGrid {
    /// Load a layout given as rows of cells (row index is x)
    pub fn load(rows: Vec<Vec<MazeCell>>) -> Result<Self, LayoutError> {
        let width = rows.len();
        let depth = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 || depth == 0 {
            return Err(LayoutError::Empty);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != depth) {
            return Err(LayoutError::Ragged {
                row,
                expected: depth,
                found: r.len(),
            });
        }

        let cells: Vec<MazeCell> = rows.into_iter().flatten().collect();
        let total_collectibles = cells
            .iter()
            .filter(|c| **c == MazeCell::Collectible)
            .count() as u32;

        log::debug!(
            "Loaded {}x{} maze with {} collectibles",
            width,
            depth,
            total_collectibles
        );

        Ok(Self {
            width,
            depth,
            original: cells.clone(),
            cells,
            total_collectibles,
            collectibles_eaten: 0,
        })
    }

    /// Parse a text layout, one row per line. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut rows = Vec::new();
        for line in text.lines().map(|l| l.trim_end_matches('\r')) {
            if line.trim().is_empty() {
                continue;
            }
            let row_idx = rows.len();
            let row = line
                .chars()
                .enumerate()
                .map(|(col, glyph)| {
                    MazeCell::from_glyph(glyph).ok_or(LayoutError::UnknownGlyph {
                        row: row_idx,
                        col,
                        glyph,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::load(rows)
    }

    /// Render the current layout back to glyphs
    pub fn to_text(&self) -> String {
        self.cells
            .chunks(self.depth)
            .map(|row| row.iter().map(|c| c.glyph()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Current cells, indexed `x * depth + z`
    pub fn cells(&self) -> &[MazeCell] {
        &self.cells
    }

    pub fn total_collectibles(&self) -> u32 {
        self.total_collectibles
    }

    pub fn collectibles_eaten(&self) -> u32 {
        self.collectibles_eaten
    }

    /// Whether every collectible has been consumed
    pub fn all_collected(&self) -> bool {
        self.collectibles_eaten == self.total_collectibles
    }

    fn index(&self, at: CellCoord) -> Option<usize> {
        let (x, z) = (usize::try_from(at.x).ok()?, usize::try_from(at.z).ok()?);
        (x < self.width && z < self.depth).then(|| x * self.depth + z)
    }

    /// Cell at the given coordinates, `None` when out of bounds
    pub fn get(&self, at: CellCoord) -> Option<MazeCell> {
        self.index(at).map(|i| self.cells[i])
    }

    /// Whether the cell blocks movement. Out of bounds is open space.
    pub fn is_solid(&self, at: CellCoord, phase: GamePhase) -> bool {
        self.get(at).is_some_and(|c| c.is_solid_in(phase))
    }

    /// Eat the collectible at `at`, if any
    ///
    /// Returns true only for the pickup that completes the set.
    pub fn consume_at(&mut self, at: CellCoord) -> bool {
        let Some(i) = self.index(at) else {
            return false;
        };
        if self.cells[i] != MazeCell::Collectible {
            return false;
        }
        self.cells[i] = MazeCell::Empty;
        self.collectibles_eaten += 1;
        log::debug!(
            "Collectible eaten at ({}, {}): {}/{}",
            at.x,
            at.z,
            self.collectibles_eaten,
            self.total_collectibles
        );
        self.all_collected()
    }

    /// Restore the original layout and zero the eaten counter
    pub fn reset(&mut self) {
        self.cells.copy_from_slice(&self.original);
        self.collectibles_eaten = 0;
    }

    /// First exit cell in row-major order
    pub fn exit_cell(&self) -> Option<CellCoord> {
        self.coords_of(MazeCell::ConditionalWall).next()
    }

    /// Coordinates of every cell of the given kind, in row-major order
    pub fn coords_of(&self, kind: MazeCell) -> impl Iterator<Item = CellCoord> + '_ {
        let depth = self.depth;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| **c == kind)
            .map(move |(i, _)| CellCoord::new((i / depth) as i32, (i % depth) as i32))
    }
}
