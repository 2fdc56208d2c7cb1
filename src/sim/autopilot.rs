//! Demo mode - steers the player through the maze
//!
//! Breadth-first search over open cells toward the nearest remaining
//! collectible, or the exit once it is open. Movement always runs between
//! cell centres so the footprint never clips a corner.

use std::collections::VecDeque;

use glam::Vec2;

use super::maze::{CellCoord, MazeCell};
use super::player::MoveKeys;
use super::state::{GamePhase, GameState};
use crate::{normalize_angle, yaw_toward};

/// Keys and look delta that move the player one tick along the route
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Steering {
    pub keys: MoveKeys,
    pub look: Vec2,
}

const STEPS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Shortest route of cells from `start` to any goal, both ends included
pub fn route(state: &GameState, start: CellCoord, goals: &[CellCoord]) -> Option<Vec<CellCoord>> {
    let grid = &state.grid;
    let phase = state.phase();
    let (width, depth) = (grid.width() as i32, grid.depth() as i32);
    let in_bounds = |c: CellCoord| c.x >= 0 && c.z >= 0 && c.x < width && c.z < depth;
    let index = |c: CellCoord| (c.x * depth + c.z) as usize;

    if !in_bounds(start) || goals.is_empty() {
        return None;
    }

    let mut came_from: Vec<Option<CellCoord>> = vec![None; (width * depth) as usize];
    let mut seen = vec![false; (width * depth) as usize];
    let mut queue = VecDeque::from([start]);
    seen[index(start)] = true;

    while let Some(cell) = queue.pop_front() {
        if goals.contains(&cell) {
            let mut path = vec![cell];
            let mut cur = cell;
            while let Some(prev) = came_from[index(cur)] {
                path.push(prev);
                cur = prev;
            }
            path.reverse();
            return Some(path);
        }
        for (dx, dz) in STEPS {
            let next = CellCoord::new(cell.x + dx, cell.z + dz);
            if in_bounds(next) && !seen[index(next)] && !grid.is_solid(next, phase) {
                seen[index(next)] = true;
                came_from[index(next)] = Some(cell);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Where the autopilot is heading in the current phase
fn goals(state: &GameState) -> Vec<CellCoord> {
    match state.phase() {
        GamePhase::Playing => state.grid.coords_of(MazeCell::Collectible).collect(),
        GamePhase::Escaping => state.grid.exit_cell().into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Steering for this tick, `None` when there is nowhere to go
pub fn steer(state: &GameState) -> Option<Steering> {
    if !state.phase().is_active() {
        return None;
    }
    let player = &state.player;
    let pos = player.planar();
    let path = route(state, player.cell(), &goals(state))?;

    let target = match path.as_slice() {
        [here] => {
            // In the goal cell: collectibles are eaten on entry, so only
            // the exit needs a precise point
            if state.phase() == GamePhase::Escaping {
                state.exit.target_near(*here)
            } else {
                here.center()
            }
        }
        [here, next, ..] => {
            // Recentre before turning so travel stays on cell axes
            let center = here.center();
            let axis = next.center() - center;
            let offset = pos - center;
            let off_axis = if axis.x != 0.0 { offset.y } else { offset.x };
            if off_axis.abs() < player.speed {
                next.center()
            } else {
                center
            }
        }
        [] => return None,
    };

    let to_target = target - pos;
    let keys = if to_target.length() < player.speed {
        MoveKeys::default()
    } else {
        MoveKeys::FORWARD
    };

    // Turn exactly onto the target and level the view
    let wanted = player.yaw + normalize_angle(yaw_toward(to_target) - player.yaw);
    let look = Vec2::new(
        (player.yaw - wanted) / player.sensitivity,
        player.pitch / player.sensitivity,
    );

    Some(Steering { keys, look })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::tick::{TickInput, tick};
    use crate::sim::state::UiAction;

    #[test]
    fn test_route_default_maze() {
        let mut state = GameState::default();
        tick(
            &mut state,
            &TickInput {
                action: Some(UiAction::Start),
                ..Default::default()
            },
            SIM_DT,
        );
        let goal = CellCoord::new(10, 13);
        let path = route(&state, state.player.cell(), &[goal]).unwrap();
        assert_eq!(path.first(), Some(&CellCoord::new(7, 7)));
        assert_eq!(path.last(), Some(&goal));
        // Consecutive cells are orthogonal neighbours
        for w in path.windows(2) {
            assert_eq!((w[0].x - w[1].x).abs() + (w[0].z - w[1].z).abs(), 1);
        }
    }

    #[test]
    fn test_sealed_exit_unreachable_while_playing() {
        let mut state = GameState::default();
        state.apply(crate::sim::Trigger::Start, &mut Vec::new());
        let exit = state.grid.exit_cell().unwrap();
        assert!(route(&state, state.player.cell(), &[exit]).is_none());
    }

    #[test]
    fn test_no_steering_in_menu() {
        let state = GameState::default();
        assert!(steer(&state).is_none());
    }

    #[test]
    fn test_autopilot_escapes_default_maze() {
        let mut state = GameState::default();
        let start = TickInput {
            action: Some(UiAction::Start),
            ..Default::default()
        };
        tick(&mut state, &start, SIM_DT);

        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut ticks = 0;
        while !state.phase().is_terminal() && ticks < 20_000 {
            tick(&mut state, &auto, SIM_DT);
            ticks += 1;
        }
        assert_eq!(state.phase(), GamePhase::Won);
        assert_eq!(state.grid.collectibles_eaten(), 1);
    }
}
