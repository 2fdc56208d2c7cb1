//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit elapsed time per tick
//! - One owned session context, mutated only by `tick`
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod maze;
pub mod player;
pub mod state;
pub mod tick;
pub mod timer;

pub use autopilot::{Steering, route, steer};
pub use collision::{Aabb, blocking_cell, cell_box, footprint};
pub use maze::{CellCoord, LayoutError, MazeCell, MazeGrid};
pub use player::{MoveKeys, Player};
pub use state::{
    GameEvent, GamePhase, GameState, SideEffect, Snapshot, StateMachine, Transition, Trigger,
    UiAction,
};
pub use tick::{TickInput, tick};
pub use timer::EscapeTimer;
