//! Simulation tick
//!
//! The single entry point that mutates a session. One call per frame:
//! menu actions, pause, look, movement, pickup, then the escape race.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::autopilot;
use super::player::MoveKeys;
use super::state::{GameEvent, GamePhase, GameState, Trigger, UiAction};
use crate::settings::ExitCondition;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Movement keys currently held
    pub keys: MoveKeys,
    /// Pause pressed this tick (edge, not held state)
    pub pause: bool,
    /// Mouse motion since the last tick
    pub look: Vec2,
    /// Menu action chosen this tick
    pub action: Option<UiAction>,
    /// Demo mode - the autopilot plays the game
    pub autopilot: bool,
}

/// Advance the session by one step of `dt` seconds
///
/// Returns the events produced during the step, in order.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if let Some(action) = input.action {
        state.apply(Trigger::from(action), &mut events);
    }
    if input.pause {
        state.apply(Trigger::Pause, &mut events);
    }

    // Nothing moves outside active play
    let phase = state.phase();
    if !phase.is_active() {
        return events;
    }
    let racing = phase == GamePhase::Escaping;

    let (keys, look) = if input.autopilot {
        autopilot::steer(state)
            .map(|s| (s.keys, s.look))
            .unwrap_or_default()
    } else {
        (input.keys, input.look)
    };

    state.player.turn(look, phase);
    let intent = state.player.compute_intent(keys);
    state.player.try_move(intent, &state.grid, phase);

    let cell = state.player.cell();
    let eaten_before = state.grid.collectibles_eaten();
    state.grid.consume_at(cell);
    if state.grid.collectibles_eaten() > eaten_before {
        events.push(GameEvent::CollectibleEaten {
            cell,
            eaten: state.grid.collectibles_eaten(),
            total: state.grid.total_collectibles(),
        });
    }
    if state.phase() == GamePhase::Playing && state.grid.all_collected() {
        state.apply(Trigger::AllCollected, &mut events);
    }

    if state.phase() == GamePhase::Escaping {
        if let ExitCondition::FallThroughHole { fall_speed, .. } = state.exit {
            if state.grid.exit_cell() == Some(state.player.cell()) {
                state.player.pos.y -= fall_speed * dt;
            } else {
                state.player.pos.y = state.player.spawn.y;
            }
        }

        // Exit first: reaching it on the last tick of the clock still wins
        if state.exit_reached() {
            state.apply(Trigger::ExitReached, &mut events);
        } else if state.timer.is_expired() {
            state.apply(Trigger::TimerExpired, &mut events);
        } else if racing && state.timer.tick(dt) {
            log::debug!("Escape timer reached zero");
        }
    }

    events
}
