//! Game state and core simulation types
//!
//! `GameState` is the whole session context. Everything the presentation
//! layer may read is exposed through `Snapshot`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::maze::{CellCoord, MazeCell, MazeGrid};
use super::player::Player;
use super::timer::EscapeTimer;
use crate::settings::{ExitCondition, Settings, SettingsError};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no session running
    #[default]
    MainMenu,
    /// Exploring and collecting; the exit is sealed
    Playing,
    /// Game is paused
    Paused,
    /// Every collectible eaten, racing the clock to the open exit
    Escaping,
    Won,
    Lost,
}

impl GamePhase {
    /// Whether the simulation advances (movement, look, pickups)
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Escaping)
    }

    /// Session over; only menu or quit remain
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }

    /// Whether the pointer should be hidden and captured for mouse look
    #[inline]
    pub fn captures_cursor(self) -> bool {
        self.is_active()
    }
}

/// Discrete menu actions emitted by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiAction {
    Start,
    Resume,
    ReturnToMenu,
    Quit,
}

/// Everything that can drive a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    Start,
    AllCollected,
    Pause,
    Resume,
    ReturnToMenu,
    Quit,
    ExitReached,
    TimerExpired,
}

impl From<UiAction> for Trigger {
    fn from(action: UiAction) -> Self {
        match action {
            UiAction::Start => Trigger::Start,
            UiAction::Resume => Trigger::Resume,
            UiAction::ReturnToMenu => Trigger::ReturnToMenu,
            UiAction::Quit => Trigger::Quit,
        }
    }
}

/// Work a transition asks the session to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideEffect {
    /// Restore the maze, respawn the player, rewind the timer
    ResetSession,
    /// Escape window opens; the timer starts counting
    StartCountdown,
    /// Session progress is abandoned
    DiscardSession,
    /// The host should terminate the process
    ExitProcess,
}

/// Result of a trigger that was accepted by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: GamePhase,
    pub to: GamePhase,
    pub effect: Option<SideEffect>,
}

/// Phase plus the single piece of history kept for pause/resume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateMachine {
    current: GamePhase,
    /// Phase to resume into; set only while `Paused`
    previous: Option<GamePhase>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> GamePhase {
        self.current
    }

    pub fn previous(&self) -> Option<GamePhase> {
        self.previous
    }

    /// Apply a trigger. Pairs without a defined transition return `None`.
    pub fn fire(&mut self, trigger: Trigger) -> Option<Transition> {
        use GamePhase::*;

        let from = self.current;
        let (to, effect) = match (from, trigger) {
            (MainMenu, Trigger::Start) => (Playing, Some(SideEffect::ResetSession)),
            (Playing, Trigger::AllCollected) => (Escaping, Some(SideEffect::StartCountdown)),
            (Playing | Escaping, Trigger::Pause) => (Paused, None),
            (Paused, Trigger::Resume) => (self.previous?, None),
            (Paused | Won | Lost, Trigger::ReturnToMenu) => {
                (MainMenu, Some(SideEffect::DiscardSession))
            }
            (Paused | Won | Lost, Trigger::Quit) => (from, Some(SideEffect::ExitProcess)),
            (Escaping, Trigger::ExitReached) => (Won, None),
            (Escaping, Trigger::TimerExpired) => (Lost, None),
            _ => return None,
        };

        if to != from {
            self.previous = (to == Paused).then_some(from);
            self.current = to;
        }
        Some(Transition { from, to, effect })
    }
}

/// Events for the presentation layer (sound, HUD flashes, cursor)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    SessionStarted,
    CollectibleEaten { cell: CellCoord, eaten: u32, total: u32 },
    EscapeOpened,
    Escaped { time_left: f32 },
    TimeUp,
    QuitRequested,
}

/// Read-only view of a session after a completed tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub previous_phase: Option<GamePhase>,
    pub width: usize,
    pub depth: usize,
    /// Indexed `x * depth + z`
    pub cells: Vec<MazeCell>,
    pub player_pos: Vec3,
    pub player_yaw: f32,
    pub player_pitch: f32,
    pub collectibles_eaten: u32,
    pub total_collectibles: u32,
    pub timer_remaining: f32,
}

impl Snapshot {
    /// One-line HUD text for active play
    pub fn hud_line(&self) -> Option<String> {
        match self.phase {
            GamePhase::Playing => Some(format!(
                "Collectibles: {} / {}",
                self.collectibles_eaten, self.total_collectibles
            )),
            GamePhase::Escaping => Some(format!("EXIT OPEN! TIME: {:.1}", self.timer_remaining)),
            _ => None,
        }
    }
}

/// Complete session context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub machine: StateMachine,
    pub grid: MazeGrid,
    pub player: Player,
    pub timer: EscapeTimer,
    /// How the escape is judged
    pub exit: ExitCondition,
}

impl Default for GameState {
    fn default() -> Self {
        // Default settings always fit the built-in maze
        match Self::new(MazeGrid::default(), &Settings::default()) {
            Ok(state) => state,
            Err(e) => unreachable!("built-in maze rejects default settings: {e}"),
        }
    }
}

impl GameState {
    /// Create a session at the main menu
    ///
    /// Fails if the settings place the spawn or exit where the maze has none.
    pub fn new(grid: MazeGrid, settings: &Settings) -> Result<Self, SettingsError> {
        let (player, exit) = settings.fit(&grid)?;
        Ok(Self {
            machine: StateMachine::new(),
            grid,
            player,
            timer: EscapeTimer::new(settings.escape_seconds),
            exit,
        })
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.machine.current()
    }

    /// Fire a trigger, perform its side effect, and record events
    ///
    /// Returns the transition if the trigger applied.
    pub fn apply(&mut self, trigger: Trigger, events: &mut Vec<GameEvent>) -> Option<Transition> {
        let transition = self.machine.fire(trigger)?;

        match transition.effect {
            Some(SideEffect::ResetSession) => {
                self.reset_session();
                events.push(GameEvent::SessionStarted);
            }
            Some(SideEffect::DiscardSession) => self.reset_session(),
            Some(SideEffect::StartCountdown) => {
                self.timer.reset();
                events.push(GameEvent::EscapeOpened);
            }
            Some(SideEffect::ExitProcess) => {
                log::info!("Quit requested from {:?}", transition.from);
                events.push(GameEvent::QuitRequested);
            }
            None => {}
        }

        match transition.to {
            GamePhase::Won if transition.from != GamePhase::Won => {
                events.push(GameEvent::Escaped {
                    time_left: self.timer.remaining(),
                });
            }
            GamePhase::Lost if transition.from != GamePhase::Lost => {
                events.push(GameEvent::TimeUp);
            }
            _ => {}
        }

        if transition.from != transition.to {
            log::info!("Phase {:?} -> {:?}", transition.from, transition.to);
            events.push(GameEvent::PhaseChanged {
                from: transition.from,
                to: transition.to,
            });
        }

        Some(transition)
    }

    /// Restore maze, player and timer to the start of a session
    pub fn reset_session(&mut self) {
        self.grid.reset();
        self.player.respawn();
        self.timer.reset();
        log::debug!("Session reset");
    }

    /// Whether the player currently satisfies the exit condition
    pub fn exit_reached(&self) -> bool {
        self.exit.reached(&self.player)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.machine.current(),
            previous_phase: self.machine.previous(),
            width: self.grid.width(),
            depth: self.grid.depth(),
            cells: self.grid.cells().to_vec(),
            player_pos: self.player.pos,
            player_yaw: self.player.yaw,
            player_pitch: self.player.pitch,
            collectibles_eaten: self.grid.collectibles_eaten(),
            total_collectibles: self.grid.total_collectibles(),
            timer_remaining: self.timer.remaining(),
        }
    }
}
