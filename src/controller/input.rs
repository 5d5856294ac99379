//! Pointer and keyboard handlers.

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationScheduler, Timeline};
use crate::board::{Board, BoardEvent, SessionStatus};
use crate::cards::CardName;
use crate::core::{ConfigError, SessionConfig, Ticket};

/// Cursor affordance over the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    /// Hovering a card that can be selected.
    Pointer,
}

/// Raw input, for hosts that queue events before dispatching them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    KeyDown(char),
}

/// Drives one Board from input events and animation completions.
#[derive(Debug)]
pub struct MatchController<S: AnimationScheduler = Timeline> {
    board: Board,
    scheduler: S,
    paused: bool,
    cursor: Cursor,
}

impl<S: AnimationScheduler> MatchController<S> {
    /// Validate `config` and deal the first session.
    pub fn new<I, N>(names: I, config: SessionConfig, mut scheduler: S) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = N>,
        N: Into<CardName>,
    {
        config.validate()?;
        let board = Board::start_session(names, config, &mut scheduler);
        Ok(Self {
            board,
            scheduler,
            paused: false,
            cursor: Cursor::Default,
        })
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for layout code.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.board.status()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.board.drain_events()
    }

    /// Select the card under the pointer.
    ///
    /// Returns `true` if a resolution sequence started.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if self.paused || !self.board.can_accept_input() {
            return false;
        }
        match self.board.card_at(x, y) {
            Some(id) => self.board.select(id, &mut self.scheduler),
            None => false,
        }
    }

    /// Update the cursor affordance. Never changes board state.
    ///
    /// The cursor is left alone while input is locked or paused.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Cursor {
        if !self.paused && self.board.can_accept_input() {
            self.cursor = match self.board.card_at(x, y) {
                Some(_) => Cursor::Pointer,
                None => Cursor::Default,
            };
        }
        self.cursor
    }

    /// Handle a key press. Returns `true` if the key was the pause key.
    pub fn key_down(&mut self, key: char) -> bool {
        if !key.eq_ignore_ascii_case(&self.board.config().pause_key) {
            return false;
        }
        self.paused = !self.paused;
        log::debug!("pause overlay {}", if self.paused { "shown" } else { "hidden" });
        true
    }

    /// Dispatch a queued input event.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.pointer_down(x, y);
            }
            InputEvent::PointerMove { x, y } => {
                self.pointer_move(x, y);
            }
            InputEvent::KeyDown(key) => {
                self.key_down(key);
            }
        }
    }

    /// Forward an animation completion reported by the scheduler.
    pub fn on_animation_complete(&mut self, ticket: Ticket) {
        self.board.on_animation_complete(ticket, &mut self.scheduler);
    }

    /// Deal a fresh session with full lives and close the pause overlay.
    pub fn restart(&mut self) {
        self.paused = false;
        self.cursor = Cursor::Default;
        self.board.restart_session(&mut self.scheduler);
    }
}

impl MatchController<Timeline> {
    /// Advance the clock by `dt_ms`, delivering every completion due in that
    /// window in time order.
    pub fn update(&mut self, dt_ms: u64) {
        let deadline = self.scheduler.now().saturating_add(dt_ms);
        while let Some(ticket) = self.scheduler.pop_due(deadline) {
            self.board.on_animation_complete(ticket, &mut self.scheduler);
        }
        self.scheduler.advance_to(deadline);
    }

    /// Run the clock until nothing is pending.
    pub fn run_until_idle(&mut self) {
        while let Some(ticket) = self.scheduler.pop_due(u64::MAX) {
            self.board.on_animation_complete(ticket, &mut self.scheduler);
        }
    }
}
