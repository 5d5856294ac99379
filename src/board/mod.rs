//! The Board: active cards, the opened card, lives, and the input lock.
//!
//! ## Resolution
//!
//! Selecting a card locks input and flips it. When it lands face up the
//! Board either remembers it as the opened card, removes a matched pair, or
//! charges a life and turns a mismatched pair back over (second card, then
//! first). Input re-arms only when the whole sequence is done, and win/loss
//! is checked only then.
//!
//! ## Example
//!
//! ```
//! use memory_match::animation::Timeline;
//! use memory_match::board::{Board, SessionStatus};
//! use memory_match::core::SessionConfig;
//!
//! let mut timeline = Timeline::new();
//! let config = SessionConfig::default().with_starting_lives(3).with_seed(1);
//! let mut board = Board::start_session(["A", "B"], config, &mut timeline);
//!
//! assert_eq!(board.cards().len(), 4);
//! assert_eq!(board.lives(), 3);
//! assert_eq!(board.status(), SessionStatus::InProgress);
//!
//! // Input is locked until the warm-up delay completes.
//! assert!(!board.can_accept_input());
//! while let Some(ticket) = timeline.pop_due(u64::MAX) {
//!     board.on_animation_complete(ticket, &mut timeline);
//! }
//! assert!(board.can_accept_input());
//! ```

mod lives;
mod resolution;
mod state;

pub use lives::{LifeIndicator, LifeIndicators};
pub use resolution::Resolution;
pub use state::Board;

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Session outcome so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl SessionStatus {
    /// Won or Lost.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != SessionStatus::InProgress
    }
}

/// Notifications for the host UI, drained with `Board::drain_events`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// Cards were dealt. `session` counts restarts from 0.
    SessionStarted { session: u32, cards: usize },
    /// The warm-up ended and input is accepted.
    InputReady,
    /// A first card of a pair is face up and waiting.
    CardOpened(CardId),
    /// A pair matched and is leaving the board.
    PairMatched { first: CardId, second: CardId },
    /// A pair did not match; one life was lost.
    Mismatch { first: CardId, second: CardId, lives_left: u32 },
    Won,
    Lost,
}
