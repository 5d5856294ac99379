//! # memory-match
//!
//! Turn logic for a memory-matching card minigame: when a card may be
//! flipped, whether two face-up cards match, how mismatches cost lives, and
//! when the session is won or lost.
//!
//! ## Design Principles
//!
//! 1. **Animation-Agnostic**: The core never animates. It asks an
//!    `AnimationScheduler` for transitions, tweens and delays and resumes
//!    when the host hands back the completed `Ticket`.
//!
//! 2. **Explicit Phases**: A flip is a sequence of observable phases, and a
//!    resolution is a state machine on the Board. Nothing hides behind
//!    callbacks.
//!
//! 3. **Guards, Not Locks**: Everything runs on one update loop. Re-entrant
//!    flips and input during a resolution are dropped by state checks.
//!
//! ## Modules
//!
//! - `core`: IDs, tickets, configuration, RNG, geometry, errors
//! - `animation`: Scheduler trait and the deterministic `Timeline`
//! - `cards`: Card faces, deals, and the flip state machine
//! - `board`: Active cards, lives, and match resolution
//! - `controller`: Pointer/key handling and the update loop
//!
//! ## Example
//!
//! ```
//! use memory_match::{MatchController, SessionConfig, SessionStatus, Timeline};
//!
//! let config = SessionConfig::default().with_seed(42);
//! let mut game = MatchController::new(["card-0", "card-1"], config, Timeline::new()).unwrap();
//! game.run_until_idle();
//!
//! assert!(game.board().can_accept_input());
//! assert_eq!(game.status(), SessionStatus::InProgress);
//! ```

pub mod animation;
pub mod board;
pub mod cards;
pub mod controller;
pub mod core;

// Re-export commonly used types
pub use crate::core::{
    AnimationTimings, Bounds, CardId, ConfigError, GameRng, GameRngState, SessionConfig, Ticket,
};

pub use crate::animation::{
    AnimationScheduler, Banner, Direction, Ease, Request, Target, Timeline, Tween, TweenProperty,
};

pub use crate::cards::{Card, CardEvent, CardName, FaceState, FlipPhase, Side};

pub use crate::board::{Board, BoardEvent, LifeIndicator, Resolution, SessionStatus};

pub use crate::controller::{Cursor, InputEvent, MatchController};
