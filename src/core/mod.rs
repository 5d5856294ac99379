//! Core types: identifiers, configuration, RNG, geometry, errors.
//!
//! Everything here is independent of the card state machine and the Board.

pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod rng;

pub use config::{AnimationTimings, SessionConfig};
pub use entity::{CardId, CardIdAllocator, Ticket};
pub use error::ConfigError;
pub use geometry::Bounds;
pub use rng::{GameRng, GameRngState};
