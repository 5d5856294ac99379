//! Cards: faces, deals, and the per-card flip state machine.
//!
//! ## Key Types
//!
//! - `CardName`: the matching identity shared by exactly two cards
//! - `Card`: one card instance with its flip phases and bounds
//! - `FaceState`, `FlipPhase`: where a card is in its flip cycle
//! - `CardEvent`: what a card reports when it settles

pub mod card;
pub mod deal;

pub use card::{Card, CardEvent, FaceState, FlipPhase, Side};
pub use deal::{shuffled_pairs, CardName};
