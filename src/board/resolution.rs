//! Resolution sequence bookkeeping.
//!
//! A resolution runs from the moment a card is selected until the board
//! re-arms input. It passes through at most these steps:
//!
//! ```text
//! Idle -> Revealing -> Idle                                     (first card, match)
//! Idle -> Revealing -> Penalty -> ConcealingSecond -> ConcealingFirst -> Idle
//! ```

use crate::core::CardId;

/// Where the board is in the current resolution sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Idle,
    /// A selected card is flipping face up.
    Revealing { card: CardId },
    /// Mismatch pause before the pair turns back over.
    Penalty { first: CardId, second: CardId },
    /// The second card of a mismatched pair is flipping back.
    ConcealingSecond { first: CardId, second: CardId },
    /// The first card of a mismatched pair is flipping back.
    ConcealingFirst { first: CardId },
}

impl Resolution {
    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Resolution::Idle
    }
}

/// Owner of a ticket the board requested itself.
///
/// Card tickets are not routed here: each card knows the ticket it waits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Route {
    /// Input unlocks after a deal.
    Warmup,
    /// Mismatched cards turn back over.
    Penalty,
    /// A life indicator finished fading.
    LifeIndicator,
    /// Shake or banner; nothing waits on it.
    Cosmetic,
}
