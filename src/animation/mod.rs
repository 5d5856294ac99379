//! Animation capability consumed by cards and the Board.
//!
//! The core never animates anything itself. It asks an
//! [`AnimationScheduler`] to play a named transition, a property tween, or a
//! plain delay, gets a [`Ticket`] back, and waits for the host to deliver
//! that ticket when the request completes.
//!
//! ## Contract
//!
//! - Every request completes exactly once.
//! - Completion is never reported from inside the request call; the host
//!   delivers it later from its update loop.
//! - Requests cannot be cancelled.
//!
//! [`Timeline`] is a deterministic implementation driven by a millisecond
//! clock. Hosts with a real tween engine implement the trait themselves and
//! forward completions as tickets.

mod timeline;

pub use timeline::{Request, Timeline};

use serde::{Deserialize, Serialize};

use crate::core::{CardId, Ticket};

/// Playback direction of a named transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Which end-of-session banner a tween moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Banner {
    Win,
    GameOver,
}

/// The visual object a request applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Card(CardId),
    /// Life indicator by its stable index (0 = first life).
    LifeIndicator(u32),
    Camera,
    Banner(Banner),
}

/// Easing curves used by the Board's tweens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    #[default]
    Linear,
    ExpoIn,
    BounceOut,
}

impl Ease {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (t - 1.0))
                }
            }
            Ease::BounceOut => {
                const N: f32 = 7.5625;
                const D: f32 = 2.75;
                if t < 1.0 / D {
                    N * t * t
                } else if t < 2.0 / D {
                    let t = t - 1.5 / D;
                    N * t * t + 0.75
                } else if t < 2.5 / D {
                    let t = t - 2.25 / D;
                    N * t * t + 0.9375
                } else {
                    let t = t - 2.625 / D;
                    N * t * t + 0.984375
                }
            }
        }
    }
}

/// What a tween animates towards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TweenProperty {
    /// Horizontal scale, used for the two halves of a flip.
    ScaleX(f32),
    /// Relative vertical move.
    OffsetY(f32),
    /// Drift vertically while fading to transparent.
    FadeOut { offset_y: f32 },
    /// Camera shake.
    Shake { intensity: f32 },
    /// Drop a banner to the middle of the screen.
    DropIn,
}

/// A property tween request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub property: TweenProperty,
    pub duration_ms: u64,
    pub ease: Ease,
}

impl Tween {
    /// Linear tween.
    #[must_use]
    pub fn new(property: TweenProperty, duration_ms: u64) -> Self {
        Self {
            property,
            duration_ms,
            ease: Ease::Linear,
        }
    }

    #[must_use]
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

/// Scheduler for visual transitions.
///
/// Implementations own timing; callers only hold tickets.
pub trait AnimationScheduler {
    /// Play a named transition (a card's face reveal) forwards or backwards.
    fn play_transition(&mut self, target: Target, name: &str, direction: Direction) -> Ticket;

    /// Tween a property of `target`.
    fn play_tween(&mut self, target: Target, tween: Tween) -> Ticket;

    /// Complete after `duration_ms` without animating anything.
    fn delay(&mut self, duration_ms: u64) -> Ticket;
}
