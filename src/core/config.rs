//! Session configuration.
//!
//! `SessionConfig` holds everything a session needs besides the card names:
//! starting lives, the deal seed, input pacing, and the cosmetic timings the
//! Board hands to the animation scheduler. Defaults suit 48x72 cards with
//! half-second pacing. Configs load from JSON with every field optional.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Durations and offsets of the Board's visual requests.
///
/// These only shape what is asked of the scheduler. The scheduler decides
/// how long a named transition (the face reveal) takes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTimings {
    /// Each half of a flip: shrink to zero width, then grow back.
    pub half_flip_ms: u64,

    /// Exit slide of a matched card.
    pub exit_ms: u64,

    /// Vertical distance of the exit slide (negative is up).
    pub exit_offset_y: f32,

    /// Float-and-fade of a lost life indicator.
    pub life_fade_ms: u64,

    /// Vertical drift of a fading life indicator.
    pub life_fade_offset_y: f32,

    /// Camera shake on a mismatch.
    pub shake_ms: u64,

    /// Camera shake strength.
    pub shake_intensity: f32,

    /// Drop-in of the win or game-over banner.
    pub banner_ms: u64,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            half_flip_ms: 200,
            exit_ms: 700,
            exit_offset_y: -1000.0,
            life_fade_ms: 300,
            life_fade_offset_y: -100.0,
            shake_ms: 300,
            shake_intensity: 0.01,
            banner_ms: 1000,
        }
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lives at the start of every session.
    pub starting_lives: u32,

    /// Seed for the deal shuffle.
    /// Same seed produces the same sequence of layouts.
    pub seed: u64,

    /// Input stays locked this long after a deal.
    pub warmup_ms: u64,

    /// Pause before mismatched cards turn back over.
    pub mismatch_delay_ms: u64,

    /// Unscaled card width.
    pub card_width: f32,

    /// Unscaled card height.
    pub card_height: f32,

    /// Key that toggles the pause overlay (case-insensitive).
    pub pause_key: char,

    /// Cosmetic animation timings.
    pub timings: AnimationTimings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_lives: 10,
            seed: 0,
            warmup_ms: 500,
            mismatch_delay_ms: 500,
            card_width: 48.0,
            card_height: 72.0,
            pause_key: 'Q',
            timings: AnimationTimings::default(),
        }
    }
}

impl SessionConfig {
    /// Set starting lives.
    #[must_use]
    pub fn with_starting_lives(mut self, lives: u32) -> Self {
        self.starting_lives = lives;
        self
    }

    /// Set the deal seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Use a random deal seed.
    #[must_use]
    pub fn with_random_seed(mut self) -> Self {
        self.seed = rand::random();
        self
    }

    /// Set the post-deal input warm-up.
    #[must_use]
    pub fn with_warmup(mut self, ms: u64) -> Self {
        self.warmup_ms = ms;
        self
    }

    /// Set the mismatch pause.
    #[must_use]
    pub fn with_mismatch_delay(mut self, ms: u64) -> Self {
        self.mismatch_delay_ms = ms;
        self
    }

    /// Set the pause key.
    #[must_use]
    pub fn with_pause_key(mut self, key: char) -> Self {
        self.pause_key = key;
        self
    }

    /// Replace the animation timings.
    #[must_use]
    pub fn with_timings(mut self, timings: AnimationTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Parse a config from JSON and validate it.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config can drive a session.
    ///
    /// Pacing delays may be zero; the flip and exit animations may not,
    /// since a zero-width flip half would complete on the same tick it was
    /// requested.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        // NaN fails this check too
        if !(self.card_width > 0.0 && self.card_height > 0.0) {
            return Err(ConfigError::InvalidCardSize {
                width: self.card_width,
                height: self.card_height,
            });
        }

        let timings = [
            ("half_flip_ms", self.timings.half_flip_ms),
            ("exit_ms", self.timings.exit_ms),
            ("life_fade_ms", self.timings.life_fade_ms),
        ];
        for (name, value) in timings {
            if value == 0 {
                return Err(ConfigError::ZeroDuration { name });
            }
        }

        Ok(())
    }
}
