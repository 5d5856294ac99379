//! Configuration errors.
//!
//! Gameplay itself never errors: rejected input is a silent no-op. Only a
//! bad `SessionConfig` is reported, before any card is dealt.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("starting lives must be at least 1")]
    NoLives,

    #[error("timing `{name}` must be non-zero")]
    ZeroDuration { name: &'static str },

    #[error("card size must be positive, got {width}x{height}")]
    InvalidCardSize { width: f32, height: f32 },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}
