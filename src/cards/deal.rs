//! Card faces and shuffled deals.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// The identity two cards must share to match.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardName(String);

impl CardName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the reveal transition played when this face turns up.
    #[must_use]
    pub fn transition(&self) -> String {
        format!("{}-anim", self.0)
    }
}

impl From<&str> for CardName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CardName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for CardName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two copies of every name, shuffled into deal order.
///
/// Names are expected to be unique; duplicates are dealt as given.
#[must_use]
pub fn shuffled_pairs(names: &[CardName], rng: &mut GameRng) -> Vec<CardName> {
    let mut deal: Vec<CardName> = names.iter().chain(names.iter()).cloned().collect();
    rng.shuffle(&mut deal);
    deal
}
