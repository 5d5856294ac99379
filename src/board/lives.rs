//! Remaining-life indicators.
//!
//! Layout code places the shown indicators. A lost life moves its indicator
//! to the fading set, where it stays until the fade-out tween completes.

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationScheduler, Target, Tween, TweenProperty};
use crate::core::{AnimationTimings, Ticket};

/// One life indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LifeIndicator {
    /// Stable index, 0 for the first life.
    pub index: u32,
}

#[derive(Clone, Debug, Default)]
pub struct LifeIndicators {
    shown: Vec<LifeIndicator>,
    fading: Vec<(LifeIndicator, Ticket)>,
}

impl LifeIndicators {
    /// One indicator per life.
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self {
            shown: (0..count).map(|index| LifeIndicator { index }).collect(),
            fading: Vec::new(),
        }
    }

    /// Indicators still on display, not counting fading ones.
    #[must_use]
    pub fn shown(&self) -> &[LifeIndicator] {
        &self.shown
    }

    /// Indicators whose fade-out is still playing.
    pub fn fading(&self) -> impl Iterator<Item = LifeIndicator> + '_ {
        self.fading.iter().map(|&(indicator, _)| indicator)
    }

    /// Take the last shown indicator and start fading it out.
    pub fn lose_one(
        &mut self,
        scheduler: &mut dyn AnimationScheduler,
        timings: &AnimationTimings,
    ) -> Option<Ticket> {
        let indicator = self.shown.pop()?;
        let tween = Tween::new(
            TweenProperty::FadeOut {
                offset_y: timings.life_fade_offset_y,
            },
            timings.life_fade_ms,
        );
        let ticket = scheduler.play_tween(Target::LifeIndicator(indicator.index), tween);
        self.fading.push((indicator, ticket));
        Some(ticket)
    }

    /// Drop the indicator whose fade finished. Returns `false` if `ticket`
    /// belongs to none.
    pub fn on_faded(&mut self, ticket: Ticket) -> bool {
        let before = self.fading.len();
        self.fading.retain(|&(_, t)| t != ticket);
        self.fading.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Request, Timeline};

    #[test]
    fn test_new() {
        let lives = LifeIndicators::new(3);
        assert_eq!(lives.shown().len(), 3);
        assert_eq!(lives.shown()[2], LifeIndicator { index: 2 });
        assert_eq!(lives.fading().count(), 0);
    }

    #[test]
    fn test_lose_one_fades_last() {
        let mut timeline = Timeline::new();
        let mut lives = LifeIndicators::new(3);

        let ticket = lives.lose_one(&mut timeline, &AnimationTimings::default()).unwrap();
        assert_eq!(lives.shown().len(), 2);
        assert_eq!(lives.fading().collect::<Vec<_>>(), vec![LifeIndicator { index: 2 }]);
        assert!(matches!(
            timeline.requests()[0],
            Request::Tween { target: Target::LifeIndicator(2), .. }
        ));

        assert!(!lives.on_faded(crate::core::Ticket(999)));
        assert!(lives.on_faded(ticket));
        assert_eq!(lives.fading().count(), 0);
    }

    #[test]
    fn test_lose_from_empty() {
        let mut timeline = Timeline::new();
        let mut lives = LifeIndicators::new(0);

        assert!(lives.lose_one(&mut timeline, &AnimationTimings::default()).is_none());
        assert!(timeline.is_idle());
    }
}
