//! One playing card and its flip state machine.
//!
//! A flip is a chain of animation phases, each waiting on one ticket:
//!
//! ```text
//! FaceDown --flip--> Shrink -> (show front) Grow -> Reveal --> FaceUp
//! FaceUp   --flip--> Conceal -> Shrink -> (show back) Grow --> FaceDown
//! ```
//!
//! The card advances only when the host hands it the ticket it is waiting
//! for. While any phase is in flight the card is locked: further `flip`
//! calls are dropped.

use serde::{Deserialize, Serialize};

use super::deal::CardName;
use crate::animation::{AnimationScheduler, Direction, Ease, Target, Tween, TweenProperty};
use crate::core::{AnimationTimings, Bounds, CardId, SessionConfig, Ticket};

/// Step within a flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipPhase {
    /// Scale to zero width.
    Shrink,
    /// Scale back to full width with the other side showing.
    Grow,
    /// Reveal transition playing forwards.
    Reveal,
    /// Reveal transition playing in reverse.
    Conceal,
}

/// Face state of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceState {
    FaceDown,
    FlippingToFront(FlipPhase),
    FaceUp,
    FlippingToBack(FlipPhase),
    /// Exit animation finished; the card is gone for good.
    Removed,
}

/// Which sprite is currently visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Back,
    Front,
}

/// Reported when a card reaches a stable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEvent {
    /// A flip ended face up.
    Revealed,
    /// A flip ended face down.
    Concealed,
    /// The exit animation ended.
    Removed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exit {
    None,
    /// Destroy was requested mid-flip; start the exit once settled.
    Deferred,
    Leaving(Ticket),
}

/// A playing card.
#[derive(Clone, Debug)]
pub struct Card {
    id: CardId,
    name: CardName,
    transition: String,
    state: FaceState,
    side: Side,
    bounds: Bounds,
    /// Ticket of the flip phase in progress.
    in_flight: Option<Ticket>,
    exit: Exit,
    timings: AnimationTimings,
}

impl Card {
    /// Create a face-down card at the origin.
    #[must_use]
    pub fn new(id: CardId, name: CardName, config: &SessionConfig) -> Self {
        Self {
            id,
            transition: name.transition(),
            name,
            state: FaceState::FaceDown,
            side: Side::Back,
            bounds: Bounds::new(config.card_width, config.card_height),
            in_flight: None,
            exit: Exit::None,
            timings: config.timings.clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &CardName {
        &self.name
    }

    /// Name of this card's reveal transition.
    #[must_use]
    pub fn transition(&self) -> &str {
        &self.transition
    }

    #[must_use]
    pub fn state(&self) -> FaceState {
        self.state
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// True while either flip is in progress.
    #[must_use]
    pub fn is_flipping(&self) -> bool {
        matches!(
            self.state,
            FaceState::FlippingToFront(_) | FaceState::FlippingToBack(_)
        )
    }

    /// True once `destroy` has been accepted.
    #[must_use]
    pub fn is_leaving(&self) -> bool {
        self.exit != Exit::None
    }

    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.state == FaceState::Removed
    }

    /// Whether this card holds `ticket` for a flip phase or its exit.
    #[must_use]
    pub fn awaits(&self, ticket: Ticket) -> bool {
        self.in_flight == Some(ticket) || self.exit == Exit::Leaving(ticket)
    }

    /// Same face, different card.
    #[must_use]
    pub fn matches(&self, other: &Card) -> bool {
        self.id != other.id && self.name == other.name
    }

    /// Hit-test against the card's current bounds.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.bounds.contains(x, y)
    }

    /// Place the card's centre. Used by layout code.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.bounds.center_x = x;
        self.bounds.center_y = y;
    }

    /// Set the card's display scale. Used by layout code.
    pub fn set_scale(&mut self, scale: f32) {
        self.bounds.scale = scale;
    }

    /// Start turning the card over.
    ///
    /// Returns `false` without scheduling anything if a flip is already in
    /// progress or the card is leaving the board.
    pub fn flip(&mut self, scheduler: &mut dyn AnimationScheduler) -> bool {
        if self.is_flipping() || self.is_leaving() {
            return false;
        }

        match self.state {
            FaceState::FaceDown => {
                self.state = FaceState::FlippingToFront(FlipPhase::Shrink);
                self.in_flight = Some(self.scale_to(scheduler, 0.0));
            }
            FaceState::FaceUp => {
                self.state = FaceState::FlippingToBack(FlipPhase::Conceal);
                self.in_flight = Some(scheduler.play_transition(
                    Target::Card(self.id),
                    &self.transition,
                    Direction::Reverse,
                ));
            }
            _ => return false,
        }

        log::trace!("{} ({}) flip started: {:?}", self.id, self.name, self.state);
        true
    }

    /// Advance on a completed animation.
    ///
    /// Tickets the card is not waiting on are ignored. Returns an event when
    /// the card settles face up, face down, or finishes leaving.
    pub fn on_animation_complete(
        &mut self,
        ticket: Ticket,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Option<CardEvent> {
        if self.exit == Exit::Leaving(ticket) {
            self.state = FaceState::Removed;
            log::trace!("{} removed", self.id);
            return Some(CardEvent::Removed);
        }
        if self.in_flight != Some(ticket) {
            return None;
        }

        let target = Target::Card(self.id);
        let state = self.state;
        let (next, event) = match state {
            FaceState::FlippingToFront(FlipPhase::Shrink) => {
                self.side = Side::Front;
                let ticket = self.scale_to(scheduler, self.bounds.scale);
                (Some((FaceState::FlippingToFront(FlipPhase::Grow), ticket)), None)
            }
            FaceState::FlippingToFront(FlipPhase::Grow) => {
                let ticket =
                    scheduler.play_transition(target, &self.transition, Direction::Forward);
                (Some((FaceState::FlippingToFront(FlipPhase::Reveal), ticket)), None)
            }
            FaceState::FlippingToFront(_) => {
                self.state = FaceState::FaceUp;
                (None, Some(CardEvent::Revealed))
            }
            FaceState::FlippingToBack(FlipPhase::Conceal) => {
                let ticket = self.scale_to(scheduler, 0.0);
                (Some((FaceState::FlippingToBack(FlipPhase::Shrink), ticket)), None)
            }
            FaceState::FlippingToBack(FlipPhase::Shrink) => {
                self.side = Side::Back;
                let ticket = self.scale_to(scheduler, self.bounds.scale);
                (Some((FaceState::FlippingToBack(FlipPhase::Grow), ticket)), None)
            }
            FaceState::FlippingToBack(_) => {
                self.state = FaceState::FaceDown;
                (None, Some(CardEvent::Concealed))
            }
            FaceState::FaceDown | FaceState::FaceUp | FaceState::Removed => return None,
        };

        match next {
            Some((state, ticket)) => {
                self.state = state;
                self.in_flight = Some(ticket);
                log::trace!("{} phase {:?}", self.id, state);
            }
            None => {
                self.in_flight = None;
                log::trace!("{} settled {:?}", self.id, self.state);
                if self.exit == Exit::Deferred {
                    self.start_exit(scheduler);
                }
            }
        }
        event
    }

    /// Slide the card off screen, then mark it removed.
    ///
    /// A card that is mid-flip finishes the flip first. Returns `false` if
    /// the card was already leaving or removed.
    pub fn destroy(&mut self, scheduler: &mut dyn AnimationScheduler) -> bool {
        if self.is_leaving() || self.is_removed() {
            return false;
        }
        if self.is_flipping() {
            self.exit = Exit::Deferred;
        } else {
            self.start_exit(scheduler);
        }
        true
    }

    fn start_exit(&mut self, scheduler: &mut dyn AnimationScheduler) {
        let slide = TweenProperty::OffsetY(self.timings.exit_offset_y);
        let tween = Tween::new(slide, self.timings.exit_ms).with_ease(Ease::ExpoIn);
        self.exit = Exit::Leaving(scheduler.play_tween(Target::Card(self.id), tween));
    }

    fn scale_to(&self, scheduler: &mut dyn AnimationScheduler, scale_x: f32) -> Ticket {
        let tween = Tween::new(TweenProperty::ScaleX(scale_x), self.timings.half_flip_ms);
        scheduler.play_tween(Target::Card(self.id), tween)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Request, Timeline};

    fn card(id: u32, name: &str) -> Card {
        Card::new(CardId(id), CardName::from(name), &SessionConfig::default())
    }

    /// Deliver every due ticket to the card, collecting its events.
    fn run(card: &mut Card, timeline: &mut Timeline) -> Vec<CardEvent> {
        let mut events = Vec::new();
        while let Some(ticket) = timeline.pop_due(u64::MAX) {
            if let Some(event) = card.on_animation_complete(ticket, timeline) {
                events.push(event);
            }
        }
        events
    }

    #[test]
    fn test_new_card() {
        let card = card(0, "card-0");

        assert_eq!(card.state(), FaceState::FaceDown);
        assert_eq!(card.side(), Side::Back);
        assert_eq!(card.transition(), "card-0-anim");
        assert!(!card.is_flipping());
        assert_eq!(card.bounds().width, 48.0);
        assert_eq!(card.bounds().height, 72.0);
    }

    #[test]
    fn test_flip_to_front_phases() {
        let mut timeline = Timeline::new();
        let mut card = card(0, "card-0");

        assert!(card.flip(&mut timeline));
        assert_eq!(card.state(), FaceState::FlippingToFront(FlipPhase::Shrink));
        assert!(card.is_flipping());

        let t = timeline.pop_due(u64::MAX).unwrap();
        assert_eq!(card.on_animation_complete(t, &mut timeline), None);
        assert_eq!(card.state(), FaceState::FlippingToFront(FlipPhase::Grow));
        assert_eq!(card.side(), Side::Front);

        let t = timeline.pop_due(u64::MAX).unwrap();
        assert_eq!(card.on_animation_complete(t, &mut timeline), None);
        assert_eq!(card.state(), FaceState::FlippingToFront(FlipPhase::Reveal));

        let t = timeline.pop_due(u64::MAX).unwrap();
        assert_eq!(card.on_animation_complete(t, &mut timeline), Some(CardEvent::Revealed));
        assert_eq!(card.state(), FaceState::FaceUp);
        assert!(!card.is_flipping());

        // 200 ms shrink + 200 ms grow + 250 ms reveal
        assert_eq!(timeline.now(), 650);
    }

    #[test]
    fn test_flip_to_back_reverses_reveal_first() {
        let mut timeline = Timeline::new();
        let mut card = card(0, "card-0");
        card.flip(&mut timeline);
        run(&mut card, &mut timeline);
        timeline.clear_log();

        assert!(card.flip(&mut timeline));
        assert_eq!(card.state(), FaceState::FlippingToBack(FlipPhase::Conceal));
        assert!(matches!(
            &timeline.requests()[0],
            Request::Transition { direction: Direction::Reverse, name, .. } if name == "card-0-anim"
        ));

        assert_eq!(run(&mut card, &mut timeline), vec![CardEvent::Concealed]);
        assert_eq!(card.state(), FaceState::FaceDown);
        assert_eq!(card.side(), Side::Back);
        assert_eq!(timeline.requests().len(), 3);
    }

    #[test]
    fn test_flip_while_flipping_is_dropped() {
        let mut timeline = Timeline::new();
        let mut card = card(0, "card-0");

        assert!(card.flip(&mut timeline));
        assert!(!card.flip(&mut timeline));
        assert!(!card.flip(&mut timeline));

        assert_eq!(timeline.pending_count(), 1);
        assert_eq!(run(&mut card, &mut timeline), vec![CardEvent::Revealed]);
    }

    #[test]
    fn test_foreign_ticket_ignored() {
        let mut timeline = Timeline::new();
        let mut card = card(0, "card-0");
        let stray = timeline.delay(1);
        card.flip(&mut timeline);

        assert_eq!(timeline.pop_due(u64::MAX), Some(stray));
        assert_eq!(card.on_animation_complete(stray, &mut timeline), None);
        assert_eq!(card.state(), FaceState::FlippingToFront(FlipPhase::Shrink));
    }

    #[test]
    fn test_matches() {
        let a1 = card(0, "A");
        let a2 = card(1, "A");
        let b = card(2, "B");

        assert!(a1.matches(&a2));
        assert!(a2.matches(&a1));
        assert!(!a1.matches(&a1));
        assert!(!a1.matches(&b));
    }

    #[test]
    fn test_destroy() {
        let mut timeline = Timeline::new();
        let mut card = card(0, "A");
        card.flip(&mut timeline);
        run(&mut card, &mut timeline);

        assert!(card.destroy(&mut timeline));
        assert!(card.is_leaving());
        assert!(!card.destroy(&mut timeline));
        assert!(!card.flip(&mut timeline));

        assert_eq!(run(&mut card, &mut timeline), vec![CardEvent::Removed]);
        assert!(card.is_removed());
        assert!(!card.destroy(&mut timeline));
    }

    #[test]
    fn test_destroy_mid_flip_waits_for_settle() {
        let mut timeline = Timeline::new();
        let mut card = card(0, "A");
        card.flip(&mut timeline);

        assert!(card.destroy(&mut timeline));
        assert!(card.is_flipping());
        assert_eq!(timeline.pending_count(), 1);

        assert_eq!(
            run(&mut card, &mut timeline),
            vec![CardEvent::Revealed, CardEvent::Removed]
        );
    }

    #[test]
    fn test_contains_point_follows_layout() {
        let mut card = card(0, "A");
        card.set_position(100.0, 100.0);
        card.set_scale(2.0);

        assert!(card.contains_point(140.0, 160.0));
        assert!(!card.contains_point(10.0, 10.0));
    }
}
