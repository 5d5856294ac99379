//! Board state and the match-resolution state machine.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::lives::{LifeIndicator, LifeIndicators};
use super::resolution::{Resolution, Route};
use super::{BoardEvent, SessionStatus};
use crate::animation::{AnimationScheduler, Banner, Ease, Target, Tween, TweenProperty};
use crate::cards::{shuffled_pairs, Card, CardEvent, CardName};
use crate::core::{CardId, CardIdAllocator, GameRng, GameRngState, SessionConfig, Ticket};

/// One memory-match session.
///
/// ## Invariants
///
/// - `opened` is unset or names a face-up card in `cards`.
/// - At most one card is flipping at a time, counting cards still leaving
///   from a previous deal.
/// - `cards` has even length outside of pair removal.
/// - Won and Lost are entered only when a resolution completes, and freeze
///   input until restart.
#[derive(Debug)]
pub struct Board {
    config: SessionConfig,
    names: Vec<CardName>,
    rng: GameRng,
    ids: CardIdAllocator,

    /// Active cards in deal order.
    cards: Vec<Card>,
    /// Removed from play; exit animation still running.
    leaving: Vec<Card>,
    opened: Option<CardId>,

    can_accept_input: bool,
    /// Warm-up elapsed; input arms once no leaving card is mid-flip.
    warmup_done: bool,
    lives: u32,
    indicators: LifeIndicators,
    status: SessionStatus,
    resolution: Resolution,

    /// Tickets the board itself is waiting on.
    routes: FxHashMap<Ticket, Route>,
    events: Vec<BoardEvent>,
    session: u32,
}

impl Board {
    /// Deal a new session: two shuffled copies of every name.
    ///
    /// Input unlocks once `config.warmup_ms` has elapsed. Names should be
    /// unique and non-empty; this is not checked.
    pub fn start_session<I, N>(
        names: I,
        config: SessionConfig,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CardName>,
    {
        let rng = GameRng::new(config.seed);
        Self::deal_from(names, config, rng, scheduler)
    }

    /// Deal a session from a captured [`Board::rng_state`].
    ///
    /// The first layout is the one the captured board would have dealt on
    /// its next restart. `config.seed` is ignored in favour of the state's.
    pub fn resume_session<I, N>(
        names: I,
        config: SessionConfig,
        rng: &GameRngState,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CardName>,
    {
        Self::deal_from(names, config, GameRng::from_state(rng), scheduler)
    }

    fn deal_from<I, N>(
        names: I,
        config: SessionConfig,
        rng: GameRng,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CardName>,
    {
        let mut board = Self {
            names: names.into_iter().map(Into::into).collect(),
            rng,
            ids: CardIdAllocator::new(),
            cards: Vec::new(),
            leaving: Vec::new(),
            opened: None,
            can_accept_input: false,
            warmup_done: false,
            lives: 0,
            indicators: LifeIndicators::default(),
            status: SessionStatus::InProgress,
            resolution: Resolution::Idle,
            routes: FxHashMap::default(),
            events: Vec::new(),
            session: 0,
            config,
        };
        board.deal(scheduler);
        board
    }

    /// Tear down every card and deal again with the same names.
    ///
    /// Lives reset to the configured start and the layout is reshuffled.
    /// Pending board continuations from the old session are dropped; cards
    /// caught mid-flip finish their flip before leaving.
    pub fn restart_session(&mut self, scheduler: &mut dyn AnimationScheduler) {
        self.can_accept_input = false;
        for mut card in std::mem::take(&mut self.cards) {
            card.destroy(scheduler);
            self.leaving.push(card);
        }
        self.routes.clear();
        self.session += 1;
        log::debug!("restarting session {}", self.session);
        self.deal(scheduler);
    }

    fn deal(&mut self, scheduler: &mut dyn AnimationScheduler) {
        let faces = shuffled_pairs(&self.names, &mut self.rng);
        let ids = &mut self.ids;
        let config = &self.config;
        self.cards = faces
            .into_iter()
            .map(|name| Card::new(ids.alloc(), name, config))
            .collect();

        self.lives = self.config.starting_lives;
        self.indicators = LifeIndicators::new(self.lives);
        self.opened = None;
        self.resolution = Resolution::Idle;
        self.status = SessionStatus::InProgress;
        self.can_accept_input = false;
        self.warmup_done = false;

        let warmup = scheduler.delay(self.config.warmup_ms);
        self.routes.insert(warmup, Route::Warmup);

        log::debug!(
            "session {} dealt {} cards, {} lives",
            self.session,
            self.cards.len(),
            self.lives
        );
        self.events.push(BoardEvent::SessionStarted {
            session: self.session,
            cards: self.cards.len(),
        });
    }

    // === Queries ===

    /// Active cards in deal order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    /// First active card under the point.
    #[must_use]
    pub fn card_at(&self, x: f32, y: f32) -> Option<CardId> {
        self.cards.iter().find(|c| c.contains_point(x, y)).map(Card::id)
    }

    /// Cards removed from play whose exit animation is still running.
    #[must_use]
    pub fn leaving(&self) -> &[Card] {
        &self.leaving
    }

    #[must_use]
    pub fn leaving_count(&self) -> usize {
        self.leaving.len()
    }

    /// The face-up card waiting for a partner.
    #[must_use]
    pub fn opened(&self) -> Option<CardId> {
        self.opened
    }

    #[must_use]
    pub fn can_accept_input(&self) -> bool {
        self.can_accept_input
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Life indicators still on display.
    #[must_use]
    pub fn life_indicators(&self) -> &[LifeIndicator] {
        self.indicators.shown()
    }

    /// Life indicators still fading out.
    pub fn fading_life_indicators(&self) -> impl Iterator<Item = LifeIndicator> + '_ {
        self.indicators.fading()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Position of the deal stream. The next restart deals from here.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Restarts so far.
    #[must_use]
    pub fn session(&self) -> u32 {
        self.session
    }

    /// Notifications raised since the last drain.
    #[must_use]
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    // === Layout ===

    /// Place an active card. Returns `false` for unknown cards.
    pub fn place(&mut self, id: CardId, x: f32, y: f32, scale: f32) -> bool {
        match self.cards.iter_mut().find(|c| c.id() == id) {
            Some(card) => {
                card.set_position(x, y);
                card.set_scale(scale);
                true
            }
            None => false,
        }
    }

    // === Resolution ===

    /// Start a resolution sequence by flipping `id`.
    ///
    /// Dropped (returning `false`) while input is locked, for the opened
    /// card, and for cards not in play.
    pub fn select(&mut self, id: CardId, scheduler: &mut dyn AnimationScheduler) -> bool {
        if !self.can_accept_input || self.opened == Some(id) {
            return false;
        }
        let Some(card) = self.cards.iter_mut().find(|c| c.id() == id) else {
            return false;
        };

        self.can_accept_input = false;
        if !card.flip(scheduler) {
            self.can_accept_input = true;
            return false;
        }
        self.resolution = Resolution::Revealing { card: id };
        true
    }

    /// Deliver a completed animation.
    ///
    /// Tickets nobody waits on (for example from before a restart) are
    /// ignored.
    pub fn on_animation_complete(
        &mut self,
        ticket: Ticket,
        scheduler: &mut dyn AnimationScheduler,
    ) {
        if let Some(route) = self.routes.remove(&ticket) {
            self.on_route(route, ticket, scheduler);
            return;
        }

        if let Some(pos) = self.cards.iter().position(|c| c.awaits(ticket)) {
            let id = self.cards[pos].id();
            if let Some(event) = self.cards[pos].on_animation_complete(ticket, scheduler) {
                self.on_card_event(id, event, scheduler);
            }
            return;
        }

        if let Some(pos) = self.leaving.iter().position(|c| c.awaits(ticket)) {
            match self.leaving[pos].on_animation_complete(ticket, scheduler) {
                Some(CardEvent::Removed) => {
                    self.leaving.remove(pos);
                }
                Some(_) => self.arm_after_warmup(),
                None => {}
            }
            return;
        }

        log::trace!("no owner for {}", ticket);
    }

    fn on_route(&mut self, route: Route, ticket: Ticket, scheduler: &mut dyn AnimationScheduler) {
        match route {
            Route::Warmup => {
                self.warmup_done = true;
                self.arm_after_warmup();
            }
            Route::Penalty => {
                if let Resolution::Penalty { first, second } = self.resolution {
                    self.resolution = Resolution::ConcealingSecond { first, second };
                    if !self.flip_card(second, scheduler) {
                        self.on_mismatch_conceal(second, scheduler);
                    }
                }
            }
            Route::LifeIndicator => {
                self.indicators.on_faded(ticket);
            }
            Route::Cosmetic => {}
        }
    }

    /// Open input for a fresh deal once the warm-up is over and every card
    /// from the previous deal has stopped flipping.
    fn arm_after_warmup(&mut self) {
        if !self.warmup_done || self.leaving.iter().any(Card::is_flipping) {
            return;
        }
        self.warmup_done = false;
        if self.status == SessionStatus::InProgress && self.resolution.is_idle() {
            self.can_accept_input = true;
            self.events.push(BoardEvent::InputReady);
        }
    }

    fn on_card_event(
        &mut self,
        id: CardId,
        event: CardEvent,
        scheduler: &mut dyn AnimationScheduler,
    ) {
        match (self.resolution, event) {
            (Resolution::Revealing { card }, CardEvent::Revealed) if card == id => {
                self.on_revealed(id, scheduler);
            }
            (Resolution::ConcealingSecond { second, .. }, CardEvent::Concealed) if second == id => {
                self.on_mismatch_conceal(id, scheduler);
            }
            (Resolution::ConcealingFirst { first }, CardEvent::Concealed) if first == id => {
                self.on_mismatch_conceal(id, scheduler);
            }
            (resolution, event) => {
                log::trace!("{} {:?} outside resolution {:?}", id, event, resolution);
            }
        }
    }

    fn on_revealed(&mut self, id: CardId, scheduler: &mut dyn AnimationScheduler) {
        let prev = match self.opened {
            Some(prev) if self.card(prev).is_some() => prev,
            _ => {
                self.opened = Some(id);
                self.resolution = Resolution::Idle;
                self.can_accept_input = true;
                self.events.push(BoardEvent::CardOpened(id));
                return;
            }
        };

        let matched = match (self.card(prev), self.card(id)) {
            (Some(a), Some(b)) => a.matches(b),
            _ => false,
        };

        if matched {
            self.remove_pair(prev, id, scheduler);
        } else {
            self.charge_mismatch(prev, id, scheduler);
        }
    }

    fn remove_pair(
        &mut self,
        first: CardId,
        second: CardId,
        scheduler: &mut dyn AnimationScheduler,
    ) {
        let mut pair: SmallVec<[Card; 2]> = SmallVec::new();
        for id in [first, second] {
            if let Some(pos) = self.cards.iter().position(|c| c.id() == id) {
                pair.push(self.cards.remove(pos));
            }
        }
        for card in &mut pair {
            card.destroy(scheduler);
        }
        self.leaving.extend(pair);

        self.opened = None;
        self.resolution = Resolution::Idle;
        self.can_accept_input = true;
        log::debug!("{} and {} matched, {} cards left", first, second, self.cards.len());
        self.events.push(BoardEvent::PairMatched { first, second });

        self.check_win(scheduler);
    }

    fn charge_mismatch(
        &mut self,
        first: CardId,
        second: CardId,
        scheduler: &mut dyn AnimationScheduler,
    ) {
        self.lives = self.lives.saturating_sub(1);
        let timings = &self.config.timings;

        if let Some(ticket) = self.indicators.lose_one(scheduler, timings) {
            self.routes.insert(ticket, Route::LifeIndicator);
        }

        let shake = Tween::new(
            TweenProperty::Shake {
                intensity: timings.shake_intensity,
            },
            timings.shake_ms,
        );
        let ticket = scheduler.play_tween(Target::Camera, shake);
        self.routes.insert(ticket, Route::Cosmetic);

        let ticket = scheduler.delay(self.config.mismatch_delay_ms);
        self.routes.insert(ticket, Route::Penalty);
        self.resolution = Resolution::Penalty { first, second };

        log::debug!("{} and {} mismatched, {} lives left", first, second, self.lives);
        self.events.push(BoardEvent::Mismatch {
            first,
            second,
            lives_left: self.lives,
        });
    }

    /// One card of a mismatched pair is face down again.
    fn on_mismatch_conceal(&mut self, id: CardId, scheduler: &mut dyn AnimationScheduler) {
        match self.resolution {
            Resolution::ConcealingSecond { first, second } if second == id => {
                self.resolution = Resolution::ConcealingFirst { first };
                if !self.flip_card(first, scheduler) {
                    self.on_mismatch_conceal(first, scheduler);
                }
            }
            Resolution::ConcealingFirst { first } if first == id => {
                self.opened = None;
                self.resolution = Resolution::Idle;
                self.can_accept_input = true;
                self.check_loss(scheduler);
            }
            _ => {}
        }
    }

    fn flip_card(&mut self, id: CardId, scheduler: &mut dyn AnimationScheduler) -> bool {
        self.cards
            .iter_mut()
            .find(|c| c.id() == id)
            .is_some_and(|card| card.flip(scheduler))
    }

    fn check_win(&mut self, scheduler: &mut dyn AnimationScheduler) {
        if self.cards.is_empty() {
            self.finish(SessionStatus::Won, scheduler);
        }
    }

    fn check_loss(&mut self, scheduler: &mut dyn AnimationScheduler) {
        if self.lives == 0 {
            self.finish(SessionStatus::Lost, scheduler);
        }
    }

    fn finish(&mut self, status: SessionStatus, scheduler: &mut dyn AnimationScheduler) {
        self.status = status;
        self.can_accept_input = false;

        let (banner, event) = match status {
            SessionStatus::Won => (Banner::Win, BoardEvent::Won),
            _ => (Banner::GameOver, BoardEvent::Lost),
        };
        let tween = Tween::new(TweenProperty::DropIn, self.config.timings.banner_ms)
            .with_ease(Ease::BounceOut);
        let ticket = scheduler.play_tween(Target::Banner(banner), tween);
        self.routes.insert(ticket, Route::Cosmetic);

        log::info!("session {} ended: {:?}", self.session, status);
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Timeline;
    use crate::cards::FaceState;

    fn settle(board: &mut Board, timeline: &mut Timeline) {
        while let Some(ticket) = timeline.pop_due(u64::MAX) {
            board.on_animation_complete(ticket, timeline);
        }
    }

    fn ready_board(names: &[&str], lives: u32) -> (Board, Timeline) {
        let mut timeline = Timeline::new();
        let config = SessionConfig::default().with_starting_lives(lives).with_seed(3);
        let mut board = Board::start_session(names.iter().copied(), config, &mut timeline);
        settle(&mut board, &mut timeline);
        (board, timeline)
    }

    /// Ids of the two cards named `name`.
    fn pair(board: &Board, name: &str) -> (CardId, CardId) {
        let ids: Vec<_> = board
            .cards()
            .iter()
            .filter(|c| c.name().as_str() == name)
            .map(Card::id)
            .collect();
        (ids[0], ids[1])
    }

    #[test]
    fn test_deal() {
        let (board, _) = ready_board(&["A", "B", "C"], 3);

        assert_eq!(board.cards().len(), 6);
        assert_eq!(board.lives(), 3);
        assert_eq!(board.life_indicators().len(), 3);
        assert!(board.opened().is_none());
        assert!(board.can_accept_input());
        assert!(board
            .cards()
            .iter()
            .all(|c| c.state() == FaceState::FaceDown));
    }

    #[test]
    fn test_select_locks_until_revealed() {
        let (mut board, mut timeline) = ready_board(&["A", "B"], 3);
        let (a1, _) = pair(&board, "A");
        let (b1, _) = pair(&board, "B");

        assert!(board.select(a1, &mut timeline));
        assert!(!board.can_accept_input());
        assert_eq!(board.resolution(), Resolution::Revealing { card: a1 });
        assert!(!board.select(b1, &mut timeline));

        settle(&mut board, &mut timeline);
        assert_eq!(board.opened(), Some(a1));
        assert!(board.can_accept_input());
        assert!(!board.select(a1, &mut timeline));
    }

    #[test]
    fn test_first_card_opens() {
        let (mut board, mut timeline) = ready_board(&["A", "B"], 3);
        let (a1, _) = pair(&board, "A");
        board.drain_events();

        board.select(a1, &mut timeline);
        settle(&mut board, &mut timeline);

        assert_eq!(board.drain_events(), vec![BoardEvent::CardOpened(a1)]);
        assert_eq!(board.card(a1).map(Card::state), Some(FaceState::FaceUp));
    }

    #[test]
    fn test_unknown_card_rejected() {
        let (mut board, mut timeline) = ready_board(&["A"], 3);

        assert!(!board.select(CardId(999), &mut timeline));
        assert!(board.can_accept_input());
    }

    #[test]
    fn test_mismatch_flips_second_card_back_first() {
        let (mut board, mut timeline) = ready_board(&["A", "B"], 3);
        let (a1, _) = pair(&board, "A");
        let (b1, _) = pair(&board, "B");

        board.select(a1, &mut timeline);
        settle(&mut board, &mut timeline);
        board.select(b1, &mut timeline);

        // Step until the penalty delay hands over to the flip-backs.
        while !matches!(board.resolution(), Resolution::ConcealingSecond { .. }) {
            let ticket = timeline.pop_due(u64::MAX).unwrap();
            board.on_animation_complete(ticket, &mut timeline);
        }
        assert!(board.card(b1).unwrap().is_flipping());
        assert!(!board.card(a1).unwrap().is_flipping());
        assert_eq!(board.opened(), Some(a1));

        while !matches!(board.resolution(), Resolution::ConcealingFirst { .. }) {
            let ticket = timeline.pop_due(u64::MAX).unwrap();
            board.on_animation_complete(ticket, &mut timeline);
        }
        assert_eq!(board.card(b1).unwrap().state(), FaceState::FaceDown);
        assert!(board.card(a1).unwrap().is_flipping());
        assert!(!board.can_accept_input());

        settle(&mut board, &mut timeline);
        assert!(board.opened().is_none());
        assert!(board.can_accept_input());
        assert_eq!(board.lives(), 2);
    }

    #[test]
    fn test_match_moves_pair_to_leaving() {
        let (mut board, mut timeline) = ready_board(&["A", "B"], 3);
        let (a1, a2) = pair(&board, "A");

        board.select(a1, &mut timeline);
        settle(&mut board, &mut timeline);
        board.select(a2, &mut timeline);
        while board.card(a2).is_some() {
            let ticket = timeline.pop_due(u64::MAX).unwrap();
            board.on_animation_complete(ticket, &mut timeline);
        }

        assert_eq!(board.cards().len(), 2);
        assert_eq!(board.leaving_count(), 2);
        assert!(board.card_at(0.0, 0.0).is_some());

        settle(&mut board, &mut timeline);
        assert_eq!(board.leaving_count(), 0);
    }

    #[test]
    fn test_place_and_hit_test() {
        let (mut board, _) = ready_board(&["A"], 3);
        let ids: Vec<_> = board.cards().iter().map(Card::id).collect();

        assert!(board.place(ids[0], 100.0, 100.0, 1.0));
        assert!(board.place(ids[1], 200.0, 100.0, 1.0));
        assert!(!board.place(CardId(999), 0.0, 0.0, 1.0));

        assert_eq!(board.card_at(100.0, 100.0), Some(ids[0]));
        assert_eq!(board.card_at(210.0, 90.0), Some(ids[1]));
        assert_eq!(board.card_at(150.0, 100.0), None);
    }

    #[test]
    fn test_warmup_ignored_after_restart() {
        let mut timeline = Timeline::new();
        let config = SessionConfig::default().with_seed(3);
        let mut board = Board::start_session(["A", "B"], config, &mut timeline);

        // Restart before the first warm-up fires; the stale warm-up must not
        // unlock the new deal early.
        timeline.advance_to(100);
        board.restart_session(&mut timeline);
        let stale = timeline.pop_due(500).unwrap();
        board.on_animation_complete(stale, &mut timeline);
        assert!(!board.can_accept_input());

        settle(&mut board, &mut timeline);
        assert!(board.can_accept_input());
        assert_eq!(board.session(), 1);
    }

    #[test]
    fn test_restart_waits_for_leaving_flip() {
        let (mut board, mut timeline) = ready_board(&["A", "B"], 3);
        let old = board.cards()[0].id();
        board.select(old, &mut timeline);
        board.restart_session(&mut timeline);

        // The warm-up ends while the old card is still mid-flip.
        let warmup_end = timeline.now() + board.config().warmup_ms;
        while let Some(ticket) = timeline.pop_due(warmup_end) {
            board.on_animation_complete(ticket, &mut timeline);
        }
        assert!(!board.can_accept_input());
        let fresh = board.cards()[0].id();
        assert!(!board.select(fresh, &mut timeline));

        settle(&mut board, &mut timeline);
        assert!(board.can_accept_input());
        assert!(board.select(fresh, &mut timeline));
    }

    #[test]
    fn test_resume_replays_next_layout() {
        let (mut board, mut timeline) = ready_board(&["A", "B", "C"], 3);
        let saved = board.rng_state();
        board.restart_session(&mut timeline);
        let expected: Vec<_> = board.cards().iter().map(|c| c.name().clone()).collect();

        let config = SessionConfig::default().with_seed(999);
        let resumed = Board::resume_session(["A", "B", "C"], config, &saved, &mut timeline);
        let dealt: Vec<_> = resumed.cards().iter().map(|c| c.name().clone()).collect();

        assert_eq!(dealt, expected);
    }
}
