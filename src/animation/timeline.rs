//! Deterministic clock-driven scheduler.
//!
//! `Timeline` keeps every outstanding request keyed by its due time. The
//! update loop pulls due tickets one at a time with [`Timeline::pop_due`],
//! so a completion that schedules a follow-up request within the same frame
//! still sees it delivered in time order.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::{AnimationScheduler, Direction, Ease, Target, Tween};
use crate::core::Ticket;

/// Reveal transitions default to 8 frames played at 32 frames per second.
const DEFAULT_TRANSITION_MS: u64 = 8 * 1000 / 32;

/// A request as it was made, kept for inspection.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    Transition {
        ticket: Ticket,
        target: Target,
        name: String,
        direction: Direction,
    },
    Tween {
        ticket: Ticket,
        target: Target,
        tween: Tween,
    },
    Delay {
        ticket: Ticket,
        duration_ms: u64,
    },
}

impl Request {
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        match self {
            Request::Transition { ticket, .. }
            | Request::Tween { ticket, .. }
            | Request::Delay { ticket, .. } => *ticket,
        }
    }

    /// The target, if the request animates something.
    #[must_use]
    pub fn target(&self) -> Option<Target> {
        match self {
            Request::Transition { target, .. } | Request::Tween { target, .. } => Some(*target),
            Request::Delay { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Span {
    started_at: u64,
    ease: Ease,
}

/// Millisecond-clock implementation of [`AnimationScheduler`].
#[derive(Clone, Debug)]
pub struct Timeline {
    now_ms: u64,
    next_ticket: u64,
    default_transition_ms: u64,
    transitions: FxHashMap<String, u64>,
    /// Outstanding requests ordered by (due time, issue order).
    pending: BTreeMap<(u64, Ticket), Span>,
    log: Vec<Request>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// Create a timeline at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_ticket: 0,
            default_transition_ms: DEFAULT_TRANSITION_MS,
            transitions: FxHashMap::default(),
            pending: BTreeMap::new(),
            log: Vec::new(),
        }
    }

    /// Set how long transitions without a registered duration take.
    #[must_use]
    pub fn with_default_transition(mut self, duration_ms: u64) -> Self {
        self.default_transition_ms = duration_ms;
        self
    }

    /// Register a transition as a frame animation.
    #[must_use]
    pub fn with_transition(
        mut self,
        name: impl Into<String>,
        frames: u32,
        frame_rate: u32,
    ) -> Self {
        let duration = u64::from(frames) * 1000 / u64::from(frame_rate.max(1));
        self.register_transition(name, duration);
        self
    }

    /// Register a transition's duration in milliseconds.
    pub fn register_transition(&mut self, name: impl Into<String>, duration_ms: u64) {
        self.transitions.insert(name.into(), duration_ms);
    }

    /// Duration of a named transition.
    #[must_use]
    pub fn transition_duration(&self, name: &str) -> u64 {
        self.transitions
            .get(name)
            .copied()
            .unwrap_or(self.default_transition_ms)
    }

    /// Current clock value.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Number of requests not yet completed.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest outstanding request.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|&(due, _)| due)
    }

    /// Remove and return the earliest request due at or before `deadline`.
    ///
    /// The clock moves to that request's due time. Returns `None` once
    /// nothing else is due; call [`Timeline::advance_to`] afterwards to land
    /// the clock on the deadline.
    pub fn pop_due(&mut self, deadline: u64) -> Option<Ticket> {
        let &(due, ticket) = self.pending.keys().next()?;
        if due > deadline {
            return None;
        }
        self.pending.remove(&(due, ticket));
        self.now_ms = self.now_ms.max(due);
        Some(ticket)
    }

    /// Move the clock forward to `deadline` (never backwards).
    pub fn advance_to(&mut self, deadline: u64) {
        self.now_ms = self.now_ms.max(deadline);
    }

    /// Eased progress of an outstanding request, `None` once complete.
    #[must_use]
    pub fn progress(&self, ticket: Ticket) -> Option<f32> {
        self.pending
            .iter()
            .find(|((_, t), _)| *t == ticket)
            .map(|(&(due, _), span)| {
                let total = due.saturating_sub(span.started_at);
                if total == 0 {
                    return span.ease.apply(1.0);
                }
                let elapsed = self.now_ms.saturating_sub(span.started_at);
                span.ease.apply(elapsed as f32 / total as f32)
            })
    }

    /// Every request made so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> &[Request] {
        &self.log
    }

    /// Requests made against one target.
    pub fn requests_for(&self, target: Target) -> impl Iterator<Item = &Request> + '_ {
        self.log.iter().filter(move |r| r.target() == Some(target))
    }

    /// Forget the request log. Pending requests are kept.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn schedule(&mut self, duration_ms: u64, ease: Ease) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        let span = Span {
            started_at: self.now_ms,
            ease,
        };
        self.pending.insert((self.now_ms.saturating_add(duration_ms), ticket), span);
        ticket
    }
}

impl AnimationScheduler for Timeline {
    fn play_transition(&mut self, target: Target, name: &str, direction: Direction) -> Ticket {
        let duration = self.transition_duration(name);
        let ticket = self.schedule(duration, Ease::Linear);
        log::trace!(
            "{} transition {} {:?} on {:?} ({} ms)",
            ticket,
            name,
            direction,
            target,
            duration
        );
        self.log.push(Request::Transition {
            ticket,
            target,
            name: name.to_string(),
            direction,
        });
        ticket
    }

    fn play_tween(&mut self, target: Target, tween: Tween) -> Ticket {
        let ticket = self.schedule(tween.duration_ms, tween.ease);
        log::trace!("{} tween {:?} on {:?}", ticket, tween.property, target);
        self.log.push(Request::Tween { ticket, target, tween });
        ticket
    }

    fn delay(&mut self, duration_ms: u64) -> Ticket {
        let ticket = self.schedule(duration_ms, Ease::Linear);
        self.log.push(Request::Delay { ticket, duration_ms });
        ticket
    }
}
