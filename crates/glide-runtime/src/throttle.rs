#![forbid(unsafe_code)]

//! Leading-edge-immediate, trailing-edge-guaranteed throttling.
//!
//! A [`Throttle`] admits at most one call per interval. The first call of a
//! burst runs immediately (leading edge); calls arriving inside the interval
//! are deferred, and [`poll`](Throttle::poll) reports exactly once when the
//! interval has elapsed so the caller can run the deferred work (trailing
//! edge). A burst therefore always ends with a final call, and never more
//! than one.
//!
//! The throttle is a pure state machine over caller-supplied instants: it
//! never reads the clock and never schedules anything itself. The controller
//! uses one instance to cap the frame rate and another to coalesce rapid
//! scroll requests (latest request wins; the caller keeps the payload).
//!
//! # Invariants
//!
//! 1. [`admit`](Throttle::admit) returns `true` at most once per interval.
//! 2. After a deferred `admit`, some later `poll` returns `true` exactly
//!    once; an interleaved admitted call clears the obligation instead.
//! 3. Instants may repeat but must not go backwards; a stale `now` is
//!    treated as "still inside the interval".

use std::time::Duration;

use web_time::Instant;

/// Rate limiter over caller-supplied timestamps.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_run: Option<Instant>,
    pending: bool,
}

impl Throttle {
    /// A throttle admitting one call per `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            pending: false,
        }
    }

    /// Try to run now. `true` = run immediately (leading edge); `false` =
    /// deferred, a trailing [`poll`](Self::poll) will fire once the interval
    /// elapses.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last_run {
            Some(last) if now.saturating_duration_since(last) < self.interval => {
                self.pending = true;
                false
            }
            _ => {
                self.last_run = Some(now);
                self.pending = false;
                true
            }
        }
    }

    /// Trailing edge: `true` exactly once after a deferred
    /// [`admit`](Self::admit), as soon as the interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }
        match self.last_run {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_run = Some(now);
                self.pending = false;
                true
            }
        }
    }

    /// Whether a deferred call is waiting for its trailing edge.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// The configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Forget all history; the next [`admit`](Self::admit) runs immediately.
    pub fn reset(&mut self) {
        self.last_run = None;
        self.pending = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn throttle_10ms() -> (Throttle, Instant) {
        (Throttle::new(10 * MS), Instant::now())
    }

    #[test]
    fn first_call_runs_immediately() {
        let (mut th, t0) = throttle_10ms();
        assert!(th.admit(t0));
        assert!(!th.has_pending());
    }

    #[test]
    fn burst_defers_then_trails_once() {
        let (mut th, t0) = throttle_10ms();
        assert!(th.admit(t0));
        assert!(!th.admit(t0 + 2 * MS));
        assert!(!th.admit(t0 + 4 * MS));
        assert!(th.has_pending());

        // Not yet due.
        assert!(!th.poll(t0 + 9 * MS));
        // Due: fires exactly once.
        assert!(th.poll(t0 + 10 * MS));
        assert!(!th.poll(t0 + 11 * MS));
        assert!(!th.has_pending());
    }

    #[test]
    fn call_after_interval_runs_again() {
        let (mut th, t0) = throttle_10ms();
        assert!(th.admit(t0));
        assert!(th.admit(t0 + 10 * MS));
    }

    #[test]
    fn admitted_call_clears_trailing_obligation() {
        let (mut th, t0) = throttle_10ms();
        assert!(th.admit(t0));
        assert!(!th.admit(t0 + 5 * MS));
        // A fresh admitted call after the interval supersedes the trailing.
        assert!(th.admit(t0 + 12 * MS));
        assert!(!th.has_pending());
        assert!(!th.poll(t0 + 30 * MS));
    }

    #[test]
    fn poll_without_pending_is_inert() {
        let (mut th, t0) = throttle_10ms();
        assert!(!th.poll(t0));
        assert!(th.admit(t0));
        assert!(!th.poll(t0 + 20 * MS));
    }

    #[test]
    fn trailing_resets_the_interval() {
        let (mut th, t0) = throttle_10ms();
        assert!(th.admit(t0));
        assert!(!th.admit(t0 + 5 * MS));
        assert!(th.poll(t0 + 10 * MS));
        // The trailing run counts as a run: the next call is inside the
        // new interval and defers again.
        assert!(!th.admit(t0 + 15 * MS));
        assert!(th.poll(t0 + 20 * MS));
    }

    #[test]
    fn reset_forgets_history() {
        let (mut th, t0) = throttle_10ms();
        assert!(th.admit(t0));
        assert!(!th.admit(t0 + 1 * MS));
        th.reset();
        assert!(th.admit(t0 + 2 * MS));
    }
}
