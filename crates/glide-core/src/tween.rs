#![forbid(unsafe_code)]

//! The viewport tween state machine.
//!
//! A [`ViewportTween`] animates one viewport's top line from its position at
//! construction time toward a target, measuring distance in visual rows
//! through a [`FoldMap`]. The driving loop calls
//! [`update`](ViewportTween::update) once per frame; each call interpolates
//! the top line, reconciles the cursor against the margin band, writes both
//! to the host, and reports whether the animation should continue.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed → Animating → Arrived    (reached the target)
//!                         → Cancelled  (superseded, stopped, or viewport gone)
//!                         → Detached   (tab switched away: snap to target)
//! ```
//!
//! # Invariants
//!
//! 1. `min_line ≤ target_line ≤ max_line`.
//! 2. `target_line` is reachable from the original top line by
//!    `scroll_delta` visual-row steps through the fold map — never a line
//!    strictly inside a closed region.
//! 3. `scroll_delta` and `target_line` are fixed at construction; the only
//!    later adjustment is the one-time cursor re-anchor switch.
//! 4. After invalidation, at most one further observable write happens (the
//!    termination write), and only on the tick that observes it.
//!
//! # Cursor re-anchor
//!
//! When an upward tween pins the top line at line 1 before its progression
//! is spent, the remaining motion transfers to the cursor: the cursor
//! position at that moment is recorded, the rows already covered by the top
//! line are subtracted from the requested delta, and the cursor animates the
//! remainder over the rest of the duration. The switch arms on the tick
//! after the top first reaches line 1 and fires at most once per tween.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};
use web_time::Instant;

use crate::clock::AnimationClock;
use crate::easing::Easing;
use crate::error::ScrollError;
use crate::fold::FoldMap;
use crate::host::{ScrollHost, ViewPose, ViewportId};

/// Duration used when a spec does not name one.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Lifecycle state of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    /// Built, no tick has run yet.
    Constructed,
    /// At least one tick has run; the animation is in flight.
    Animating,
    /// Reached its target.
    Arrived,
    /// Invalidated — superseded, explicitly stopped, or the viewport vanished.
    Cancelled,
    /// The viewport left the active tab mid-flight; position was snapped to
    /// the target and the animation stopped.
    Detached,
}

/// Why a tween finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The animation completed at its target.
    Arrived,
    /// The tween was invalidated before arriving.
    Cancelled,
    /// The viewport became inactive; position snapped to the target.
    Detached,
    /// The viewport no longer exists (or a write to it failed).
    ViewportGone,
}

/// Outcome of one [`ViewportTween::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenStep {
    /// Keep scheduling ticks.
    Continue,
    /// Stop; release the tween.
    Finished(FinishReason),
}

/// Parameters for one scroll animation.
///
/// Motion must be given as either a signed visual-row delta
/// ([`TweenSpec::rows`]) or an absolute target line ([`TweenSpec::to_line`]);
/// supplying neither fails construction with
/// [`ScrollError::MissingMotion`]. When both are set the explicit row delta
/// wins. Duration and easing fall back to [`DEFAULT_DURATION`] and the
/// family defaults when unset.
#[derive(Debug, Clone, Default)]
pub struct TweenSpec {
    rows: Option<f64>,
    target_line: Option<usize>,
    duration: Option<Duration>,
    easing: Option<Easing>,
    lock_cursor: bool,
}

impl TweenSpec {
    /// Relative motion: a signed visual-row delta (positive scrolls down).
    #[must_use]
    pub fn rows(rows: f64) -> Self {
        Self {
            rows: Some(rows),
            ..Self::default()
        }
    }

    /// Absolute motion: bring `line` to the top of the viewport.
    #[must_use]
    pub fn to_line(line: usize) -> Self {
        Self {
            target_line: Some(line),
            ..Self::default()
        }
    }

    /// Set an explicit duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set an explicit easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Keep the cursor on its content line; only the margin band may move it.
    #[must_use]
    pub fn with_lock_cursor(mut self, lock: bool) -> Self {
        self.lock_cursor = lock;
        self
    }

    /// Fill in a duration only if none was set.
    #[must_use]
    pub fn or_duration(mut self, duration: Duration) -> Self {
        self.duration.get_or_insert(duration);
        self
    }

    /// Fill in an easing curve only if none was set.
    #[must_use]
    pub fn or_easing(mut self, easing: Easing) -> Self {
        self.easing.get_or_insert(easing);
        self
    }

    /// Whether the spec carries any motion at all.
    #[must_use]
    pub fn has_motion(&self) -> bool {
        self.rows.is_some() || self.target_line.is_some()
    }

    /// Whether the cursor is locked to its content line.
    #[must_use]
    pub fn is_lock_cursor(&self) -> bool {
        self.lock_cursor
    }
}

/// Remaining cursor motion after the top line pinned at line 1.
#[derive(Debug, Clone, Copy)]
struct Reanchor {
    /// Cursor line recorded at the moment the switch fired.
    cursor: usize,
    /// Rows still owed to the cursor (negative: upward).
    remaining: f64,
    /// Eased progression at the moment the switch fired; the remainder of
    /// the progression interval is renormalized over it.
    progress_base: f64,
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// One in-flight scroll animation for one viewport.
#[derive(Debug)]
pub struct ViewportTween {
    viewport: ViewportId,
    min_line: usize,
    max_line: usize,
    line_count: usize,
    height: usize,
    margin: usize,
    orig_top: usize,
    orig_cursor: usize,
    scroll_delta: f64,
    target_line: usize,
    fold_map: Arc<FoldMap>,
    clock: AnimationClock,
    lock_cursor: bool,
    reanchor: Option<Reanchor>,
    top_hit_first_line: bool,
    state: TweenState,
}

impl ViewportTween {
    /// Build a fresh tween, scanning its own fold map from the host.
    pub fn new<H: ScrollHost + ?Sized>(
        host: &H,
        viewport: ViewportId,
        spec: &TweenSpec,
        now: Instant,
    ) -> Result<Self, ScrollError> {
        Self::build(host, viewport, spec, None, Duration::ZERO, now)
    }

    /// Build a continuation tween that takes over from the viewport's
    /// current animated position, reusing the superseded tween's fold map.
    ///
    /// The clock is back-dated by `backdate` (typically one frame interval)
    /// to compensate for construction latency. Folds are assumed unchanged
    /// since the shared map was scanned.
    pub fn continuation<H: ScrollHost + ?Sized>(
        host: &H,
        viewport: ViewportId,
        spec: &TweenSpec,
        fold_map: Arc<FoldMap>,
        backdate: Duration,
        now: Instant,
    ) -> Result<Self, ScrollError> {
        Self::build(host, viewport, spec, Some(fold_map), backdate, now)
    }

    fn build<H: ScrollHost + ?Sized>(
        host: &H,
        viewport: ViewportId,
        spec: &TweenSpec,
        shared_map: Option<Arc<FoldMap>>,
        backdate: Duration,
        now: Instant,
    ) -> Result<Self, ScrollError> {
        if !spec.has_motion() {
            return Err(ScrollError::MissingMotion);
        }
        let pose = host
            .pose(viewport)
            .ok_or(ScrollError::ViewportGone(viewport))?;

        let line_count = host.line_count(viewport).max(1);
        let height = host.height(viewport).max(1);
        let margin = host.scrolloff(viewport).min(height / 2);
        let min_line = 1;

        // Highest admissible top line: last line at the bottom row, pulled
        // back to the start of any closed region containing it, then reduced
        // by the margin.
        let mut max_line = line_count
            .saturating_sub(height)
            .saturating_add(1)
            .max(min_line);
        if let Some(start) = host.fold_start(viewport, max_line) {
            max_line = start.max(min_line);
        }
        max_line = max_line.saturating_sub(margin).max(min_line);

        let orig_top = pose.top_line;
        let orig_cursor = pose.cursor_line;

        let is_continuation = shared_map.is_some();
        let fold_map = match shared_map {
            Some(map) => map,
            None => Arc::new(match spec.rows {
                Some(rows) => FoldMap::delta_scan(host, viewport, orig_top, rows),
                None => {
                    let to = spec
                        .target_line
                        .unwrap_or(orig_top)
                        .clamp(min_line, max_line);
                    FoldMap::range_scan(host, viewport, orig_top, to)
                }
            }),
        };

        let scroll_delta = match spec.rows {
            Some(rows) => rows,
            None => {
                let to = spec
                    .target_line
                    .unwrap_or(orig_top)
                    .clamp(min_line, max_line);
                fold_map.steps_between(orig_top, to) as f64
            }
        };
        let target_line = fold_map
            .step_from(orig_top, scroll_delta.round() as i64)
            .clamp(min_line, max_line);

        let easing = spec.easing.unwrap_or(if is_continuation {
            Easing::CONTINUATION
        } else {
            Easing::DEFAULT
        });
        let mut clock =
            AnimationClock::new(spec.duration.unwrap_or(DEFAULT_DURATION), easing, now);
        clock.backdate(backdate);

        debug!(
            viewport = viewport.0,
            orig_top,
            scroll_delta,
            target_line,
            continuation = is_continuation,
            "tween constructed"
        );

        Ok(Self {
            viewport,
            min_line,
            max_line,
            line_count,
            height,
            margin,
            orig_top,
            orig_cursor,
            scroll_delta,
            target_line,
            fold_map,
            clock,
            lock_cursor: spec.lock_cursor,
            reanchor: None,
            top_hit_first_line: false,
            state: TweenState::Constructed,
        })
    }

    // -- distance ----------------------------------------------------------

    /// Signed visual-row distance from `from` to `to`, with `to` clamped to
    /// the tween's maximum top line first.
    #[must_use]
    pub fn get_scroll_delta(&self, from: usize, to: usize) -> i64 {
        let to = to.min(self.max_line).max(self.min_line);
        self.fold_map.steps_between(from, to)
    }

    /// Content line reached after `rows` visual-row steps from `line`,
    /// clamped to the admissible top-line range. Fractional rows are rounded
    /// to the nearest whole step.
    #[must_use]
    pub fn resolve_scroll_delta(&self, line: usize, rows: f64) -> usize {
        self.fold_map
            .step_from(line, rows.round() as i64)
            .clamp(self.min_line, self.max_line)
    }

    /// Cursor-space variant: clamped to the content range instead of the
    /// top-line range (the cursor may sit below the highest top line).
    fn resolve_cursor(&self, line: usize, rows: f64) -> usize {
        self.fold_map
            .step_from(line, rows.round() as i64)
            .clamp(self.min_line, self.line_count)
    }

    /// Clamp `cursor` into the margin band of a viewport whose top line is
    /// `top`. The lower bound is `top` itself near the start of the content
    /// (margin is not enforced above line 1).
    fn clamp_to_band(&self, top: usize, cursor: usize) -> usize {
        let lower = if top <= self.margin {
            top
        } else {
            self.resolve_cursor(top, self.margin as f64)
        };
        let upper = self
            .resolve_cursor(top, self.height.saturating_sub(self.margin + 1) as f64)
            .max(lower);
        cursor.clamp(lower, upper)
    }

    // -- per-frame update ---------------------------------------------------

    /// Advance the animation to `now` and write the resulting position to
    /// the host. Called by the driving loop once per frame.
    pub fn update<H: ScrollHost + ?Sized>(&mut self, host: &mut H, now: Instant) -> TweenStep {
        if let Some(reason) = self.finish_reason() {
            return TweenStep::Finished(reason);
        }
        if self.clock.is_invalidated() {
            self.state = TweenState::Cancelled;
            return TweenStep::Finished(FinishReason::Cancelled);
        }
        let Some(pose) = host.pose(self.viewport) else {
            self.state = TweenState::Cancelled;
            return TweenStep::Finished(FinishReason::ViewportGone);
        };
        if !host.is_active(self.viewport) {
            return self.detach(host, pose);
        }
        self.state = TweenState::Animating;

        if !self.clock.is_alive_at(now) {
            // Progression spent: settle the final frame exactly once.
            return self.finish_at_target(host, pose);
        }

        let p = self.clock.progress_at(now);

        // The re-anchor switch arms one tick after the top reaches line 1.
        if self.top_hit_first_line
            && self.reanchor.is_none()
            && !self.lock_cursor
            && self.scroll_delta < 0.0
        {
            let covered = self.fold_map.steps_between(self.orig_top, self.min_line) as f64;
            self.reanchor = Some(Reanchor {
                cursor: pose.cursor_line,
                remaining: self.scroll_delta - covered,
                progress_base: p,
            });
            trace!(
                viewport = self.viewport.0,
                cursor = pose.cursor_line,
                "cursor re-anchored at content top"
            );
        }

        let top = if self.reanchor.is_some() {
            self.min_line
        } else {
            self.resolve_scroll_delta(self.orig_top, self.scroll_delta * p)
        };

        let cursor = match self.reanchor {
            Some(re) => {
                let span = (1.0 - re.progress_base).max(f64::EPSILON);
                let q = ((p - re.progress_base) / span).clamp(0.0, 1.0);
                self.resolve_cursor(re.cursor, re.remaining * q)
            }
            None if self.lock_cursor => pose.cursor_line,
            None => self.resolve_cursor(self.orig_cursor, self.scroll_delta * p),
        };
        let cursor = self.clamp_to_band(top, cursor);

        if self.scroll_delta < 0.0 && top == self.min_line {
            self.top_hit_first_line = true;
        }

        if !host.set_pose(
            self.viewport,
            ViewPose {
                top_line: top,
                cursor_line: cursor,
                ..pose
            },
        ) {
            self.state = TweenState::Cancelled;
            return TweenStep::Finished(FinishReason::ViewportGone);
        }

        if top == self.target_line && self.cursor_converged(top, cursor) {
            self.state = TweenState::Arrived;
            trace!(viewport = self.viewport.0, top, cursor, "tween arrived");
            return TweenStep::Finished(FinishReason::Arrived);
        }
        TweenStep::Continue
    }

    /// Whether the cursor side of the animation has nothing left to do.
    fn cursor_converged(&self, top: usize, cursor: usize) -> bool {
        match self.reanchor {
            Some(re) => cursor == self.clamp_to_band(top, self.resolve_cursor(re.cursor, re.remaining)),
            None => !self.reanchor_pending(top),
        }
    }

    /// Whether the re-anchor switch is about to fire: the top is pinned at
    /// line 1 with at least one whole row still owed to the cursor.
    fn reanchor_pending(&self, top: usize) -> bool {
        if self.lock_cursor || self.scroll_delta >= 0.0 || top != self.min_line {
            return false;
        }
        let covered = self.fold_map.steps_between(self.orig_top, self.min_line) as f64;
        self.scroll_delta - covered < -0.5
    }

    fn detach<H: ScrollHost + ?Sized>(&mut self, host: &mut H, pose: ViewPose) -> TweenStep {
        let (top, cursor) = self.final_position(pose);
        // The viewport may be half torn down; a failed write is fine here.
        let _ = host.set_pose(
            self.viewport,
            ViewPose {
                top_line: top,
                cursor_line: cursor,
                ..pose
            },
        );
        self.state = TweenState::Detached;
        debug!(viewport = self.viewport.0, top, "tween detached, snapped to target");
        TweenStep::Finished(FinishReason::Detached)
    }

    fn finish_at_target<H: ScrollHost + ?Sized>(
        &mut self,
        host: &mut H,
        pose: ViewPose,
    ) -> TweenStep {
        let (top, cursor) = self.final_position(pose);
        if !host.set_pose(
            self.viewport,
            ViewPose {
                top_line: top,
                cursor_line: cursor,
                ..pose
            },
        ) {
            self.state = TweenState::Cancelled;
            return TweenStep::Finished(FinishReason::ViewportGone);
        }
        self.state = TweenState::Arrived;
        trace!(viewport = self.viewport.0, top, cursor, "tween arrived");
        TweenStep::Finished(FinishReason::Arrived)
    }

    /// Final resolved position: target top line plus the fully-travelled,
    /// band-clamped cursor.
    fn final_position(&self, pose: ViewPose) -> (usize, usize) {
        let top = self.target_line;
        let cursor = match self.reanchor {
            Some(re) => self.resolve_cursor(re.cursor, re.remaining),
            None if self.lock_cursor => pose.cursor_line,
            None => self.resolve_cursor(self.orig_cursor, self.scroll_delta),
        };
        (top, self.clamp_to_band(top, cursor))
    }

    // -- lifecycle ----------------------------------------------------------

    /// Invalidate this tween. Idempotent; an arrived/detached tween keeps
    /// its terminal state.
    pub fn cancel(&mut self) {
        self.clock.invalidate();
        if !self.is_done() {
            self.state = TweenState::Cancelled;
        }
    }

    /// Whether the tween reached a terminal state.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.finish_reason().is_some()
    }

    fn finish_reason(&self) -> Option<FinishReason> {
        match self.state {
            TweenState::Arrived => Some(FinishReason::Arrived),
            TweenState::Cancelled => Some(FinishReason::Cancelled),
            TweenState::Detached => Some(FinishReason::Detached),
            TweenState::Constructed | TweenState::Animating => None,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> TweenState {
        self.state
    }

    /// The viewport this tween animates.
    #[must_use]
    pub fn viewport(&self) -> ViewportId {
        self.viewport
    }

    /// The resolved target top line.
    #[must_use]
    pub fn target_line(&self) -> usize {
        self.target_line
    }

    /// The requested motion in visual rows.
    #[must_use]
    pub fn scroll_delta(&self) -> f64 {
        self.scroll_delta
    }

    /// The fold map snapshot, shareable with a continuation.
    #[must_use]
    pub fn fold_map(&self) -> &Arc<FoldMap> {
        &self.fold_map
    }

    /// The tween's clock.
    #[must_use]
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedHost;

    const VP: ViewportId = ViewportId(1);
    const MS: Duration = Duration::from_millis(1);

    fn linear() -> Easing {
        Easing::sine(1e-3, 0.0)
    }

    fn spec_rows(rows: f64) -> TweenSpec {
        TweenSpec::rows(rows)
            .with_duration(Duration::from_millis(100))
            .with_easing(linear())
    }

    fn t0() -> Instant {
        Instant::now()
    }

    // ---- construction -----------------------------------------------------

    #[test]
    fn missing_motion_is_a_contract_violation() {
        let host = ScriptedHost::new(100, 20, 2);
        let err = ViewportTween::new(&host, VP, &TweenSpec::default(), t0()).unwrap_err();
        assert_eq!(err, ScrollError::MissingMotion);
    }

    #[test]
    fn gone_viewport_fails_construction() {
        let host = ScriptedHost::new(100, 20, 2);
        let err =
            ViewportTween::new(&host, ViewportId(99), &spec_rows(5.0), t0()).unwrap_err();
        assert_eq!(err, ScrollError::ViewportGone(ViewportId(99)));
    }

    #[test]
    fn target_from_rows_without_folds() {
        let host = ScriptedHost::new(100, 20, 2);
        let tween = ViewportTween::new(&host, VP, &spec_rows(10.0), t0()).unwrap();
        assert_eq!(tween.target_line(), 11);
        assert_eq!(tween.state(), TweenState::Constructed);
    }

    #[test]
    fn target_from_absolute_line_matches_rows() {
        let host = ScriptedHost::new(100, 20, 2);
        let by_line = ViewportTween::new(
            &host,
            VP,
            &TweenSpec::to_line(11).with_duration(Duration::from_millis(100)),
            t0(),
        )
        .unwrap();
        assert_eq!(by_line.target_line(), 11);
        assert_eq!(by_line.scroll_delta(), 10.0);
    }

    #[test]
    fn target_clamps_to_max_top_line() {
        // 100 lines, height 20, margin 2: max top = 100 - 20 + 1 - 2 = 79.
        let host = ScriptedHost::new(100, 20, 2);
        let tween =
            ViewportTween::new(&host, VP, &TweenSpec::to_line(95), t0()).unwrap();
        assert_eq!(tween.target_line(), 79);
    }

    #[test]
    fn target_steps_over_folds() {
        let host = ScriptedHost::new(100, 20, 0).with_fold(10, 20);
        let mut pose = ViewPose::origin();
        pose.top_line = 8;
        pose.cursor_line = 8;
        let host = host.with_pose(VP, pose);
        let tween = ViewportTween::new(&host, VP, &spec_rows(5.0), t0()).unwrap();
        // 8 → 9 → 10 → 21 → 22 → 23: the whole region is one visual row.
        assert_eq!(tween.target_line(), 23);
    }

    #[test]
    fn fixture_distance_round_trip() {
        let host = ScriptedHost::new(100, 20, 0).with_fold(10, 20);
        let mut pose = ViewPose::origin();
        pose.top_line = 9;
        pose.cursor_line = 9;
        let host = host.with_pose(VP, pose);
        let tween = ViewportTween::new(&host, VP, &spec_rows(13.0), t0()).unwrap();
        assert_eq!(tween.get_scroll_delta(9, 22), 3);
        assert_eq!(tween.resolve_scroll_delta(9, 3.0), 22);
        assert_eq!(tween.resolve_scroll_delta(9, 0.0), 9);
    }

    // ---- update -----------------------------------------------------------

    #[test]
    fn animates_to_target_and_arrives() {
        let mut host = ScriptedHost::new(100, 20, 2);
        let start = t0();
        let mut tween = ViewportTween::new(&host, VP, &spec_rows(10.0), start).unwrap();

        assert_eq!(tween.update(&mut host, start), TweenStep::Continue);
        assert_eq!(tween.update(&mut host, start + 50 * MS), TweenStep::Continue);
        let mid = host.pose(VP).unwrap();
        assert!(mid.top_line > 1 && mid.top_line < 11, "mid top {}", mid.top_line);

        assert_eq!(
            tween.update(&mut host, start + 101 * MS),
            TweenStep::Finished(FinishReason::Arrived)
        );
        let done = host.pose(VP).unwrap();
        assert_eq!(done.top_line, 11);
        assert!((13..=28).contains(&done.cursor_line), "cursor {}", done.cursor_line);
        assert_eq!(tween.state(), TweenState::Arrived);
    }

    #[test]
    fn finished_tween_stays_finished() {
        let mut host = ScriptedHost::new(100, 20, 2);
        let start = t0();
        let mut tween = ViewportTween::new(&host, VP, &spec_rows(10.0), start).unwrap();
        tween.update(&mut host, start + 200 * MS);
        let writes = host.writes().len();
        assert_eq!(
            tween.update(&mut host, start + 300 * MS),
            TweenStep::Finished(FinishReason::Arrived)
        );
        // No further writes once terminal.
        assert_eq!(host.writes().len(), writes);
    }

    #[test]
    fn cancelled_tween_terminates_without_writing() {
        let mut host = ScriptedHost::new(100, 20, 2);
        let start = t0();
        let mut tween = ViewportTween::new(&host, VP, &spec_rows(10.0), start).unwrap();
        tween.update(&mut host, start);
        let writes = host.writes().len();

        tween.cancel();
        assert_eq!(
            tween.update(&mut host, start + 10 * MS),
            TweenStep::Finished(FinishReason::Cancelled)
        );
        assert_eq!(host.writes().len(), writes);
        assert_eq!(tween.state(), TweenState::Cancelled);
    }

    #[test]
    fn vanished_viewport_terminates() {
        let mut host = ScriptedHost::new(100, 20, 2);
        let start = t0();
        let mut tween = ViewportTween::new(&host, VP, &spec_rows(10.0), start).unwrap();
        tween.update(&mut host, start);

        host.close_viewport(VP);
        assert_eq!(
            tween.update(&mut host, start + 10 * MS),
            TweenStep::Finished(FinishReason::ViewportGone)
        );
    }

    #[test]
    fn tab_switch_snaps_to_target() {
        let mut host = ScriptedHost::new(100, 20, 2);
        let start = t0();
        let mut tween = ViewportTween::new(&host, VP, &spec_rows(10.0), start).unwrap();
        tween.update(&mut host, start);

        host.set_inactive(VP);
        assert_eq!(
            tween.update(&mut host, start + 10 * MS),
            TweenStep::Finished(FinishReason::Detached)
        );
        assert_eq!(host.pose(VP).unwrap().top_line, 11);
        assert_eq!(tween.state(), TweenState::Detached);
    }

    #[test]
    fn lock_cursor_keeps_line_until_band_pushes() {
        let mut host = ScriptedHost::new(100, 20, 2);
        let start = t0();
        let spec = spec_rows(10.0).with_lock_cursor(true);
        let mut tween = ViewportTween::new(&host, VP, &spec, start).unwrap();

        tween.update(&mut host, start + 101 * MS);
        let done = host.pose(VP).unwrap();
        assert_eq!(done.top_line, 11);
        // Cursor was on line 1; the band's lower edge carries it to 11 + 2.
        assert_eq!(done.cursor_line, 13);
    }

    #[test]
    fn reanchor_transfers_remaining_rows_to_cursor() {
        let host = ScriptedHost::new(100, 20, 0);
        let mut pose = ViewPose::origin();
        pose.top_line = 30;
        pose.cursor_line = 40;
        let mut host = host.with_pose(VP, pose);

        let start = t0();
        let mut tween = ViewportTween::new(&host, VP, &spec_rows(-35.0), start).unwrap();
        assert_eq!(tween.target_line(), 1);

        // Top covers its 29 rows by p = 29/35 ≈ 0.83; drive past that point.
        assert_eq!(tween.update(&mut host, start + 84 * MS), TweenStep::Continue);
        assert_eq!(host.pose(VP).unwrap().top_line, 1);
        let at_top = host.pose(VP).unwrap().cursor_line;
        assert_eq!(at_top, 11);

        // Next tick arms the re-anchor; the cursor owes 6 more rows.
        assert_eq!(tween.update(&mut host, start + 90 * MS), TweenStep::Continue);
        assert_eq!(tween.update(&mut host, start + 95 * MS), TweenStep::Continue);
        let moving = host.pose(VP).unwrap().cursor_line;
        assert!(moving < at_top, "cursor should keep travelling, at {moving}");

        assert_eq!(
            tween.update(&mut host, start + 101 * MS),
            TweenStep::Finished(FinishReason::Arrived)
        );
        let done = host.pose(VP).unwrap();
        assert_eq!(done.top_line, 1);
        assert_eq!(done.cursor_line, 5);
    }

    #[test]
    fn zero_rows_arrives_immediately() {
        let mut host = ScriptedHost::new(100, 20, 2);
        let start = t0();
        let mut tween = ViewportTween::new(&host, VP, &spec_rows(0.0), start).unwrap();
        assert_eq!(tween.target_line(), 1);
        assert_eq!(
            tween.update(&mut host, start),
            TweenStep::Finished(FinishReason::Arrived)
        );
    }

    #[test]
    fn max_line_retreats_from_covering_fold() {
        // Fold [75, 85] contains the natural max top line 81.
        let host = ScriptedHost::new(100, 20, 0).with_fold(75, 85);
        let tween =
            ViewportTween::new(&host, VP, &TweenSpec::to_line(200), t0()).unwrap();
        assert_eq!(tween.target_line(), 75);
    }
}
