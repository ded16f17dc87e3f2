#![forbid(unsafe_code)]

//! The per-viewport scroll controller.
//!
//! A [`ScrollController`] owns at most one live [`ViewportTween`] per
//! viewport. Scroll requests either start a fresh tween, splice a
//! *continuation* onto an in-flight one (taking over from the current
//! animated position with a sharper curve and the predecessor's fold map),
//! or — inside the coalescing window — replace a still-pending request so
//! that a burst of repeated input produces a single animation.
//!
//! The host pumps [`on_frame`](ScrollController::on_frame) from its redraw
//! loop while anything is animating. Each pumped frame first applies a
//! pending coalesced request (trailing edge), then — frame-rate permitting —
//! advances every live tween and releases the ones that finished.
//!
//! # Invariants
//!
//! 1. At most one valid (not-done) tween per viewport; replacement
//!    invalidates the predecessor before the successor is built.
//! 2. A superseded or stopped tween performs no further writes.
//! 3. `ViewportId::CURRENT` is resolved against the host before slotting,
//!    so sentinel and concrete requests for the focused viewport share one
//!    slot.
//!
//! # Staleness
//!
//! A continuation reuses the superseded tween's fold map without
//! re-scanning. Content edits landing mid-flight can leave that map stale
//! for the remainder of the animation; this is an accepted tradeoff.

use std::sync::Arc;

use ahash::AHashMap;
use tracing::{debug, trace};
use web_time::Instant;

use glide_core::{
    FoldMap, ScrollError, ScrollHost, TweenSpec, TweenStep, ViewportId, ViewportTween,
};

use crate::config::ScrollConfig;
use crate::throttle::Throttle;

/// Named convenience motions computed from the current viewport geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    /// Scroll down half the viewport height.
    HalfPageDown,
    /// Scroll up half the viewport height.
    HalfPageUp,
    /// Scroll down a full viewport height.
    PageDown,
    /// Scroll up a full viewport height.
    PageUp,
    /// Scroll so the cursor row sits at the top of the viewport (margin
    /// permitting).
    CursorToTop,
    /// Scroll so the cursor row sits at the center of the viewport.
    CursorToCenter,
    /// Scroll so the cursor row sits at the bottom of the viewport (margin
    /// permitting).
    CursorToBottom,
}

/// Per-viewport scroll entry point: owns the live tween slots, the frame
/// gate, and request coalescing.
#[derive(Debug)]
pub struct ScrollController {
    config: ScrollConfig,
    slots: AHashMap<ViewportId, ViewportTween>,
    frame_gate: Throttle,
    request_gate: Throttle,
    pending: Option<(ViewportId, TweenSpec)>,
}

impl ScrollController {
    /// Controller with the given configuration.
    #[must_use]
    pub fn new(config: ScrollConfig) -> Self {
        let frame_gate = Throttle::new(config.frame_interval);
        let request_gate = Throttle::new(config.coalesce_interval());
        Self {
            config,
            slots: AHashMap::new(),
            frame_gate,
            request_gate,
            pending: None,
        }
    }

    /// Controller with [`ScrollConfig::default`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ScrollConfig::default())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    // -- scroll requests ----------------------------------------------------

    /// Scroll `viewport` by a signed number of visual rows.
    pub fn scroll<H: ScrollHost + ?Sized>(
        &mut self,
        host: &H,
        viewport: ViewportId,
        rows: f64,
    ) -> Result<(), ScrollError> {
        self.scroll_spec_at(host, Instant::now(), viewport, TweenSpec::rows(rows))
    }

    /// [`scroll`](Self::scroll) with an explicit timestamp.
    pub fn scroll_at<H: ScrollHost + ?Sized>(
        &mut self,
        host: &H,
        now: Instant,
        viewport: ViewportId,
        rows: f64,
    ) -> Result<(), ScrollError> {
        self.scroll_spec_at(host, now, viewport, TweenSpec::rows(rows))
    }

    /// Animate `viewport` until `line` is its top line.
    pub fn scroll_to_line<H: ScrollHost + ?Sized>(
        &mut self,
        host: &H,
        viewport: ViewportId,
        line: usize,
    ) -> Result<(), ScrollError> {
        self.scroll_spec_at(host, Instant::now(), viewport, TweenSpec::to_line(line))
    }

    /// Full-control entry point: any [`TweenSpec`], wall-clock timestamp.
    pub fn scroll_spec<H: ScrollHost + ?Sized>(
        &mut self,
        host: &H,
        viewport: ViewportId,
        spec: TweenSpec,
    ) -> Result<(), ScrollError> {
        self.scroll_spec_at(host, Instant::now(), viewport, spec)
    }

    /// Full-control entry point with an explicit timestamp.
    ///
    /// Requests arriving inside the coalescing window replace each other;
    /// the last one is applied on a later frame (trailing edge). A spec
    /// without motion fails immediately — it is a caller bug, not input to
    /// be coalesced away.
    pub fn scroll_spec_at<H: ScrollHost + ?Sized>(
        &mut self,
        host: &H,
        now: Instant,
        viewport: ViewportId,
        spec: TweenSpec,
    ) -> Result<(), ScrollError> {
        if !spec.has_motion() {
            return Err(ScrollError::MissingMotion);
        }
        if self.request_gate.admit(now) {
            self.pending = None;
            self.start_tween(host, now, viewport, spec)
        } else {
            trace!(viewport = viewport.0, "scroll request coalesced");
            self.pending = Some((viewport, spec));
            Ok(())
        }
    }

    /// Run a named convenience action against the current geometry.
    pub fn perform<H: ScrollHost + ?Sized>(
        &mut self,
        host: &H,
        viewport: ViewportId,
        action: ScrollAction,
    ) -> Result<(), ScrollError> {
        self.perform_at(host, Instant::now(), viewport, action)
    }

    /// [`perform`](Self::perform) with an explicit timestamp.
    pub fn perform_at<H: ScrollHost + ?Sized>(
        &mut self,
        host: &H,
        now: Instant,
        viewport: ViewportId,
        action: ScrollAction,
    ) -> Result<(), ScrollError> {
        let viewport = self.resolve(host, viewport);
        let Some(pose) = host.pose(viewport) else {
            return Ok(());
        };
        let height = host.height(viewport).max(1);
        let rows = match action {
            ScrollAction::HalfPageDown => (height / 2) as f64,
            ScrollAction::HalfPageUp => -((height / 2) as f64),
            ScrollAction::PageDown => height as f64,
            ScrollAction::PageUp => -(height as f64),
            ScrollAction::CursorToTop | ScrollAction::CursorToCenter | ScrollAction::CursorToBottom => {
                let margin = host.scrolloff(viewport).min(height / 2);
                // Fold-aware rows between the top line and the cursor row.
                let map = FoldMap::range_scan(host, viewport, pose.top_line, pose.cursor_line);
                let to_cursor = map.steps_between(pose.top_line, pose.cursor_line);
                let keep_above = match action {
                    ScrollAction::CursorToTop => margin as i64,
                    ScrollAction::CursorToCenter => ((height - 1) / 2) as i64,
                    _ => height.saturating_sub(margin + 1) as i64,
                };
                (to_cursor - keep_above) as f64
            }
        };
        self.scroll_spec_at(host, now, viewport, TweenSpec::rows(rows))
    }

    // -- frame loop ---------------------------------------------------------

    /// Advance all live animations. Returns `true` while more frames are
    /// needed.
    pub fn on_frame<H: ScrollHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.on_frame_at(host, Instant::now())
    }

    /// [`on_frame`](Self::on_frame) with an explicit timestamp.
    pub fn on_frame_at<H: ScrollHost + ?Sized>(&mut self, host: &mut H, now: Instant) -> bool {
        // Trailing edge of the request coalescer: apply the surviving
        // request of a burst.
        if self.request_gate.poll(now)
            && let Some((viewport, spec)) = self.pending.take()
            && let Err(err) = self.start_tween(host, now, viewport, spec)
        {
            debug!(%err, "deferred scroll request dropped");
        }

        if !self.frame_gate.admit(now) {
            return !self.slots.is_empty() || self.pending.is_some();
        }

        self.slots
            .retain(|_, tween| matches!(tween.update(host, now), TweenStep::Continue));
        !self.slots.is_empty() || self.pending.is_some()
    }

    // -- lifecycle ----------------------------------------------------------

    /// Cancel the in-flight animation of `viewport`, if any. The viewport
    /// stays wherever the last frame put it.
    pub fn stop(&mut self, viewport: ViewportId) {
        if let Some(mut tween) = self.slots.remove(&viewport) {
            tween.cancel();
            debug!(viewport = viewport.0, "scroll stopped");
        }
        if matches!(self.pending, Some((pending, _)) if pending == viewport) {
            self.pending = None;
        }
    }

    /// Cancel every in-flight animation.
    pub fn stop_all(&mut self) {
        for (_, mut tween) in self.slots.drain() {
            tween.cancel();
        }
        self.pending = None;
    }

    /// Whether `viewport` has a live animation.
    #[must_use]
    pub fn is_animating(&self, viewport: ViewportId) -> bool {
        self.slots.contains_key(&viewport)
    }

    /// Whether any viewport has a live animation or a pending request.
    #[must_use]
    pub fn any_animating(&self) -> bool {
        !self.slots.is_empty() || self.pending.is_some()
    }

    /// The live tween of `viewport`, if any. Diagnostic accessor.
    #[must_use]
    pub fn tween(&self, viewport: ViewportId) -> Option<&ViewportTween> {
        self.slots.get(&viewport)
    }

    // -- internals ----------------------------------------------------------

    fn resolve<H: ScrollHost + ?Sized>(&self, host: &H, viewport: ViewportId) -> ViewportId {
        if viewport.is_current() {
            host.active_viewport()
        } else {
            viewport
        }
    }

    /// Build and register a tween, splicing a continuation when one is
    /// already in flight. `ViewportGone` degrades to a no-op.
    fn start_tween<H: ScrollHost + ?Sized>(
        &mut self,
        host: &H,
        now: Instant,
        viewport: ViewportId,
        spec: TweenSpec,
    ) -> Result<(), ScrollError> {
        let viewport = self.resolve(host, viewport);
        let spec = spec.or_duration(self.config.duration);

        let built = match self.slots.remove(&viewport) {
            Some(mut previous) if !previous.is_done() => {
                previous.cancel();
                let map = Arc::clone(previous.fold_map());
                debug!(viewport = viewport.0, "splicing continuation tween");
                ViewportTween::continuation(
                    host,
                    viewport,
                    &spec.or_easing(self.config.continuation_easing),
                    map,
                    self.config.frame_interval,
                    now,
                )
            }
            _ => ViewportTween::new(host, viewport, &spec.or_easing(self.config.easing), now),
        };

        match built {
            Ok(tween) => {
                self.slots.insert(viewport, tween);
                Ok(())
            }
            Err(ScrollError::ViewportGone(_)) => {
                debug!(viewport = viewport.0, "scroll request for gone viewport ignored");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use glide_core::testing::ScriptedHost;

    const VP: ViewportId = ViewportId(1);
    const MS: Duration = Duration::from_millis(1);

    fn controller() -> ScrollController {
        // A 1 ms frame gate keeps the millisecond-stepped tests dense.
        ScrollController::new(ScrollConfig {
            duration: Duration::from_millis(100),
            frame_interval: MS,
            ..ScrollConfig::default()
        })
    }

    fn drive(
        controller: &mut ScrollController,
        host: &mut ScriptedHost,
        start: Instant,
        from_ms: u32,
        to_ms: u32,
    ) {
        for ms in from_ms..=to_ms {
            controller.on_frame_at(host, start + ms * MS);
        }
    }

    #[test]
    fn current_sentinel_resolves_to_focused_viewport() {
        let host = ScriptedHost::new(100, 20, 2);
        let mut controller = controller();
        controller
            .scroll_at(&host, Instant::now(), ViewportId::CURRENT, 10.0)
            .unwrap();
        assert!(controller.is_animating(VP));
        assert!(!controller.is_animating(ViewportId::CURRENT));
    }

    #[test]
    fn missing_motion_surfaces_before_coalescing() {
        let host = ScriptedHost::new(100, 20, 2);
        let mut controller = controller();
        let t0 = Instant::now();
        controller.scroll_at(&host, t0, VP, 10.0).unwrap();
        // Inside the window, but still a hard error.
        let err = controller
            .scroll_spec_at(&host, t0 + MS, VP, TweenSpec::default())
            .unwrap_err();
        assert_eq!(err, ScrollError::MissingMotion);
    }

    #[test]
    fn gone_viewport_request_is_a_noop() {
        let host = ScriptedHost::new(100, 20, 2);
        let mut controller = controller();
        controller
            .scroll_at(&host, Instant::now(), ViewportId(42), 10.0)
            .unwrap();
        assert!(!controller.any_animating());
    }

    #[test]
    fn stop_releases_the_slot_without_further_writes() {
        let mut host = ScriptedHost::new(100, 20, 2);
        let mut controller = controller();
        let t0 = Instant::now();
        controller.scroll_at(&host, t0, VP, 10.0).unwrap();
        drive(&mut controller, &mut host, t0, 0, 20);
        assert!(controller.is_animating(VP));

        controller.stop(VP);
        assert!(!controller.any_animating());
        let writes = host.writes().len();
        drive(&mut controller, &mut host, t0, 21, 40);
        assert_eq!(host.writes().len(), writes);
    }

    #[test]
    fn half_page_uses_viewport_height() {
        let host = ScriptedHost::new(100, 20, 2);
        let mut controller = controller();
        controller
            .perform_at(&host, Instant::now(), VP, ScrollAction::HalfPageDown)
            .unwrap();
        let tween = controller.tween(VP).unwrap();
        assert_eq!(tween.scroll_delta(), 10.0);
        assert_eq!(tween.target_line(), 11);
    }

    #[test]
    fn cursor_to_top_scrolls_cursor_to_margin_row() {
        let mut pose = glide_core::ViewPose::origin();
        pose.top_line = 5;
        pose.cursor_line = 14;
        let host = ScriptedHost::new(100, 20, 2).with_pose(VP, pose);
        let mut controller = controller();
        controller
            .perform_at(&host, Instant::now(), VP, ScrollAction::CursorToTop)
            .unwrap();
        // 9 rows from top to cursor, keep 2 above: scroll down 7.
        let tween = controller.tween(VP).unwrap();
        assert_eq!(tween.scroll_delta(), 7.0);
        assert_eq!(tween.target_line(), 12);
    }

    #[test]
    fn cursor_to_center_splits_the_height() {
        let mut pose = glide_core::ViewPose::origin();
        pose.top_line = 30;
        pose.cursor_line = 45;
        let host = ScriptedHost::new(100, 20, 0).with_pose(VP, pose);
        let mut controller = controller();
        controller
            .perform_at(&host, Instant::now(), VP, ScrollAction::CursorToCenter)
            .unwrap();
        // 15 rows to the cursor, keep (20 - 1) / 2 = 9 above: scroll 6.
        assert_eq!(controller.tween(VP).unwrap().scroll_delta(), 6.0);
    }

    #[test]
    fn stop_all_clears_every_slot() {
        let mut host = ScriptedHost::new(100, 20, 2);
        host.open_viewport(ViewportId(2));
        let mut controller = controller();
        let t0 = Instant::now();
        controller.scroll_at(&host, t0, VP, 10.0).unwrap();
        // Outside the coalescing window so both start immediately.
        controller
            .scroll_at(&host, t0 + 60 * MS, ViewportId(2), 5.0)
            .unwrap();
        assert!(controller.is_animating(VP));
        assert!(controller.is_animating(ViewportId(2)));

        controller.stop_all();
        assert!(!controller.any_animating());
    }
}
