#![forbid(unsafe_code)]

//! The seam between the tween engine and the embedding editor or terminal.
//!
//! Everything the engine needs from its host is a handful of synchronous
//! queries and one positioned write, collected in [`ScrollHost`]. The engine
//! never schedules work on the host, never retains references into it, and
//! treats every failed query or write as "viewport gone".
//!
//! Lines are 1-based: line 1 is the first content line. A viewport shows
//! `height` visual rows starting at `top_line`; a closed fold renders as
//! exactly one visual row regardless of how many content lines it spans.

/// Identifies one scrollable viewport (window/pane) of the host.
///
/// `ViewportId(0)` is the [`CURRENT`](ViewportId::CURRENT) sentinel and is
/// resolved against [`ScrollHost::active_viewport`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportId(pub u32);

impl ViewportId {
    /// Sentinel for "whichever viewport is currently active".
    pub const CURRENT: ViewportId = ViewportId(0);

    /// Whether this id is the [`CURRENT`](Self::CURRENT) sentinel.
    #[must_use]
    pub fn is_current(self) -> bool {
        self == Self::CURRENT
    }
}

/// Position record of a viewport: top line plus cursor placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPose {
    /// Content line shown in the first visual row.
    pub top_line: usize,
    /// Content line the cursor is on.
    pub cursor_line: usize,
    /// Cursor column.
    pub cursor_col: usize,
    /// Column the cursor wants to return to after vertical motion.
    pub want_col: usize,
}

impl ViewPose {
    /// Pose at the top of the content with the cursor on line 1, column 0.
    #[must_use]
    pub fn origin() -> Self {
        Self {
            top_line: 1,
            cursor_line: 1,
            cursor_col: 0,
            want_col: 0,
        }
    }
}

/// Synchronous host primitives consumed by the engine.
///
/// Implementations may be queried with ids of viewports that have since been
/// closed; they must answer `None`/`false` rather than panic. All methods are
/// called from the host's own event loop — no thread-safety is required.
pub trait ScrollHost {
    /// Current pose of `viewport`, or `None` if it is gone.
    fn pose(&self, viewport: ViewportId) -> Option<ViewPose>;

    /// Write a pose. Returns `false` if the viewport is gone; the engine
    /// then terminates the tween without retrying.
    fn set_pose(&mut self, viewport: ViewportId, pose: ViewPose) -> bool;

    /// Total content lines backing `viewport`.
    fn line_count(&self, viewport: ViewportId) -> usize;

    /// Visible row count of `viewport`.
    fn height(&self, viewport: ViewportId) -> usize;

    /// Margin ("scroll-off") setting: minimum rows kept between the cursor
    /// and the viewport edges. Callers clamp this to at most half the height.
    fn scrolloff(&self, viewport: ViewportId) -> usize;

    /// Whether `viewport` belongs to the currently active tab and is visible.
    /// An inactive viewport's tween snaps to its target and detaches.
    fn is_active(&self, viewport: ViewportId) -> bool;

    /// The viewport that currently has focus; resolves
    /// [`ViewportId::CURRENT`].
    fn active_viewport(&self) -> ViewportId;

    /// Start line of the outermost *closed* fold containing `line`, if any.
    ///
    /// Nested folds inside a closed outer fold are never reported.
    fn fold_start(&self, viewport: ViewportId, line: usize) -> Option<usize>;

    /// End line of the outermost *closed* fold containing `line`, if any.
    fn fold_end(&self, viewport: ViewportId, line: usize) -> Option<usize>;
}
