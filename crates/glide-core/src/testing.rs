#![forbid(unsafe_code)]

//! Scripted in-memory host for tests.
//!
//! [`ScriptedHost`] implements [`ScrollHost`] over a plain description of the
//! content: line count, viewport geometry, a closed-fold table, and per-
//! viewport poses. Fold queries report only the outermost closed region
//! containing a line, matching real host behavior. Every successful
//! [`set_pose`](ScrollHost::set_pose) is appended to a write log so tests can
//! assert exactly how many observable side effects a tween produced.

use ahash::AHashMap;

use crate::host::{ScrollHost, ViewPose, ViewportId};

/// In-memory [`ScrollHost`] with scriptable geometry, folds, and activity.
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    line_count: usize,
    height: usize,
    scrolloff: usize,
    folds: Vec<(usize, usize)>,
    poses: AHashMap<ViewportId, ViewPose>,
    inactive: Vec<ViewportId>,
    active_viewport: ViewportId,
    writes: Vec<(ViewportId, ViewPose)>,
}

impl ScriptedHost {
    /// A host with one open, active viewport `ViewportId(1)` at the origin.
    #[must_use]
    pub fn new(line_count: usize, height: usize, scrolloff: usize) -> Self {
        let mut poses = AHashMap::new();
        poses.insert(ViewportId(1), ViewPose::origin());
        Self {
            line_count,
            height,
            scrolloff,
            folds: Vec::new(),
            poses,
            inactive: Vec::new(),
            active_viewport: ViewportId(1),
            writes: Vec::new(),
        }
    }

    /// Add a closed fold spanning `start..=end` (builder).
    #[must_use]
    pub fn with_fold(mut self, start: usize, end: usize) -> Self {
        if end >= start {
            self.folds.push((start, end));
        }
        self
    }

    /// Open (or reposition) a viewport (builder).
    #[must_use]
    pub fn with_pose(mut self, viewport: ViewportId, pose: ViewPose) -> Self {
        self.poses.insert(viewport, pose);
        self
    }

    /// Open a viewport at the origin.
    pub fn open_viewport(&mut self, viewport: ViewportId) {
        self.poses.insert(viewport, ViewPose::origin());
    }

    /// Close a viewport: all queries for it answer "gone" from now on.
    pub fn close_viewport(&mut self, viewport: ViewportId) {
        self.poses.remove(&viewport);
    }

    /// Mark a viewport as belonging to an inactive tab.
    pub fn set_inactive(&mut self, viewport: ViewportId) {
        if !self.inactive.contains(&viewport) {
            self.inactive.push(viewport);
        }
    }

    /// Change which viewport has focus.
    pub fn focus(&mut self, viewport: ViewportId) {
        self.active_viewport = viewport;
    }

    /// Every successful pose write, in order.
    #[must_use]
    pub fn writes(&self) -> &[(ViewportId, ViewPose)] {
        &self.writes
    }

    /// The outermost closed fold containing `line`: smallest start, and the
    /// widest span on ties (nested folds are shadowed by their parent).
    fn outermost_fold(&self, line: usize) -> Option<(usize, usize)> {
        self.folds
            .iter()
            .copied()
            .filter(|&(start, end)| start <= line && line <= end)
            .min_by_key(|&(start, end)| (start, usize::MAX - end))
    }
}

impl ScrollHost for ScriptedHost {
    fn pose(&self, viewport: ViewportId) -> Option<ViewPose> {
        self.poses.get(&viewport).copied()
    }

    fn set_pose(&mut self, viewport: ViewportId, pose: ViewPose) -> bool {
        if let Some(slot) = self.poses.get_mut(&viewport) {
            *slot = pose;
            self.writes.push((viewport, pose));
            true
        } else {
            false
        }
    }

    fn line_count(&self, _viewport: ViewportId) -> usize {
        self.line_count
    }

    fn height(&self, _viewport: ViewportId) -> usize {
        self.height
    }

    fn scrolloff(&self, _viewport: ViewportId) -> usize {
        self.scrolloff
    }

    fn is_active(&self, viewport: ViewportId) -> bool {
        !self.inactive.contains(&viewport)
    }

    fn active_viewport(&self) -> ViewportId {
        self.active_viewport
    }

    fn fold_start(&self, _viewport: ViewportId, line: usize) -> Option<usize> {
        self.outermost_fold(line).map(|(start, _)| start)
    }

    fn fold_end(&self, _viewport: ViewportId, line: usize) -> Option<usize> {
        self.outermost_fold(line).map(|(_, end)| end)
    }
}
