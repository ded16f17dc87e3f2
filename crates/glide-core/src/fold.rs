#![forbid(unsafe_code)]

//! Fold map: a per-tween snapshot of closed-region boundaries.
//!
//! Scrolling distance is measured in *visual rows*, not content lines: a
//! closed fold spanning dozens of lines renders as a single row. A
//! [`FoldMap`] records, for every closed region discovered by a scan, both
//! of its boundary lines, so the walk primitives can step over whole regions
//! atomically.
//!
//! A map is built exactly once per tween — by [`FoldMap::range_scan`] when
//! the caller named an absolute target line, or by [`FoldMap::delta_scan`]
//! when the caller asked for a relative number of rows — and is immutable
//! afterwards. Continuation tweens share the predecessor's map via `Arc`
//! rather than re-scanning; folds are assumed unchanged mid-flight.
//!
//! # Invariants
//!
//! 1. Every key corresponds to a boundary of a region that was closed at
//!    construction time.
//! 2. No coverage is claimed outside the scanned span: walking through
//!    unscanned territory degrades to plain line steps.
//! 3. Only the outermost closed region at a line is ever recorded; nested
//!    regions are invisible to the distance calculation (the host's queries
//!    already report only the outermost closed fold).
//! 4. Regions are discovered only in the direction of travel: a region
//!    starting before the scan origin of a downward scan is never recorded.
//!
//! # Walk rule
//!
//! One visual-row step from line `l`:
//! - downward: if `l` is a recorded region top, land on `bottom + 1`;
//!   otherwise `l + 1`.
//! - upward: if `l` is a recorded region bottom, land on `top − 1`;
//!   otherwise `l − 1` (saturating at line 1).
//!
//! The entire region therefore costs exactly one step.

use ahash::AHashMap;

use crate::host::{ScrollHost, ViewportId};

/// Boundary record for one line: the paired opposite boundary in each
/// direction, when this line opens or closes a region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldEdge {
    /// Set when this line is a region *bottom*: the paired top boundary.
    pub top: Option<usize>,
    /// Set when this line is a region *top*: the paired bottom boundary.
    pub bottom: Option<usize>,
}

/// Immutable snapshot of closed-region boundaries within a scanned span.
#[derive(Debug, Clone, Default)]
pub struct FoldMap {
    edges: AHashMap<usize, FoldEdge>,
}

impl FoldMap {
    /// A map with no recorded regions. Every step is a plain line step.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan the span between `from` and `to` (inclusive, either direction),
    /// recording every closed region that *starts* within it (downward) or
    /// *ends* within it (upward). `from == to` yields an empty map.
    pub fn range_scan<H: ScrollHost + ?Sized>(
        host: &H,
        viewport: ViewportId,
        from: usize,
        to: usize,
    ) -> Self {
        let mut map = Self::default();
        if from == to {
            return map;
        }
        if from < to {
            let mut line = from;
            while line <= to {
                match region_starting_at(host, viewport, line) {
                    Some(end) => {
                        map.record(line, end);
                        line = end.saturating_add(1);
                    }
                    None => line += 1,
                }
            }
        } else {
            let mut line = from;
            loop {
                if let Some(start) = region_ending_at(host, viewport, line) {
                    map.record(start, line);
                    if start <= to {
                        break;
                    }
                    line = start - 1;
                } else {
                    if line <= to {
                        break;
                    }
                    line -= 1;
                }
            }
        }
        map
    }

    /// Scan `|rows|` visual-row steps from `from` in the sign direction of
    /// `rows`, recording every region jumped over. Fractional budgets are
    /// rounded to the nearest whole step; a zero budget yields an empty map.
    pub fn delta_scan<H: ScrollHost + ?Sized>(
        host: &H,
        viewport: ViewportId,
        from: usize,
        rows: f64,
    ) -> Self {
        let mut map = Self::default();
        let rounded = rows.round() as i64;
        if rounded == 0 {
            return map;
        }
        let down = rounded > 0;
        let mut line = from;
        for _ in 0..rounded.unsigned_abs() {
            if down {
                match region_starting_at(host, viewport, line) {
                    Some(end) => {
                        map.record(line, end);
                        line = end.saturating_add(1);
                    }
                    None => line += 1,
                }
            } else {
                match region_ending_at(host, viewport, line) {
                    Some(start) => {
                        map.record(start, line);
                        if start <= 1 {
                            break;
                        }
                        line = start - 1;
                    }
                    None => {
                        if line <= 1 {
                            break;
                        }
                        line -= 1;
                    }
                }
            }
        }
        map
    }

    /// Boundary record at `line`, if the scan saw one there.
    #[must_use]
    pub fn edge(&self, line: usize) -> Option<FoldEdge> {
        self.edges.get(&line).copied()
    }

    /// Number of recorded boundary lines (two per region).
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the scan found no regions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Signed visual-row distance from `from` to `to`.
    ///
    /// Walks one visual row at a time; a region jump that lands past `to`
    /// still counts as the single step that crossed it.
    #[must_use]
    pub fn steps_between(&self, from: usize, to: usize) -> i64 {
        let mut steps: i64 = 0;
        let mut line = from;
        if from < to {
            while line < to {
                line = self.step_down(line);
                steps += 1;
            }
        } else {
            while line > to {
                let next = self.step_up(line);
                if next == line {
                    break; // saturated at line 1
                }
                line = next;
                steps -= 1;
            }
        }
        steps
    }

    /// Line reached after `steps` visual-row steps from `line` (sign gives
    /// the direction). Unclamped except for the line-1 floor; callers apply
    /// their own bounds.
    #[must_use]
    pub fn step_from(&self, line: usize, steps: i64) -> usize {
        let mut line = line;
        if steps >= 0 {
            for _ in 0..steps {
                line = self.step_down(line);
            }
        } else {
            for _ in 0..steps.unsigned_abs() {
                line = self.step_up(line);
            }
        }
        line
    }

    fn step_down(&self, line: usize) -> usize {
        match self.edges.get(&line).and_then(|e| e.bottom) {
            Some(bottom) => bottom.saturating_add(1),
            None => line.saturating_add(1),
        }
    }

    fn step_up(&self, line: usize) -> usize {
        match self.edges.get(&line).and_then(|e| e.top) {
            Some(top) => top.saturating_sub(1).max(1),
            None => line.saturating_sub(1).max(1),
        }
    }

    fn record(&mut self, start: usize, end: usize) {
        if end < start {
            return;
        }
        self.edges.entry(start).or_default().bottom = Some(end);
        self.edges.entry(end).or_default().top = Some(start);
    }
}

/// End line of a closed region starting exactly at `line`, if one does.
fn region_starting_at<H: ScrollHost + ?Sized>(
    host: &H,
    viewport: ViewportId,
    line: usize,
) -> Option<usize> {
    match host.fold_start(viewport, line) {
        Some(start) if start == line => host.fold_end(viewport, line),
        _ => None,
    }
}

/// Start line of a closed region ending exactly at `line`, if one does.
fn region_ending_at<H: ScrollHost + ?Sized>(
    host: &H,
    viewport: ViewportId,
    line: usize,
) -> Option<usize> {
    match host.fold_end(viewport, line) {
        Some(end) if end == line => host.fold_start(viewport, line),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
