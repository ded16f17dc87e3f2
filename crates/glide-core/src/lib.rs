#![forbid(unsafe_code)]

//! Core: fold-aware viewport tween primitives.
//!
//! # Role in glide
//! `glide-core` owns everything needed to compute *where* an animated
//! viewport should be at a given instant: the easing curve families, the
//! animation clock, the fold map snapshot that translates between content
//! lines and visual rows, and the [`ViewportTween`] state machine that ties
//! them together.
//!
//! # Primary responsibilities
//! - **Easing**: parametrized sine and ease-out curve families.
//! - **AnimationClock**: wall-clock time → eased progression, with one-way
//!   invalidation.
//! - **FoldMap**: immutable per-tween snapshot of closed-region boundaries.
//! - **ViewportTween**: per-frame interpolation, cursor reconciliation, and
//!   the `Constructed → Animating → Arrived | Cancelled | Detached` lifecycle.
//! - **ScrollHost**: the seam to the embedding editor/terminal.
//!
//! # How it fits in the system
//! The runtime (`glide-runtime`) owns the per-viewport tween slots, the
//! frame gate, and request coalescing; it drives `ViewportTween::update`
//! once per frame. Nothing in this crate schedules work or touches a real
//! screen — all host interaction goes through the [`ScrollHost`] trait.

pub mod clock;
pub mod easing;
pub mod error;
pub mod fold;
pub mod host;
pub mod tween;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use clock::AnimationClock;
pub use easing::Easing;
pub use error::ScrollError;
pub use fold::{FoldEdge, FoldMap};
pub use host::{ScrollHost, ViewPose, ViewportId};
pub use tween::{DEFAULT_DURATION, FinishReason, TweenSpec, TweenState, TweenStep, ViewportTween};
