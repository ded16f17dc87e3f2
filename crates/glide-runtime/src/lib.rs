#![forbid(unsafe_code)]

//! Runtime: the scroll controller and its throttled frame loop.
//!
//! # Role in glide
//! `glide-runtime` owns the mutable per-viewport state: which tween is live
//! for which viewport, when the next frame may run, and which burst of rapid
//! scroll requests collapses into which animation. The pure interpolation
//! lives in `glide-core`; this crate decides *when* it runs.
//!
//! # Key components
//!
//! - [`ScrollController`] — per-viewport entry point: `scroll`, absolute
//!   targets, named convenience actions, continuation splicing, and the
//!   [`on_frame`](ScrollController::on_frame) loop the host pumps while
//!   anything is animating.
//! - [`Throttle`] — leading-edge-immediate, trailing-edge-guaranteed rate
//!   limiter, used both as the frame gate and the request coalescer.
//! - [`ScrollConfig`] — tuning knobs with documented defaults.
//!
//! # How it fits in the system
//! The host calls [`ScrollController::scroll`] (or an action) from its input
//! handling and [`ScrollController::on_frame`] from its redraw loop; the
//! controller drives each live `ViewportTween` through the `ScrollHost`
//! seam and reports whether more frames are needed. Everything runs on the
//! host's own event loop — no threads, no locks.

pub mod config;
pub mod controller;
pub mod throttle;

pub use config::ScrollConfig;
pub use controller::{ScrollAction, ScrollController};
pub use throttle::Throttle;
