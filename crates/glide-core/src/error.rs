#![forbid(unsafe_code)]

//! Error type for tween construction.
//!
//! Only programming-contract violations surface as errors; every runtime
//! irregularity (viewport gone, tab switched, failed write) terminates the
//! affected tween gracefully instead.

use thiserror::Error;

use crate::host::ViewportId;

/// Errors produced while constructing a [`ViewportTween`](crate::ViewportTween).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrollError {
    /// The spec carried neither a row delta nor a target line. This is a
    /// caller bug and is never silently defaulted.
    #[error("scroll request needs a row delta or a target line")]
    MissingMotion,

    /// The viewport did not exist when the tween was built. Controllers
    /// swallow this and treat the request as a no-op.
    #[error("viewport {0:?} is gone")]
    ViewportGone(ViewportId),
}
