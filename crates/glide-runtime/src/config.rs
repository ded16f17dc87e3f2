#![forbid(unsafe_code)]

//! Tuning knobs for scroll animation.

use std::time::Duration;

use glide_core::{DEFAULT_DURATION, Easing};

/// Ceiling for the per-frame update rate: 144 Hz.
const FRAME_INTERVAL: Duration = Duration::from_micros(6_944);

/// Tuning knobs for the scroll controller.
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    /// Duration of an animation when the request names none.
    pub duration: Duration,

    /// Minimum spacing between tween updates; frames arriving faster are
    /// skipped.
    pub frame_interval: Duration,

    /// Curve for a fresh tween.
    pub easing: Easing,

    /// Curve for a continuation spliced onto an in-flight tween.
    pub continuation_easing: Easing,

    /// Window within which rapid repeated scroll requests coalesce into the
    /// last one. `None` means half of `duration`.
    pub coalesce_window: Option<Duration>,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            frame_interval: FRAME_INTERVAL,
            easing: Easing::DEFAULT,
            continuation_easing: Easing::CONTINUATION,
            coalesce_window: None,
        }
    }
}

impl ScrollConfig {
    /// Effective request-coalescing window.
    #[must_use]
    pub fn coalesce_interval(&self) -> Duration {
        self.coalesce_window.unwrap_or(self.duration / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_coalesce_window_is_half_duration() {
        let config = ScrollConfig::default();
        assert_eq!(config.coalesce_interval(), config.duration / 2);
    }

    #[test]
    fn explicit_coalesce_window_wins() {
        let config = ScrollConfig {
            coalesce_window: Some(Duration::from_millis(40)),
            ..ScrollConfig::default()
        };
        assert_eq!(config.coalesce_interval(), Duration::from_millis(40));
    }
}
