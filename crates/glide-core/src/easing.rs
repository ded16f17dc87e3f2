#![forbid(unsafe_code)]

//! Easing curve families for scroll progression.
//!
//! Two parametrized families, both mapping normalized elapsed time
//! `t ∈ [0, 1]` to normalized progression `p ∈ [0, 1]`:
//!
//! - [`Easing::Sine`] — a segment of a sine arc, with `steepness` selecting
//!   how much of the arc is traversed and `bias` shifting the segment
//!   horizontally. `steepness = π/2, bias = 0` is the classic sine ease-out.
//! - [`Easing::EaseOut`] — `1 − (1 − t)^slope`. Higher slopes front-load the
//!   motion; continuations use this family since they start from a nonzero
//!   velocity context.
//!
//! # Invariants
//!
//! 1. `apply(0.0) == 0.0` and `apply(1.0) == 1.0`, exactly.
//! 2. `apply` is non-decreasing on `[0, 1]` for every admissible parameter.
//! 3. Inputs outside `[0, 1]` are clamped to the boundary values.
//! 4. Parameters outside the monotone range are clamped, never rejected:
//!    sine steepness is capped so the traversed arc stays within a single
//!    monotone half-period, and slopes/steepnesses have a small positive
//!    floor to avoid degenerate flat curves.

use std::f64::consts::FRAC_PI_2;

/// Smallest admissible sine steepness / ease-out slope.
const MIN_SHAPE: f64 = 1e-3;

/// An easing curve: a pure map from normalized time to normalized progression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Normalized segment of a sine arc.
    ///
    /// `steepness` is the arc length in radians (capped so the segment stays
    /// monotone); `bias` shifts the segment horizontally within `[0, 1]`.
    Sine {
        /// Arc length in radians; larger values bend the curve harder.
        steepness: f64,
        /// Horizontal shift of the inflection, in `[0, 1]`.
        bias: f64,
    },
    /// `1 − (1 − t)^slope`: fast start, asymptotic settle.
    EaseOut {
        /// Exponent; larger values front-load more of the motion.
        slope: f64,
    },
}

impl Easing {
    /// Curve used by a fresh tween: full quarter-arc sine ease-out.
    pub const DEFAULT: Easing = Easing::Sine {
        steepness: FRAC_PI_2,
        bias: 0.0,
    };

    /// Curve used when splicing a continuation onto an in-flight tween.
    ///
    /// Sharper than [`Easing::DEFAULT`] so the replacement motion picks up
    /// without a visible hitch at the splice point.
    pub const CONTINUATION: Easing = Easing::EaseOut { slope: 3.0 };

    /// Sine-family constructor.
    #[must_use]
    pub fn sine(steepness: f64, bias: f64) -> Self {
        Easing::Sine { steepness, bias }
    }

    /// Ease-out-family constructor.
    #[must_use]
    pub fn ease_out(slope: f64) -> Self {
        Easing::EaseOut { slope }
    }

    /// Evaluate the curve at normalized time `t`.
    ///
    /// `t` is clamped to `[0, 1]`; parameters are clamped to their monotone
    /// range before evaluation.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Sine { steepness, bias } => {
                let bias = bias.clamp(0.0, 1.0);
                // The whole segment k·(t − bias) for t ∈ [0, 1] must stay
                // inside [−π/2, π/2] to remain monotone.
                let max_steepness = FRAC_PI_2 / bias.max(1.0 - bias);
                let k = steepness.clamp(MIN_SHAPE, max_steepness);
                let arc = |x: f64| (k * (x - bias)).sin();
                (arc(t) - arc(0.0)) / (arc(1.0) - arc(0.0))
            }
            Easing::EaseOut { slope } => {
                let k = slope.max(MIN_SHAPE);
                1.0 - (1.0 - t).powf(k)
            }
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn curves() -> Vec<Easing> {
        vec![
            Easing::DEFAULT,
            Easing::CONTINUATION,
            Easing::sine(0.5, 0.0),
            Easing::sine(1.0, 0.3),
            Easing::sine(FRAC_PI_2, 1.0),
            Easing::sine(10.0, 0.5), // steepness beyond the cap, clamped
            Easing::ease_out(1.0),
            Easing::ease_out(5.0),
        ]
    }

    #[test]
    fn endpoints_are_exact() {
        for curve in curves() {
            assert!(
                curve.apply(0.0).abs() < EPS,
                "{curve:?} should start at 0.0, got {}",
                curve.apply(0.0)
            );
            assert!(
                (curve.apply(1.0) - 1.0).abs() < EPS,
                "{curve:?} should end at 1.0, got {}",
                curve.apply(1.0)
            );
        }
    }

    #[test]
    fn out_of_range_input_clamps() {
        for curve in curves() {
            assert_eq!(curve.apply(-0.5), curve.apply(0.0));
            assert_eq!(curve.apply(1.5), curve.apply(1.0));
        }
    }

    #[test]
    fn monotone_over_fixed_sweep() {
        for curve in curves() {
            let mut prev = curve.apply(0.0);
            for i in 1..=200 {
                let t = f64::from(i) / 200.0;
                let v = curve.apply(t);
                assert!(
                    v >= prev - EPS,
                    "{curve:?} decreased at t={t}: {prev} -> {v}"
                );
                prev = v;
            }
        }
    }

    #[test]
    fn default_is_sine_quarter_arc() {
        // steepness π/2, bias 0 degenerates to sin(t·π/2).
        let t = 0.4;
        let expected = (t * FRAC_PI_2).sin();
        assert!((Easing::DEFAULT.apply(t) - expected).abs() < EPS);
    }

    #[test]
    fn continuation_is_sharper_than_default_early() {
        // The continuation curve must cover more ground early on.
        for t in [0.1, 0.2, 0.3] {
            assert!(Easing::CONTINUATION.apply(t) > Easing::DEFAULT.apply(t));
        }
    }

    proptest! {
        #[test]
        fn sine_family_monotone(steepness in 0.0f64..20.0, bias in 0.0f64..1.0) {
            let curve = Easing::sine(steepness, bias);
            let mut prev = curve.apply(0.0);
            for i in 1..=100 {
                let t = f64::from(i) / 100.0;
                let v = curve.apply(t);
                prop_assert!(v >= prev - EPS, "decreased at t={} for {:?}", t, curve);
                prev = v;
            }
            prop_assert!(curve.apply(0.0).abs() < EPS);
            prop_assert!((curve.apply(1.0) - 1.0).abs() < EPS);
        }

        #[test]
        fn ease_out_family_monotone(slope in 0.0f64..30.0) {
            let curve = Easing::ease_out(slope);
            let mut prev = curve.apply(0.0);
            for i in 1..=100 {
                let t = f64::from(i) / 100.0;
                let v = curve.apply(t);
                prop_assert!(v >= prev - EPS);
                prev = v;
            }
            prop_assert!(curve.apply(0.0).abs() < EPS);
            prop_assert!((curve.apply(1.0) - 1.0).abs() < EPS);
        }
    }
}
