//! Easing curves for tweens

use serde::{Deserialize, Serialize};

/// Overshoot constant for [`Ease::BackOut`]
const BACK_OVERSHOOT: f32 = 1.70158;

/// Named easing curve mapping normalized time to normalized progress.
///
/// Every curve maps 0 to 0 and 1 to 1. All but `BackOut` are monotonic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    /// Overshoots past 1 before settling
    BackOut,
}

impl Ease {
    /// Evaluate the curve at `t`, clamped to [0, 1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadIn => t * t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::CubicIn => t * t * t,
            Ease::CubicOut => 1.0 - (1.0 - t).powi(3),
            Ease::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::BackOut => {
                let c3 = BACK_OVERSHOOT + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + BACK_OVERSHOOT * u * u
            }
        }
    }

    pub fn is_monotonic(self) -> bool {
        !matches!(self, Ease::BackOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 7] = [
        Ease::Linear,
        Ease::QuadIn,
        Ease::QuadOut,
        Ease::CubicIn,
        Ease::CubicOut,
        Ease::CubicInOut,
        Ease::BackOut,
    ];

    #[test]
    fn test_endpoints() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 1e-5, "{:?} at 0", ease);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-5, "{:?} at 1", ease);
        }
    }

    #[test]
    fn test_monotonic_curves_never_decrease() {
        for ease in ALL.into_iter().filter(|e| e.is_monotonic()) {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = ease.apply(i as f32 / 100.0);
                assert!(v + 1e-6 >= prev, "{:?} decreased at step {}", ease, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_out_curves_lead_in_curves() {
        assert!(Ease::CubicOut.apply(0.25) > Ease::Linear.apply(0.25));
        assert!(Ease::CubicIn.apply(0.25) < Ease::Linear.apply(0.25));
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BackOut.apply(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Ease::CubicOut.apply(2.0), 1.0);
        assert_eq!(Ease::CubicIn.apply(-1.0), 0.0);
    }
}
