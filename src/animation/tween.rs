//! Time-bounded interpolation between two values

use glam::Vec3;

use crate::streaming::InstanceTransform;

use super::easing::Ease;

/// Values a [`Tween`] can interpolate
pub trait Interpolate: Copy {
    fn interpolate(from: Self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

/// Position and scale lerp; rotation takes the shortest arc
impl Interpolate for InstanceTransform {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        InstanceTransform::new(
            from.position.lerp(to.position, t),
            from.rotation.slerp(to.rotation, t),
            from.scale.lerp(to.scale, t),
        )
    }
}

/// Eased interpolation from `from` to `to` over a fixed duration.
///
/// Once elapsed reaches the duration the tween holds `to` exactly.
#[derive(Clone, Copy, Debug)]
pub struct Tween<T: Interpolate> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        }
    }

    /// Advance by `dt` seconds and return the new value
    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    /// Current interpolated value
    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        T::interpolate(self.from, self.to, self.ease.apply(t))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn target(&self) -> T {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_midpoint() {
        let mut tween = Tween::new(0.0f32, 10.0, 2.0, Ease::Linear);
        assert!((tween.advance(1.0) - 5.0).abs() < 1e-5);
        assert!(!tween.is_finished());
    }

    #[test]
    fn test_holds_target_after_finish() {
        let mut tween = Tween::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -400.0), 0.6, Ease::CubicIn);
        tween.advance(0.5);
        tween.advance(0.5);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), Vec3::new(0.0, 0.0, -400.0));
        assert_eq!(tween.advance(3.0), Vec3::new(0.0, 0.0, -400.0));
    }

    #[test]
    fn test_zero_duration_is_immediately_done() {
        let tween = Tween::new(1.0f32, 2.0, 0.0, Ease::CubicOut);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 2.0);
    }
}
