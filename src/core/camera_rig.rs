//! Forward-travelling camera rig
//!
//! Replaces free-look controllers: the rig only ever moves along the
//! [`TravelAxis`], either cruising at constant speed or easing toward a fixed
//! target (the stop and the dive). Streaming code never reads the rig
//! directly; it receives a [`CameraSnapshot`] each frame.

use serde::{Deserialize, Serialize};

use crate::animation::{Ease, Tween};
use crate::core::camera::Camera;
use crate::core::types::Vec3;
use crate::math::TravelAxis;

/// Rig tuning
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Start position of the camera
    pub start: Vec3,
    /// Cruise speed in units per second
    pub speed: f32,
    /// Distance covered while decelerating to a stop
    pub stop_distance: f32,
    pub stop_duration: f32,
    pub stop_ease: Ease,
    /// Distance covered by the dive through the door
    pub dive_distance: f32,
    pub dive_duration: f32,
    pub dive_ease: Ease,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Upward tilt of the view
    pub pitch_degrees: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            start: Vec3::ZERO,
            speed: 88.0,
            stop_distance: 165.0,
            stop_duration: 5.0,
            stop_ease: Ease::CubicOut,
            dive_distance: 400.0,
            dive_duration: 0.6,
            dive_ease: Ease::CubicIn,
            fov_degrees: 45.0,
            near: 50.0,
            far: 100_000.0,
            pitch_degrees: 5.5,
        }
    }
}

/// What the camera is doing this frame
#[derive(Clone, Debug)]
pub enum CameraMotion {
    /// Constant velocity along the travel axis
    Cruise { speed: f32 },
    /// Eased move to an absolute target position
    Easing(Tween<Vec3>),
    /// A finished ease; the camera stays put
    Holding,
}

/// Read-only view of the camera handed to streaming code each frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    /// Travel coordinate of `position`
    pub travel: f32,
}

impl CameraSnapshot {
    pub fn new(position: Vec3, axis: &TravelAxis) -> Self {
        Self {
            position,
            travel: axis.coordinate(position),
        }
    }

    /// Snapshot at a bare travel coordinate on the given axis
    pub fn at_travel(travel: f32, axis: &TravelAxis) -> Self {
        Self::new(axis.offset(travel), axis)
    }
}

/// Owns the camera position and its motion state
pub struct CameraRig {
    camera: Camera,
    axis: TravelAxis,
    motion: CameraMotion,
    /// Cruise toggle; easing is unaffected
    cruising: bool,
    config: RigConfig,
}

impl CameraRig {
    pub fn new(config: RigConfig, axis: TravelAxis) -> Self {
        let mut camera = Camera::new(config.start, config.fov_degrees, 16.0 / 9.0)
            .with_clip(config.near, config.far)
            .with_pitch_degrees(config.pitch_degrees);
        camera.position = config.start;

        Self {
            camera,
            axis,
            motion: CameraMotion::Cruise { speed: config.speed },
            cruising: true,
            config,
        }
    }

    /// Advance the camera by one frame
    pub fn update(&mut self, dt: f32) {
        match &mut self.motion {
            CameraMotion::Cruise { speed } => {
                if self.cruising {
                    self.camera.position += self.axis.offset(*speed * dt);
                }
            }
            CameraMotion::Easing(tween) => {
                self.camera.position = tween.advance(dt);
                if tween.is_finished() {
                    log::debug!("Camera settled at {:?}", self.camera.position);
                    self.motion = CameraMotion::Holding;
                }
            }
            CameraMotion::Holding => {}
        }
    }

    /// Decelerate to a halt `stop_distance` further along the axis.
    ///
    /// Supersedes any in-flight ease.
    pub fn stop(&mut self) {
        log::info!("Camera stopping over {}s", self.config.stop_duration);
        self.ease_forward(
            self.config.stop_distance,
            self.config.stop_duration,
            self.config.stop_ease,
        );
    }

    /// Accelerate `dive_distance` forward through the door.
    ///
    /// Cancels any in-flight ease outright; the new trajectory starts from
    /// wherever the camera is now.
    pub fn dive(&mut self) {
        log::info!("Camera diving");
        self.ease_forward(
            self.config.dive_distance,
            self.config.dive_duration,
            self.config.dive_ease,
        );
    }

    fn ease_forward(&mut self, distance: f32, duration: f32, ease: Ease) {
        let from = self.camera.position;
        let to = from + self.axis.offset(distance);
        self.motion = CameraMotion::Easing(Tween::new(from, to, duration, ease));
    }

    /// Return to constant-velocity travel from the current position
    pub fn resume_cruise(&mut self) {
        self.motion = CameraMotion::Cruise { speed: self.config.speed };
    }

    /// Change cruise speed; takes effect immediately if cruising
    pub fn set_speed(&mut self, speed: f32) {
        self.config.speed = speed;
        if let CameraMotion::Cruise { speed: current } = &mut self.motion {
            *current = speed;
        }
    }

    /// Pause or resume cruise advancement
    pub fn set_cruising(&mut self, cruising: bool) {
        self.cruising = cruising;
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot::new(self.camera.position, &self.axis)
    }

    pub fn position(&self) -> Vec3 {
        self.camera.position
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn motion(&self) -> &CameraMotion {
        &self.motion
    }

    pub fn axis(&self) -> TravelAxis {
        self.axis
    }

    /// Target of the in-flight ease, if any
    pub fn easing_target(&self) -> Option<Vec3> {
        match &self.motion {
            CameraMotion::Easing(tween) => Some(tween.target()),
            _ => None,
        }
    }

    pub fn is_cruising(&self) -> bool {
        self.cruising && matches!(self.motion, CameraMotion::Cruise { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(RigConfig::default(), TravelAxis::NEG_Z)
    }

    fn run(rig: &mut CameraRig, seconds: f32) {
        let steps = (seconds * 60.0).round() as usize;
        for _ in 0..steps {
            rig.update(1.0 / 60.0);
        }
    }

    #[test]
    fn test_cruise_advances_along_axis() {
        let mut rig = rig();
        rig.update(0.5);
        assert!((rig.position().z - (-44.0)).abs() < 1e-3);
        assert!((rig.snapshot().travel - 44.0).abs() < 1e-3);
    }

    #[test]
    fn test_cruise_toggle() {
        let mut rig = rig();
        rig.set_cruising(false);
        rig.update(1.0);
        assert_eq!(rig.position(), Vec3::ZERO);
        assert!(!rig.is_cruising());
        rig.set_cruising(true);
        rig.set_speed(10.0);
        rig.update(1.0);
        assert!((rig.snapshot().travel - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_stop_eases_to_target_and_holds() {
        let mut rig = rig();
        rig.update(1.0);
        let before = rig.snapshot().travel;
        rig.stop();
        run(&mut rig, 5.5);
        assert!(matches!(rig.motion(), CameraMotion::Holding));
        assert!((rig.snapshot().travel - (before + 165.0)).abs() < 1e-2);

        run(&mut rig, 2.0);
        assert!((rig.snapshot().travel - (before + 165.0)).abs() < 1e-2);
    }

    #[test]
    fn test_stop_decelerates() {
        let mut rig = rig();
        rig.stop();
        rig.update(1.0);
        let first_second = rig.snapshot().travel;
        rig.update(1.0);
        let second_second = rig.snapshot().travel - first_second;
        assert!(second_second < first_second);
    }

    #[test]
    fn test_dive_cancels_stop() {
        let mut rig = rig();
        rig.update(1.0);
        let before = rig.snapshot().travel;
        rig.stop();
        rig.dive();
        assert_eq!(rig.easing_target(), Some(rig.axis().offset(before + 400.0)));

        run(&mut rig, 1.0);
        assert!((rig.snapshot().travel - (before + 400.0)).abs() < 1e-2);
    }

    #[test]
    fn test_dive_mid_stop_starts_from_current_position() {
        let mut rig = rig();
        rig.stop();
        run(&mut rig, 1.0);
        let mid = rig.snapshot().travel;
        assert!(mid > 0.0 && mid < 165.0);
        rig.dive();
        run(&mut rig, 1.0);
        assert!((rig.snapshot().travel - (mid + 400.0)).abs() < 1e-2);
    }

    #[test]
    fn test_repeated_dive_last_writer_wins() {
        let mut rig = rig();
        rig.dive();
        run(&mut rig, 0.3);
        let mid = rig.snapshot().travel;
        rig.dive();
        run(&mut rig, 1.0);
        assert!((rig.snapshot().travel - (mid + 400.0)).abs() < 1e-2);
    }

    #[test]
    fn test_resume_cruise_after_hold() {
        let mut rig = rig();
        rig.dive();
        run(&mut rig, 1.0);
        rig.resume_cruise();
        let before = rig.snapshot().travel;
        rig.update(1.0);
        assert!((rig.snapshot().travel - before - 88.0).abs() < 1e-2);
    }
}
