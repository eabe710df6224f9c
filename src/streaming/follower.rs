//! Backdrops that travel with the camera instead of being recycled

use serde::{Deserialize, Serialize};

use crate::collaborators::InstanceSink;
use crate::core::CameraSnapshot;
use crate::math::TravelAxis;

use super::pool::{InstanceTransform, PoolId};

/// Where a follower sits relative to the camera
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowerConfig {
    pub asset: String,
    /// Distance ahead of the camera along the travel axis
    pub travel_offset: f32,
}

/// A single instance pinned to the camera's travel coordinate
pub struct CameraFollower {
    pool: PoolId,
    axis: TravelAxis,
    travel_offset: f32,
    transform: InstanceTransform,
    dirty: bool,
}

impl CameraFollower {
    pub fn new(pool: PoolId, axis: TravelAxis, travel_offset: f32, transform: InstanceTransform) -> Self {
        Self {
            pool,
            axis,
            travel_offset,
            transform,
            dirty: true,
        }
    }

    pub fn pool(&self) -> PoolId {
        self.pool
    }

    pub fn transform(&self) -> &InstanceTransform {
        &self.transform
    }

    /// Move along the axis to stay `travel_offset` ahead of the camera.
    /// Lateral placement is left alone.
    pub fn update(&mut self, camera: &CameraSnapshot) {
        let target = camera.travel + self.travel_offset;
        let position = self.axis.with_coordinate(self.transform.position, target);
        if position != self.transform.position {
            self.transform.position = position;
            self.dirty = true;
        }
    }

    pub fn flush(&mut self, sink: &mut dyn InstanceSink) -> bool {
        if !self.dirty {
            return false;
        }
        sink.upload_instance_matrices(self.pool, &[self.transform.to_matrix()]);
        self.dirty = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::recording::RecordingRenderer;
    use crate::core::types::Vec3;

    const AXIS: TravelAxis = TravelAxis::NEG_Z;

    #[test]
    fn test_keeps_offset_ahead() {
        let start = InstanceTransform::from_position(Vec3::new(3.0, -5.0, 0.0));
        let mut stars = CameraFollower::new(PoolId(4), AXIS, 200.0, start);

        stars.update(&CameraSnapshot::at_travel(1000.0, &AXIS));
        let p = stars.transform().position;
        assert!((AXIS.coordinate(p) - 1200.0).abs() < 1e-3);
        assert_eq!(p.x, 3.0);
        assert_eq!(p.y, -5.0);
    }

    #[test]
    fn test_uploads_only_when_moved() {
        let mut cloud = CameraFollower::new(PoolId(5), AXIS, 0.0, InstanceTransform::default());
        let mut renderer = RecordingRenderer::default();
        let cam = CameraSnapshot::at_travel(50.0, &AXIS);

        cloud.update(&cam);
        assert!(cloud.flush(&mut renderer));
        cloud.update(&cam);
        assert!(!cloud.flush(&mut renderer));
        assert_eq!(renderer.upload_count(PoolId(5)), 1);
    }
}
