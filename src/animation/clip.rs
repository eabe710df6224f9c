//! Keyframed transform clips carried by renderable assets

use glam::{Mat4, Quat, Vec3};

use crate::streaming::InstanceTransform;

use super::tween::Interpolate;

/// Node pose at one point in a clip
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformKeyframe {
    pub time: f32,
    pub pose: InstanceTransform,
}

impl TransformKeyframe {
    pub fn new(time: f32, position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self::at(time, InstanceTransform::new(position, rotation, scale))
    }

    pub fn at(time: f32, pose: InstanceTransform) -> Self {
        Self { time, pose }
    }

    /// Rest pose
    pub fn identity(time: f32) -> Self {
        Self::at(time, InstanceTransform::default())
    }
}

/// One animated node of an asset (a door leaf, a hinge).
///
/// Keyframes are kept sorted by time.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    keyframes: Vec<TransformKeyframe>,
}

impl AnimationClip {
    /// Create a new empty clip
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyframes: Vec::new(),
        }
    }

    /// Builder-style keyframe insertion
    pub fn with_keyframe(mut self, keyframe: TransformKeyframe) -> Self {
        self.add_keyframe(keyframe);
        self
    }

    /// Add a keyframe (maintains sorted order by time)
    pub fn add_keyframe(&mut self, keyframe: TransformKeyframe) {
        let pos = self
            .keyframes
            .partition_point(|k| k.time <= keyframe.time);
        self.keyframes.insert(pos, keyframe);
    }

    pub fn keyframes(&self) -> &[TransformKeyframe] {
        &self.keyframes
    }

    /// Duration of the clip (time of last keyframe)
    pub fn duration(&self) -> f32 {
        self.keyframes
            .last()
            .map(|k| k.time)
            .unwrap_or(0.0)
    }

    /// Sample the clip at a given time, clamping outside the keyed range
    pub fn sample(&self, time: f32) -> Mat4 {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Mat4::IDENTITY,
        };

        if time <= first.time {
            return first.pose.to_matrix();
        }
        if time >= last.time {
            return last.pose.to_matrix();
        }

        // First keyframe strictly after `time`; guaranteed in 1..len here
        let next_idx = self.keyframes.partition_point(|k| k.time <= time);
        let current = &self.keyframes[next_idx - 1];
        let next = &self.keyframes[next_idx];

        let span = next.time - current.time;
        let t = if span > 0.0 {
            (time - current.time) / span
        } else {
            0.0
        };
        InstanceTransform::interpolate(current.pose, next.pose, t).to_matrix()
    }
}
