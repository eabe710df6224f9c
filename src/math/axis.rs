//! The single axis the camera travels along

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;

/// Unit direction of travel.
///
/// The travel coordinate of a point is its projection onto this direction, so
/// it grows as the camera advances. Everything that compares "ahead" and
/// "behind" goes through [`TravelAxis::coordinate`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec3", into = "Vec3")]
pub struct TravelAxis {
    direction: Vec3,
}

impl TravelAxis {
    /// Forward into the screen (-Z), the corridor default
    pub const NEG_Z: Self = Self { direction: Vec3::NEG_Z };

    /// Build an axis from any non-zero direction
    pub fn new(direction: Vec3) -> Option<Self> {
        direction
            .try_normalize()
            .map(|direction| Self { direction })
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Signed distance of `point` along the axis
    pub fn coordinate(&self, point: Vec3) -> f32 {
        point.dot(self.direction)
    }

    /// Displacement of `distance` along the axis
    pub fn offset(&self, distance: f32) -> Vec3 {
        self.direction * distance
    }

    /// Move `point` so that its travel coordinate becomes `coordinate`,
    /// keeping its lateral components
    pub fn with_coordinate(&self, point: Vec3, coordinate: f32) -> Vec3 {
        point + self.offset(coordinate - self.coordinate(point))
    }
}

impl Default for TravelAxis {
    fn default() -> Self {
        Self::NEG_Z
    }
}

impl From<Vec3> for TravelAxis {
    fn from(direction: Vec3) -> Self {
        Self::new(direction).unwrap_or_default()
    }
}

impl From<TravelAxis> for Vec3 {
    fn from(axis: TravelAxis) -> Self {
        axis.direction
    }
}
