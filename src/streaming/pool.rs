//! Fixed-size rings of instance transforms
//!
//! A [`TransformPool`] holds every placement of one instanced mesh. Its
//! cardinality is fixed at construction; recycling only moves instances and
//! rotates their storage order.

use std::collections::VecDeque;
use std::fmt;

use crate::collaborators::InstanceSink;
use crate::core::types::{Mat4, Quat, Vec3};
use crate::math::TravelAxis;

/// Identifies one instance buffer on the renderer side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub u32);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}

/// Position, rotation, and scale of one instance.
///
/// Only turned into a matrix when pushed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl InstanceTransform {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Unrotated, unit-scale instance at `position`
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY, Vec3::ONE)
    }

    /// Compose into a 4x4 transform matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

/// Ordered ring of instance transforms for one content category.
///
/// Storage order is ascending travel coordinate at construction: the front
/// is the trailing instance (closest behind the camera's path), the back is
/// the leading one. [`TransformPool::recycle_furthest`] keeps that order by
/// rotation, so the pool is sorted exactly once.
pub struct TransformPool {
    id: PoolId,
    axis: TravelAxis,
    instances: VecDeque<InstanceTransform>,
    /// Reused between uploads
    scratch: Vec<Mat4>,
    dirty: bool,
}

impl TransformPool {
    /// Create a pool, sorting the instances by travel coordinate
    pub fn new(id: PoolId, axis: TravelAxis, instances: Vec<InstanceTransform>) -> Self {
        let mut instances = instances;
        instances.sort_by(|a, b| {
            axis.coordinate(a.position)
                .total_cmp(&axis.coordinate(b.position))
        });

        Self {
            id,
            axis,
            scratch: Vec::with_capacity(instances.len()),
            instances: instances.into(),
            // Nothing has been uploaded yet
            dirty: true,
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstanceTransform> {
        self.instances.iter()
    }

    /// Travel coordinates in storage order
    pub fn coordinates(&self) -> Vec<f32> {
        self.instances
            .iter()
            .map(|t| self.axis.coordinate(t.position))
            .collect()
    }

    /// Travel coordinate of the front (trailing) instance
    pub fn trailing_coordinate(&self) -> Option<f32> {
        self.instances
            .front()
            .map(|t| self.axis.coordinate(t.position))
    }

    /// Travel coordinate of the back (leading) instance
    pub fn leading_coordinate(&self) -> Option<f32> {
        self.instances
            .back()
            .map(|t| self.axis.coordinate(t.position))
    }

    /// Move the trailing instance `span` forward and make it the leading one.
    ///
    /// Returns its new travel coordinate, or `None` on an empty pool.
    pub fn recycle_furthest(&mut self, span: f32) -> Option<f32> {
        let mut instance = self.instances.pop_front()?;
        instance.translate(self.axis.offset(span));
        let coordinate = self.axis.coordinate(instance.position);
        self.instances.push_back(instance);
        self.dirty = true;
        Some(coordinate)
    }

    /// Move every instance whose coordinate is below `threshold` forward by
    /// `span`, in place. Storage order is left alone.
    ///
    /// Returns how many instances moved.
    pub fn recycle_behind(&mut self, threshold: f32, span: f32) -> usize {
        let offset = self.axis.offset(span);
        let mut moved = 0;
        for instance in &mut self.instances {
            if self.axis.coordinate(instance.position) < threshold {
                instance.translate(offset);
                moved += 1;
            }
        }
        if moved > 0 {
            self.dirty = true;
        }
        moved
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Compose every transform and push the whole batch in one upload
    pub fn write_all(&mut self, sink: &mut dyn InstanceSink) {
        self.scratch.clear();
        self.scratch
            .extend(self.instances.iter().map(InstanceTransform::to_matrix));
        sink.upload_instance_matrices(self.id, &self.scratch);
        self.dirty = false;
    }

    /// Upload only if something moved since the last write
    pub fn flush(&mut self, sink: &mut dyn InstanceSink) -> bool {
        if !self.dirty {
            return false;
        }
        self.write_all(sink);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::recording::RecordingRenderer;

    fn pool_at(coords: &[f32]) -> TransformPool {
        let axis = TravelAxis::NEG_Z;
        let instances = coords
            .iter()
            .map(|&c| InstanceTransform::from_position(axis.offset(c)))
            .collect();
        TransformPool::new(PoolId(1), axis, instances)
    }

    #[test]
    fn test_construction_sorts_by_travel() {
        let pool = pool_at(&[400.0, 0.0, 800.0, 200.0, 600.0]);
        assert_eq!(pool.coordinates(), vec![0.0, 200.0, 400.0, 600.0, 800.0]);
        assert_eq!(pool.trailing_coordinate(), Some(0.0));
        assert_eq!(pool.leading_coordinate(), Some(800.0));
    }

    #[test]
    fn test_recycle_furthest_rotates() {
        let mut pool = pool_at(&[0.0, 200.0, 400.0, 600.0, 800.0]);
        assert_eq!(pool.recycle_furthest(1000.0), Some(1000.0));
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.coordinates(), vec![200.0, 400.0, 600.0, 800.0, 1000.0]);
    }

    #[test]
    fn test_cardinality_conserved() {
        let mut pool = pool_at(&[0.0, 10.0, 20.0]);
        for _ in 0..1000 {
            pool.recycle_furthest(30.0);
        }
        assert_eq!(pool.len(), 3);
        let coords = pool.coordinates();
        assert!(coords.windows(2).all(|w| w[0] < w[1]));

        pool.recycle_behind(f32::MAX, 30.0);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_recycle_empty_pool_is_noop() {
        let mut pool = pool_at(&[]);
        assert!(pool.is_empty());
        assert_eq!(pool.recycle_furthest(100.0), None);
        assert_eq!(pool.recycle_behind(100.0, 100.0), 0);
        assert_eq!(pool.trailing_coordinate(), None);
    }

    #[test]
    fn test_recycle_behind_moves_in_place() {
        let mut pool = pool_at(&[0.0, 50.0, 100.0]);
        let moved = pool.recycle_behind(60.0, 300.0);
        assert_eq!(moved, 2);
        assert_eq!(pool.coordinates(), vec![300.0, 350.0, 100.0]);
    }

    #[test]
    fn test_write_all_single_upload() {
        let mut pool = pool_at(&[0.0, 1.0, 2.0]);
        let mut renderer = RecordingRenderer::default();
        pool.write_all(&mut renderer);
        assert_eq!(renderer.upload_count(PoolId(1)), 1);
        let matrices = renderer.matrices(PoolId(1));
        assert_eq!(matrices.len(), 3);
        assert!((matrices[2].w_axis.z - (-2.0)).abs() < 1e-5);
        assert!(!pool.is_dirty());
    }

    #[test]
    fn test_flush_only_when_dirty() {
        let mut pool = pool_at(&[0.0, 1.0]);
        let mut renderer = RecordingRenderer::default();
        assert!(pool.flush(&mut renderer));
        assert!(!pool.flush(&mut renderer));
        pool.recycle_furthest(2.0);
        assert!(pool.flush(&mut renderer));
        assert_eq!(renderer.upload_count(PoolId(1)), 2);
    }

    #[test]
    fn test_matrix_composition() {
        let t = InstanceTransform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::IDENTITY,
            Vec3::splat(0.1),
        );
        let m = t.to_matrix();
        assert!((m.x_axis.x - 0.1).abs() < 1e-6);
        assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));
    }
}
