//! Keep-infinite recycling for repeating scenery
//!
//! A [`StreamingGroup`] owns the pools of one visual asset group (columns,
//! clouds, light streaks) and keeps every instance inside a window of one
//! `total_span` in front of the camera's recycle threshold.

use serde::{Deserialize, Serialize};

use crate::collaborators::InstanceSink;
use crate::core::CameraSnapshot;

use super::pool::TransformPool;

/// How a group decides what to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecyclePolicy {
    /// Pools are sorted; move the single trailing instance per frame when it
    /// falls behind the threshold
    WholePool,
    /// Test every instance independently and move it in place
    PerInstance,
}

/// Per-category recycling parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    pub policy: RecyclePolicy,
    /// Distance after which content repeats
    pub total_span: f32,
    /// Signed offset from the camera's travel coordinate at which instances
    /// count as passed. Negative keeps content alive behind the camera.
    pub recycle_margin: f32,
}

impl StreamConfig {
    pub fn whole_pool(total_span: f32) -> Self {
        Self {
            policy: RecyclePolicy::WholePool,
            total_span,
            recycle_margin: 0.0,
        }
    }

    pub fn per_instance(total_span: f32, recycle_margin: f32) -> Self {
        Self {
            policy: RecyclePolicy::PerInstance,
            total_span,
            recycle_margin,
        }
    }

    /// Travel coordinate below which instances get recycled
    pub fn threshold(&self, camera: &CameraSnapshot) -> f32 {
        camera.travel + self.recycle_margin
    }

    /// Half-open travel window every instance must occupy after an update
    pub fn window(&self, camera: &CameraSnapshot) -> (f32, f32) {
        let start = self.threshold(camera);
        (start, start + self.total_span)
    }
}

/// Running counters for one group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub updates: u64,
    pub recycled: u64,
    pub uploads: u64,
}

/// One content category's pools plus its recycling policy
pub struct StreamingGroup {
    name: String,
    config: StreamConfig,
    pools: Vec<TransformPool>,
    stats: StreamStats,
}

impl StreamingGroup {
    pub fn new(name: impl Into<String>, config: StreamConfig, pools: Vec<TransformPool>) -> Self {
        let name = name.into();
        let instances: usize = pools.iter().map(TransformPool::len).sum();
        if instances == 0 {
            log::warn!("Streaming group '{}' has no instances and will stay inert", name);
        } else {
            log::debug!(
                "Streaming group '{}': {} pools, {} instances, span {}, {:?}",
                name,
                pools.len(),
                instances,
                config.total_span,
                config.policy,
            );
        }

        Self {
            name,
            config,
            pools,
            stats: StreamStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn pools(&self) -> &[TransformPool] {
        &self.pools
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn instance_count(&self) -> usize {
        self.pools.iter().map(TransformPool::len).sum()
    }

    /// Recycle against this frame's camera snapshot.
    ///
    /// Returns the number of instances moved.
    pub fn update(&mut self, camera: &CameraSnapshot) -> usize {
        let threshold = self.config.threshold(camera);
        let span = self.config.total_span;
        self.stats.updates += 1;

        let mut moved = 0;
        for pool in &mut self.pools {
            match self.config.policy {
                RecyclePolicy::WholePool => {
                    // At most one per pool per frame
                    let passed = pool
                        .trailing_coordinate()
                        .is_some_and(|c| c < threshold);
                    if passed && pool.recycle_furthest(span).is_some() {
                        moved += 1;
                    }
                }
                RecyclePolicy::PerInstance => {
                    moved += pool.recycle_behind(threshold, span);
                }
            }
        }

        if moved > 0 {
            log::trace!("Group '{}' recycled {} instances", self.name, moved);
        }
        self.stats.recycled += moved as u64;
        moved
    }

    /// Push every pool that changed since its last upload
    pub fn flush(&mut self, sink: &mut dyn InstanceSink) {
        for pool in &mut self.pools {
            if pool.flush(sink) {
                self.stats.uploads += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::recording::RecordingRenderer;
    use crate::math::TravelAxis;
    use crate::streaming::pool::{InstanceTransform, PoolId};

    const AXIS: TravelAxis = TravelAxis::NEG_Z;

    fn pool(id: u32, coords: &[f32]) -> TransformPool {
        let instances = coords
            .iter()
            .map(|&c| InstanceTransform::from_position(AXIS.offset(c)))
            .collect();
        TransformPool::new(PoolId(id), AXIS, instances)
    }

    fn camera(travel: f32) -> CameraSnapshot {
        CameraSnapshot::at_travel(travel, &AXIS)
    }

    fn sorted(mut v: Vec<f32>) -> Vec<f32> {
        v.sort_by(f32::total_cmp);
        v
    }

    fn assert_in_window(group: &StreamingGroup, cam: &CameraSnapshot) {
        let (lo, hi) = group.config().window(cam);
        for pool in group.pools() {
            for c in pool.coordinates() {
                assert!(c >= lo && c < hi, "{} outside [{}, {}) in '{}'", c, lo, hi, group.name());
            }
        }
    }

    #[test]
    fn test_scenario_five_instances() {
        let mut group = StreamingGroup::new(
            "clouds",
            StreamConfig::whole_pool(1000.0),
            vec![pool(1, &[0.0, 200.0, 400.0, 600.0, 800.0])],
        );

        // Camera at the first instance has not passed it yet
        assert_eq!(group.update(&camera(0.0)), 0);

        assert_eq!(group.update(&camera(1.0)), 1);
        let coords = group.pools()[0].coordinates();
        assert_eq!(coords.len(), 5);
        assert_eq!(sorted(coords.clone()), vec![200.0, 400.0, 600.0, 800.0, 1000.0]);
        // Rotation, not a re-sort: storage order is a cyclic shift
        assert_eq!(coords, vec![200.0, 400.0, 600.0, 800.0, 1000.0]);
    }

    #[test]
    fn test_whole_pool_one_recycle_per_frame() {
        let mut group = StreamingGroup::new(
            "lights",
            StreamConfig::whole_pool(1000.0),
            vec![pool(1, &[0.0, 200.0, 400.0, 600.0, 800.0])],
        );
        // Three instances are behind, but only one moves this frame
        assert_eq!(group.update(&camera(500.0)), 1);
        assert_eq!(group.update(&camera(500.0)), 1);
        assert_eq!(group.update(&camera(500.0)), 1);
        assert_eq!(group.update(&camera(500.0)), 0);
        assert_eq!(group.stats().recycled, 3);
    }

    #[test]
    fn test_whole_pool_invariant_over_long_run() {
        let coords: Vec<f32> = (0..20).map(|i| i as f32 * 50.0).collect();
        let mut group = StreamingGroup::new(
            "clouds",
            StreamConfig::whole_pool(1000.0),
            vec![pool(1, &coords)],
        );

        let mut travel = 0.0;
        for _ in 0..10_000 {
            travel += 1.5;
            let cam = camera(travel);
            group.update(&cam);
            assert_in_window(&group, &cam);
        }
        assert_eq!(group.instance_count(), 20);
    }

    #[test]
    fn test_per_instance_invariant_with_margin() {
        // Unordered, densely packed props kept alive 200 units behind the camera
        let mut group = StreamingGroup::new(
            "columns",
            StreamConfig::per_instance(600.0, -200.0),
            vec![
                pool(1, &[-150.0, 310.0, 20.0, 390.0]),
                pool(2, &[-199.0, 100.0, 0.0]),
            ],
        );

        let mut travel = 0.0;
        for _ in 0..5_000 {
            travel += 3.0;
            let cam = camera(travel);
            group.update(&cam);
            assert_in_window(&group, &cam);
        }
        assert_eq!(group.instance_count(), 7);
    }

    #[test]
    fn test_per_instance_moves_every_passed_instance() {
        let mut group = StreamingGroup::new(
            "columns",
            StreamConfig::per_instance(1000.0, 0.0),
            vec![pool(1, &[0.0, 200.0, 400.0, 600.0, 800.0])],
        );
        assert_eq!(group.update(&camera(500.0)), 3);
        assert_eq!(
            sorted(group.pools()[0].coordinates()),
            vec![600.0, 800.0, 1000.0, 1200.0, 1400.0]
        );
    }

    #[test]
    fn test_empty_group_is_inert() {
        let mut group = StreamingGroup::new(
            "nothing",
            StreamConfig::whole_pool(100.0),
            vec![pool(1, &[])],
        );
        assert_eq!(group.update(&camera(1e6)), 0);
        assert_eq!(group.instance_count(), 0);
    }

    #[test]
    fn test_flush_uploads_changed_pools_once() {
        let mut group = StreamingGroup::new(
            "clouds",
            StreamConfig::whole_pool(1000.0),
            vec![pool(1, &[0.0, 500.0]), pool(2, &[100.0, 600.0])],
        );
        let mut renderer = RecordingRenderer::default();
        group.flush(&mut renderer);
        assert_eq!(renderer.upload_count(PoolId(1)), 1);
        assert_eq!(renderer.upload_count(PoolId(2)), 1);

        // Only pool 1 has passed the camera
        group.update(&camera(50.0));
        group.flush(&mut renderer);
        assert_eq!(renderer.upload_count(PoolId(1)), 2);
        assert_eq!(renderer.upload_count(PoolId(2)), 1);
        assert_eq!(group.stats().uploads, 3);
    }
}
