//! One running experience: camera, scenery streams, road, and narrative

use std::collections::HashMap;

use crate::collaborators::{AssetProvider, Collaborators, Placement};
use crate::core::types::Result;
use crate::core::{CameraRig, CameraSnapshot, CameraUniform};
use crate::math::TravelAxis;
use crate::narrative::{Choreographer, NarrativeState, Stage, Transition};
use crate::streaming::{
    CameraFollower, ConveyorPools, InstanceTransform, PoolId, SegmentConveyor, StreamingGroup,
    TransformPool,
};

use super::config::WorldConfig;

/// Hands out renderer buffer ids and remembers what each one holds
#[derive(Default)]
struct PoolRegistry {
    labels: Vec<String>,
}

impl PoolRegistry {
    fn allocate(&mut self, label: impl Into<String>) -> PoolId {
        let id = PoolId(self.labels.len() as u32);
        self.labels.push(label.into());
        id
    }
}

pub struct World {
    axis: TravelAxis,
    rig: CameraRig,
    groups: Vec<StreamingGroup>,
    conveyor: SegmentConveyor,
    followers: Vec<CameraFollower>,
    choreographer: Choreographer,
    pools: PoolRegistry,
    frame: u64,
}

impl World {
    /// Build every component from resolved assets.
    ///
    /// Fails with `AssetMissing` if the road, the door, the light plane, a
    /// placement table, or any asset a placement names is absent.
    pub fn new(assets: &dyn AssetProvider, config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        let axis = config.axis;
        let mut pools = PoolRegistry::default();

        let road = assets.require(&config.assets.road)?;
        let door = assets.require(&config.assets.door)?;
        assets.require(&config.assets.light_plane)?;
        let conveyor_pools = ConveyorPools {
            road: pools.allocate(&config.assets.road),
            door: pools.allocate(&config.assets.door),
            light_plane: pools.allocate(&config.assets.light_plane),
        };
        let conveyor =
            SegmentConveyor::new(road, door, config.road.clone(), axis, conveyor_pools);

        let mut groups = Vec::with_capacity(config.streams.len());
        for category in &config.streams {
            let placements = assets.require_placements(&category.placements)?;
            let mut group_pools = Vec::new();
            for (asset, instances) in split_by_asset(placements) {
                assets.require(&asset)?;
                let id = pools.allocate(format!("{}/{}", category.name, asset));
                group_pools.push(TransformPool::new(id, axis, instances));
            }
            groups.push(StreamingGroup::new(
                category.name.clone(),
                category.stream.clone(),
                group_pools,
            ));
        }

        let mut followers = Vec::with_capacity(config.followers.len());
        for follower in &config.followers {
            let asset = assets.require(&follower.asset)?;
            let transform = asset
                .nodes
                .first()
                .map(|node| node.transform)
                .unwrap_or_default();
            let id = pools.allocate(&follower.asset);
            followers.push(CameraFollower::new(id, axis, follower.travel_offset, transform));
        }

        log::info!(
            "World built: {} streams, {} road segments, {} followers, {} pools",
            groups.len(),
            conveyor.segments().len(),
            followers.len(),
            pools.labels.len()
        );

        Ok(Self {
            axis,
            rig: CameraRig::new(config.camera.clone(), axis),
            groups,
            conveyor,
            followers,
            choreographer: Choreographer::new(config.narrative.clone()),
            pools,
            frame: 0,
        })
    }

    /// Advance one frame.
    ///
    /// The camera moves first; every stream then recycles against the same
    /// snapshot before anything is uploaded. The choreographer reacts last,
    /// so whatever it changes is seen by the next frame's streaming.
    pub fn tick(&mut self, dt: f32, collaborators: &mut Collaborators) -> Vec<Transition> {
        self.frame += 1;
        self.rig.update(dt);
        let camera = self.rig.snapshot();

        for group in &mut self.groups {
            group.update(&camera);
        }
        self.conveyor.update(&camera, dt);
        for follower in &mut self.followers {
            follower.update(&camera);
        }

        let renderer = &mut *collaborators.renderer;
        for group in &mut self.groups {
            group.flush(renderer);
        }
        self.conveyor.flush(renderer);
        for follower in &mut self.followers {
            follower.flush(renderer);
        }
        renderer.upload_camera(&CameraUniform::from_camera(self.rig.camera()));

        let mut stage = Stage {
            rig: &mut self.rig,
            conveyor: &mut self.conveyor,
            audio: &mut *collaborators.audio,
            ui: &mut *collaborators.ui,
            post: &mut *collaborators.post,
        };
        self.choreographer.tick(dt, &mut stage)
    }

    /// Match the projection to a new output size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.rig.camera_mut().set_aspect(width as f32, height as f32);
    }

    pub fn state(&self) -> NarrativeState {
        self.choreographer.state()
    }

    pub fn camera(&self) -> CameraSnapshot {
        self.rig.snapshot()
    }

    pub fn axis(&self) -> TravelAxis {
        self.axis
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Live tuning hook for the cruise speed and pause toggle
    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    pub fn groups(&self) -> &[StreamingGroup] {
        &self.groups
    }

    pub fn conveyor(&self) -> &SegmentConveyor {
        &self.conveyor
    }

    pub fn followers(&self) -> &[CameraFollower] {
        &self.followers
    }

    pub fn choreographer(&self) -> &Choreographer {
        &self.choreographer
    }

    /// What the renderer buffer `pool` holds
    pub fn pool_label(&self, pool: PoolId) -> Option<&str> {
        self.pools.labels.get(pool.0 as usize).map(String::as_str)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Group a placement table into one instance list per asset, in order of
/// first appearance
fn split_by_asset(placements: &[Placement]) -> Vec<(String, Vec<InstanceTransform>)> {
    let mut order: Vec<(String, Vec<InstanceTransform>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for placement in placements {
        let slot = *index.entry(placement.asset.as_str()).or_insert_with(|| {
            order.push((placement.asset.clone(), Vec::new()));
            order.len() - 1
        });
        order[slot].1.push(placement.transform);
    }
    order
}
