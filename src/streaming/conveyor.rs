//! The road: individually recycled segments with a pop-up re-entry
//!
//! The road model's top-level nodes form one lap. A second lap is cloned in
//! front of the first, so the conveyor spans two laps (`total_span`). Each
//! segment the camera passes jumps forward by `total_span` and rises into
//! place from below.
//!
//! Once the door trigger is armed, the next lap-start segment the camera
//! passes halts the conveyor, asks for the camera to stop, and spawns the
//! door ahead.

use serde::{Deserialize, Serialize};

use crate::animation::{Ease, Tween};
use crate::collaborators::{AssetNode, InstanceSink, RenderableAsset};
use crate::core::types::{Mat4, Vec3};
use crate::core::CameraSnapshot;
use crate::math::TravelAxis;
use crate::narrative::EventChannel;

use super::door::{Door, DoorConfig};
use super::pool::{InstanceTransform, PoolId};

/// Road layout and re-entry animation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConveyorConfig {
    /// Length of one lap along the travel axis
    pub segment_length: f32,
    /// Uniform scale applied to the imported road nodes
    pub model_scale: f32,
    /// Subtracted from every scaled node position. The door stands at
    /// `-model_offset.y`, level with the road surface.
    pub model_offset: Vec3,
    /// Vertical start offset of the re-entry animation
    pub rise_offset: f32,
    pub rise_duration: f32,
    pub rise_ease: Ease,
    pub door: DoorConfig,
}

impl Default for ConveyorConfig {
    fn default() -> Self {
        Self {
            segment_length: 212.4027,
            model_scale: 0.1,
            model_offset: Vec3::new(0.0, 34.0, 200.0),
            rise_offset: -70.0,
            rise_duration: 2.0,
            rise_ease: Ease::CubicOut,
            door: DoorConfig::default(),
        }
    }
}

/// Renderer buffers owned by the conveyor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConveyorPools {
    pub road: PoolId,
    pub door: PoolId,
    pub light_plane: PoolId,
}

/// Lifecycle signals emitted by the conveyor
#[derive(Clone, Debug, PartialEq)]
pub enum ConveyorEvent {
    /// The armed trigger fired on this lap-start segment
    SegmentPassedLapStart { segment: usize, position: Vec3 },
    /// The narrative should bring the camera to rest
    CameraStopRequested,
    /// The door has been placed and its intro started
    DoorSpawned { position: Vec3 },
    /// The door intro has frozen and the light plane is in place
    DoorReady { position: Vec3 },
}

/// One road segment
#[derive(Clone, Debug)]
pub struct SegmentRecord {
    /// Clone of the road node this segment renders
    pub node: AssetNode,
    /// Current (possibly animating) transform
    pub transform: InstanceTransform,
    /// Resting position; the re-entry animation ends here
    pub origin: Vec3,
    rise: Option<Tween<Vec3>>,
}

impl SegmentRecord {
    fn new(node: AssetNode, transform: InstanceTransform) -> Self {
        Self {
            node,
            origin: transform.position,
            transform,
            rise: None,
        }
    }

    pub fn is_rising(&self) -> bool {
        self.rise.is_some()
    }
}

pub struct SegmentConveyor {
    axis: TravelAxis,
    config: ConveyorConfig,
    pools: ConveyorPools,
    segments: Vec<SegmentRecord>,
    lap_size: usize,
    total_span: f32,
    running: bool,
    door_trigger_armed: bool,
    /// The trigger fires once per session
    door_triggered: bool,
    door_asset: RenderableAsset,
    door: Option<Door>,
    events: EventChannel<ConveyorEvent>,
    road_dirty: bool,
    scratch: Vec<Mat4>,
}

impl SegmentConveyor {
    /// Lay out two laps of the road model.
    ///
    /// The door asset is taken up front so a missing door fails construction
    /// rather than the narrative's climax.
    pub fn new(
        road: &RenderableAsset,
        door_asset: &RenderableAsset,
        config: ConveyorConfig,
        axis: TravelAxis,
        pools: ConveyorPools,
    ) -> Self {
        let lap_size = road.nodes.len();
        let total_span = config.segment_length * 2.0;

        let lap: Vec<SegmentRecord> = road
            .nodes
            .iter()
            .map(|node| {
                let t = node.transform;
                let transform = InstanceTransform::new(
                    t.position * config.model_scale - config.model_offset,
                    t.rotation,
                    t.scale * config.model_scale,
                );
                SegmentRecord::new(node.clone(), transform)
            })
            .collect();

        // Second lap cloned one segment length further along
        let ahead = axis.offset(config.segment_length);
        let clones: Vec<SegmentRecord> = lap
            .iter()
            .map(|segment| {
                let mut transform = segment.transform;
                transform.translate(ahead);
                SegmentRecord::new(segment.node.clone(), transform)
            })
            .collect();

        let mut segments = lap;
        segments.extend(clones);

        log::info!(
            "Road conveyor: {} segments per lap, span {:.2}",
            lap_size,
            total_span
        );

        Self {
            axis,
            config,
            pools,
            segments,
            lap_size,
            total_span,
            running: true,
            door_trigger_armed: false,
            door_triggered: false,
            door_asset: door_asset.clone(),
            door: None,
            events: EventChannel::new(),
            road_dirty: true,
            scratch: Vec::with_capacity(lap_size * 2),
        }
    }

    /// Arm the door trigger. Idempotent; has no effect once the door exists.
    pub fn activate_door_trigger(&mut self) {
        if self.door_triggered {
            log::debug!("Door trigger already consumed");
            return;
        }
        if !self.door_trigger_armed {
            log::info!("Door trigger armed");
        }
        self.door_trigger_armed = true;
    }

    /// Open the spawned door partway. False if there is no ready door.
    pub fn open_door(&mut self) -> bool {
        match &mut self.door {
            Some(door) => door.open(),
            None => {
                log::warn!("open_door called before the door exists");
                false
            }
        }
    }

    /// Restart segment recycling after a halt
    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_door_trigger_armed(&self) -> bool {
        self.door_trigger_armed
    }

    pub fn config(&self) -> &ConveyorConfig {
        &self.config
    }

    pub fn lap_size(&self) -> usize {
        self.lap_size
    }

    pub fn total_span(&self) -> f32 {
        self.total_span
    }

    pub fn segments(&self) -> &[SegmentRecord] {
        &self.segments
    }

    pub fn door(&self) -> Option<&Door> {
        self.door.as_ref()
    }

    pub fn events(&mut self) -> &mut EventChannel<ConveyorEvent> {
        &mut self.events
    }

    /// Advance animations and recycle passed segments
    pub fn update(&mut self, camera: &CameraSnapshot, dt: f32) {
        self.advance_rises(dt);

        if let Some(door) = &mut self.door {
            if door.update(dt) {
                let position = door.position();
                self.events.emit(ConveyorEvent::DoorReady { position });
            }
        }

        if !self.running || self.lap_size == 0 {
            return;
        }

        for i in 0..self.segments.len() {
            let origin = self.segments[i].origin;
            if self.axis.coordinate(origin) >= camera.travel {
                continue;
            }

            if i % self.lap_size == 0 && self.door_trigger_armed {
                self.trigger_door(i, origin);
                // The narrative takes over; nothing else moves this frame
                return;
            }

            self.recycle(i);
        }
    }

    fn advance_rises(&mut self, dt: f32) {
        for segment in &mut self.segments {
            if let Some(tween) = &mut segment.rise {
                segment.transform.position = tween.advance(dt);
                if tween.is_finished() {
                    segment.rise = None;
                }
                self.road_dirty = true;
            }
        }
    }

    fn recycle(&mut self, index: usize) {
        let span = self.axis.offset(self.total_span);
        let rise_offset = Vec3::Y * self.config.rise_offset;
        let segment = &mut self.segments[index];

        segment.origin += span;
        let start = segment.origin + rise_offset;
        segment.transform.position = start;
        segment.rise = Some(Tween::new(
            start,
            segment.origin,
            self.config.rise_duration,
            self.config.rise_ease,
        ));
        self.road_dirty = true;

        log::debug!(
            "Segment {} recycled to travel {:.1}",
            index,
            self.axis.coordinate(segment.origin)
        );
    }

    fn trigger_door(&mut self, index: usize, position: Vec3) {
        self.running = false;
        self.door_trigger_armed = false;
        self.door_triggered = true;

        log::info!("Lap start segment {} passed with trigger armed; halting road", index);
        self.events.emit(ConveyorEvent::SegmentPassedLapStart {
            segment: index,
            position,
        });
        self.events.emit(ConveyorEvent::CameraStopRequested);

        let travel = self.axis.coordinate(position) + self.total_span + self.config.door.gap;
        let door_position = Vec3::Y * -self.config.model_offset.y + self.axis.offset(travel);
        let door = Door::spawn(&self.door_asset, door_position, &self.config.door);
        self.door = Some(door);
        self.events.emit(ConveyorEvent::DoorSpawned {
            position: door_position,
        });
    }

    /// Push road, door, and light plane transforms that changed
    pub fn flush(&mut self, sink: &mut dyn InstanceSink) {
        if self.road_dirty {
            self.scratch.clear();
            self.scratch
                .extend(self.segments.iter().map(|s| s.transform.to_matrix()));
            sink.upload_instance_matrices(self.pools.road, &self.scratch);
            self.road_dirty = false;
        }
        if let Some(door) = &mut self.door {
            door.flush(sink, self.pools.door, self.pools.light_plane);
        }
    }
}
