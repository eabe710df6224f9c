//! The door that materializes at the end of the road
//!
//! Timing is driven by fixed delays, not by clip lengths: the intro plays for
//! `settle_secs` and then freezes, and opening runs the clips for
//! `open_hold_secs` before freezing again, leaving the door ajar.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationPlayer;
use crate::collaborators::{InstanceSink, RenderableAsset};
use crate::core::types::{Mat4, Quat, Vec3};

use super::pool::{InstanceTransform, PoolId};

/// Door placement and timing
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Extra distance past the recycled lap at which the door stands
    pub gap: f32,
    pub scale: Vec3,
    /// Uniform scale of the light-through-the-gap plane
    pub plane_scale: f32,
    /// Emissive multiplier of the light plane's white
    pub plane_intensity: f32,
    /// How long the intro animation runs before freezing
    pub settle_secs: f32,
    /// How long opening runs before freezing
    pub open_hold_secs: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            gap: 14.0,
            scale: Vec3::new(0.1, 0.1, 0.04),
            plane_scale: 0.1,
            plane_intensity: 3.0,
            settle_secs: 1.458,
            open_hold_secs: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorPhase {
    /// Intro animation running
    Settling,
    /// Frozen shut, waiting to be opened
    Ready,
    /// Opening clips running
    Opening,
    /// Frozen ajar
    Ajar,
}

/// The emissive plane spawned behind the door once it is ready
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightPlane {
    pub transform: InstanceTransform,
    /// Color multiplier applied to pure white
    pub intensity: f32,
}

/// A spawned door and its animation state
pub struct Door {
    transform: InstanceTransform,
    player: AnimationPlayer,
    phase: DoorPhase,
    /// Seconds left in the current timed phase
    remaining: f32,
    open_hold_secs: f32,
    plane: Option<LightPlane>,
    plane_scale: f32,
    plane_intensity: f32,
    dirty: bool,
}

impl Door {
    /// Place the door and start its intro animation
    pub fn spawn(asset: &RenderableAsset, position: Vec3, config: &DoorConfig) -> Self {
        let mut player = AnimationPlayer::new(asset.animations.clone());
        if player.is_empty() {
            log::warn!(
                "Door asset '{}' has no animation tracks; using fixed delays only",
                asset.name
            );
        }
        player.play_all_once();
        log::info!("Door spawned at {:?}", position);

        Self {
            transform: InstanceTransform::new(position, Quat::IDENTITY, config.scale),
            player,
            phase: DoorPhase::Settling,
            remaining: config.settle_secs,
            open_hold_secs: config.open_hold_secs,
            plane: None,
            plane_scale: config.plane_scale,
            plane_intensity: config.plane_intensity,
            dirty: true,
        }
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn light_plane(&self) -> Option<&LightPlane> {
        self.plane.as_ref()
    }

    pub fn player(&self) -> &AnimationPlayer {
        &self.player
    }

    /// Advance animation and timers.
    ///
    /// Returns true on the frame the door becomes ready.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.player.is_playing() {
            self.player.update(dt);
            self.dirty = true;
        }

        match self.phase {
            DoorPhase::Settling => {
                self.remaining -= dt;
                if self.remaining <= 0.0 {
                    self.player.pause_all();
                    self.phase = DoorPhase::Ready;
                    self.spawn_light_plane();
                    log::info!("Door ready");
                    return true;
                }
            }
            DoorPhase::Opening => {
                self.remaining -= dt;
                if self.remaining <= 0.0 {
                    self.player.pause_all();
                    self.phase = DoorPhase::Ajar;
                    log::debug!("Door frozen ajar");
                }
            }
            DoorPhase::Ready | DoorPhase::Ajar => {}
        }
        false
    }

    /// Resume the clips briefly. Only valid while ready.
    pub fn open(&mut self) -> bool {
        if self.phase != DoorPhase::Ready {
            log::warn!("Ignoring door open while {:?}", self.phase);
            return false;
        }
        self.player.resume_all();
        self.phase = DoorPhase::Opening;
        self.remaining = self.open_hold_secs;
        log::info!("Door opening");
        true
    }

    fn spawn_light_plane(&mut self) {
        self.plane = Some(LightPlane {
            transform: InstanceTransform::new(
                self.transform.position,
                Quat::IDENTITY,
                Vec3::splat(self.plane_scale),
            ),
            intensity: self.plane_intensity,
        });
        self.dirty = true;
    }

    /// Door pose: one matrix per animated node, or the bare placement when
    /// the asset has no tracks
    pub fn matrices(&self) -> Vec<Mat4> {
        let base = self.transform.to_matrix();
        if self.player.is_empty() {
            return vec![base];
        }
        self.player
            .sample()
            .into_iter()
            .map(|pose| base * pose)
            .collect()
    }

    /// Push the door and, once spawned, the light plane
    pub fn flush(&mut self, sink: &mut dyn InstanceSink, door_pool: PoolId, plane_pool: PoolId) {
        if !self.dirty {
            return;
        }
        sink.upload_instance_matrices(door_pool, &self.matrices());
        if let Some(plane) = &self.plane {
            sink.upload_instance_matrices(plane_pool, &[plane.transform.to_matrix()]);
        }
        self.dirty = false;
    }
}
