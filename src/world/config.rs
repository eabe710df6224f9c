//! World configuration
//!
//! Every value defaults to the production tuning, so an empty JSON object is
//! a complete configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::core::{Error, RigConfig};
use crate::math::TravelAxis;
use crate::narrative::NarrativeConfig;
use crate::streaming::{ConveyorConfig, FollowerConfig, StreamConfig};

/// Full repeat length of the scenery streams (206000 model units at 0.1 scale)
pub const DEFAULT_STREAM_SPAN: f32 = 20_600.0;

/// One recycled content category
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamCategory {
    pub name: String,
    /// Placement table to read from the asset provider
    pub placements: String,
    #[serde(flatten)]
    pub stream: StreamConfig,
}

impl StreamCategory {
    pub fn new(name: &str, stream: StreamConfig) -> Self {
        Self {
            name: name.to_string(),
            placements: name.to_string(),
            stream,
        }
    }
}

/// Asset ids of the road and door sequence
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetIds {
    pub road: String,
    pub door: String,
    pub light_plane: String,
}

impl Default for AssetIds {
    fn default() -> Self {
        Self {
            road: "SM_Road".to_string(),
            door: "DOOR".to_string(),
            light_plane: "PLANE".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub axis: TravelAxis,
    pub camera: RigConfig,
    pub road: ConveyorConfig,
    pub streams: Vec<StreamCategory>,
    pub followers: Vec<FollowerConfig>,
    pub narrative: NarrativeConfig,
    pub assets: AssetIds,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            axis: TravelAxis::NEG_Z,
            camera: RigConfig::default(),
            road: ConveyorConfig::default(),
            streams: vec![
                // Columns stay alive well behind the camera
                StreamCategory::new(
                    "columns",
                    StreamConfig::per_instance(DEFAULT_STREAM_SPAN, -2000.0),
                ),
                StreamCategory::new("clouds", StreamConfig::whole_pool(DEFAULT_STREAM_SPAN)),
                StreamCategory::new("light_streaks", StreamConfig::whole_pool(DEFAULT_STREAM_SPAN)),
            ],
            followers: vec![
                FollowerConfig {
                    asset: "BigCloud".to_string(),
                    travel_offset: 0.0,
                },
                FollowerConfig {
                    asset: "StarParticle".to_string(),
                    travel_offset: 200.0,
                },
            ],
            narrative: NarrativeConfig::default(),
            assets: AssetIds::default(),
        }
    }
}

impl WorldConfig {
    /// Read a JSON config and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: WorldConfig = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the frame loop cannot work with
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f32) -> Result<()> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be positive, got {}", name, value)))
            }
        }
        fn non_negative(name: &str, value: f32) -> Result<()> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must not be negative, got {}", name, value)))
            }
        }

        non_negative("camera.speed", self.camera.speed)?;
        positive("camera.stop_duration", self.camera.stop_duration)?;
        positive("camera.dive_duration", self.camera.dive_duration)?;
        positive("road.segment_length", self.road.segment_length)?;
        positive("road.model_scale", self.road.model_scale)?;
        non_negative("road.rise_duration", self.road.rise_duration)?;
        non_negative("road.door.settle_secs", self.road.door.settle_secs)?;
        non_negative("road.door.open_hold_secs", self.road.door.open_hold_secs)?;
        non_negative("narrative.reveal_delay", self.narrative.reveal_delay)?;
        non_negative("narrative.menu_delay", self.narrative.menu_delay)?;
        non_negative("narrative.post_dive_delay", self.narrative.post_dive_delay)?;

        for category in &self.streams {
            positive(
                &format!("streams.{}.total_span", category.name),
                category.stream.total_span,
            )?;
            if !category.stream.recycle_margin.is_finite() {
                return Err(Error::Config(format!(
                    "streams.{}.recycle_margin must be finite",
                    category.name
                )));
            }
        }
        Ok(())
    }
}
