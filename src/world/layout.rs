//! Procedural demo content
//!
//! Builds placement tables and stand-in assets with a deterministic integer
//! hash, so the headless driver and the tests get the same scenery every run.

use crate::animation::{AnimationClip, TransformKeyframe};
use crate::collaborators::{AssetNode, MemoryAssets, Placement, RenderableAsset};
use crate::core::types::{Quat, Vec3};
use crate::math::TravelAxis;
use crate::streaming::InstanceTransform;

use super::config::WorldConfig;

/// Integer hash producing a value in [0, 1]
fn hash_unit(index: u32, channel: u32, seed: u32) -> f32 {
    let mut h = index
        .wrapping_mul(374761393)
        .wrapping_add(channel.wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1274126177));
    h = (h ^ (h >> 13)).wrapping_mul(1103515245);
    h = h ^ (h >> 16);
    (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
}

fn lerp_range(range: (f32, f32), t: f32) -> f32 {
    range.0 + (range.1 - range.0) * t
}

/// Parameters for scattering one asset along the travel axis
#[derive(Clone, Debug)]
pub struct ScatterParams {
    pub asset: String,
    pub count: usize,
    /// Instances are spread over `[start, start + span)` in travel
    pub start: f32,
    pub span: f32,
    pub lateral: (f32, f32),
    pub height: (f32, f32),
    pub scale: (f32, f32),
    pub seed: u32,
}

/// Spread `count` instances evenly over the span, jittered within their slot
pub fn scatter(params: &ScatterParams, axis: &TravelAxis) -> Vec<Placement> {
    if params.count == 0 {
        return Vec::new();
    }
    let slot = params.span / params.count as f32;
    // Any horizontal direction perpendicular to travel
    let side = axis.direction().cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);

    (0..params.count as u32)
        .map(|i| {
            let jitter = hash_unit(i, 0, params.seed) * 0.9;
            let travel = params.start + (i as f32 + jitter) * slot;
            let x = lerp_range(params.lateral, hash_unit(i, 1, params.seed));
            let y = lerp_range(params.height, hash_unit(i, 2, params.seed));
            let s = lerp_range(params.scale, hash_unit(i, 3, params.seed));
            let yaw = hash_unit(i, 4, params.seed) * std::f32::consts::TAU;

            let position = axis.offset(travel) + side * x + Vec3::Y * y;
            Placement::new(
                params.asset.clone(),
                InstanceTransform::new(position, Quat::from_rotation_y(yaw), Vec3::splat(s)),
            )
        })
        .collect()
}

/// A road model whose `segments` nodes land evenly over one lap once the
/// conveyor applies its model scale and offset
pub fn road_asset(name: &str, segments: usize, config: &WorldConfig) -> RenderableAsset {
    let road = &config.road;
    let step = road.segment_length / segments.max(1) as f32;
    (0..segments).fold(RenderableAsset::new(name), |asset, i| {
        let placed = config.axis.offset(i as f32 * step);
        let model = (placed + road.model_offset) / road.model_scale;
        asset.with_node(AssetNode::new(
            format!("{}_{:02}", name, i),
            InstanceTransform::from_position(model),
        ))
    })
}

/// Two door leaves swinging open around their hinges over three seconds
pub fn door_asset(name: &str) -> RenderableAsset {
    let leaf = |leaf: &str, hinge: f32, swing: f32| {
        let at = Vec3::new(hinge, 0.0, 0.0);
        AnimationClip::new(format!("{}_{}", name, leaf))
            .with_keyframe(TransformKeyframe::new(0.0, at, Quat::IDENTITY, Vec3::ONE))
            .with_keyframe(TransformKeyframe::new(
                3.0,
                at,
                Quat::from_rotation_y(swing),
                Vec3::ONE,
            ))
    };
    RenderableAsset::new(name)
        .with_node(AssetNode::new(format!("{}_frame", name), InstanceTransform::default()))
        .with_animation(leaf("left", -60.0, 1.4))
        .with_animation(leaf("right", 60.0, -1.4))
}

/// Single-node asset at the origin
pub fn prop_asset(name: &str) -> RenderableAsset {
    RenderableAsset::new(name).with_node(AssetNode::new(name, InstanceTransform::default()))
}

/// Queue every asset and placement table `config` refers to, so that the
/// loading phase has something to report
pub fn demo_assets(config: &WorldConfig) -> MemoryAssets {
    let mut assets = MemoryAssets::new();
    let axis = config.axis;

    assets.queue_asset(road_asset(&config.assets.road, 12, config));
    assets.queue_asset(door_asset(&config.assets.door));
    assets.queue_asset(prop_asset(&config.assets.light_plane));
    for follower in &config.followers {
        assets.queue_asset(prop_asset(&follower.asset));
    }
    for prop in ["Column", "Cloud", "PolarLight"] {
        assets.queue_asset(prop_asset(prop));
    }

    for (n, category) in config.streams.iter().enumerate() {
        let span = category.stream.total_span;
        // Fill the window the group maintains at the start position
        let start = axis.coordinate(config.camera.start) + category.stream.recycle_margin;
        let seed = 17 + n as u32;
        let placements = match category.name.as_str() {
            "columns" => {
                // Two rows, one per side of the road
                let mut rows = scatter(
                    &ScatterParams {
                        asset: "Column".to_string(),
                        count: 40,
                        start,
                        span,
                        lateral: (-90.0, -60.0),
                        height: (-60.0, -40.0),
                        scale: (0.8, 1.2),
                        seed,
                    },
                    &axis,
                );
                rows.extend(scatter(
                    &ScatterParams {
                        asset: "Column".to_string(),
                        count: 40,
                        start,
                        span,
                        lateral: (60.0, 90.0),
                        height: (-60.0, -40.0),
                        scale: (0.8, 1.2),
                        seed: seed + 100,
                    },
                    &axis,
                ));
                rows
            }
            "light_streaks" => scatter(
                &ScatterParams {
                    asset: "PolarLight".to_string(),
                    count: 30,
                    start,
                    span,
                    lateral: (-400.0, 400.0),
                    height: (150.0, 400.0),
                    scale: (1.0, 3.0),
                    seed,
                },
                &axis,
            ),
            _ => scatter(
                &ScatterParams {
                    asset: "Cloud".to_string(),
                    count: 60,
                    start,
                    span,
                    lateral: (-600.0, 600.0),
                    height: (-200.0, -80.0),
                    scale: (2.0, 5.0),
                    seed,
                },
                &axis,
            ),
        };
        assets.queue_placements(category.placements.clone(), placements);
    }

    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::AssetProvider;
    use crate::streaming::{ConveyorPools, PoolId, SegmentConveyor};

    #[test]
    fn test_scatter_is_deterministic_and_in_span() {
        let params = ScatterParams {
            asset: "Cloud".to_string(),
            count: 50,
            start: 0.0,
            span: 1000.0,
            lateral: (-10.0, 10.0),
            height: (0.0, 5.0),
            scale: (1.0, 2.0),
            seed: 3,
        };
        let axis = TravelAxis::NEG_Z;
        let a = scatter(&params, &axis);
        let b = scatter(&params, &axis);
        assert_eq!(a.len(), 50);
        for (p, q) in a.iter().zip(&b) {
            assert_eq!(p.transform, q.transform);
            let travel = axis.coordinate(p.transform.position);
            assert!((0.0..1000.0).contains(&travel));
            assert!(p.transform.position.y >= 0.0 && p.transform.position.y <= 5.0);
        }
    }

    #[test]
    fn test_road_asset_lands_on_lap() {
        let config = WorldConfig::default();
        let road = road_asset("SM_Road", 8, &config);
        let conveyor = SegmentConveyor::new(
            &road,
            &door_asset("DOOR"),
            config.road.clone(),
            config.axis,
            ConveyorPools {
                road: PoolId(0),
                door: PoolId(1),
                light_plane: PoolId(2),
            },
        );
        let step = config.road.segment_length / 8.0;
        for (i, segment) in conveyor.segments().iter().enumerate() {
            let travel = config.axis.coordinate(segment.origin);
            assert!((travel - i as f32 * step).abs() < 1e-2, "segment {} at {}", i, travel);
            assert!(segment.origin.y.abs() < 1e-3);
        }
    }

    #[test]
    fn test_demo_assets_cover_config() {
        let config = WorldConfig::default();
        let mut assets = demo_assets(&config);
        assert!(!assets.is_ready());
        while assets.load_next() {}

        assert!(assets.require(&config.assets.road).is_ok());
        assert_eq!(assets.require(&config.assets.door).map(|d| d.animations.len()).ok(), Some(2));
        for category in &config.streams {
            assert!(!assets.require_placements(&category.placements).unwrap().is_empty());
        }
        for follower in &config.followers {
            assert!(assets.get_asset(&follower.asset).is_some());
        }
    }
}
