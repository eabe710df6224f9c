//! Renderable asset descriptions

use crate::animation::AnimationClip;
use crate::streaming::InstanceTransform;

/// One mesh node inside an asset, with its local transform
#[derive(Clone, Debug)]
pub struct AssetNode {
    pub name: String,
    pub transform: InstanceTransform,
}

impl AssetNode {
    pub fn new(name: impl Into<String>, transform: InstanceTransform) -> Self {
        Self {
            name: name.into(),
            transform,
        }
    }
}

/// A loaded model: its top-level nodes and any animation clips.
///
/// Cloning is cheap enough to do once per segment at startup.
#[derive(Clone, Debug)]
pub struct RenderableAsset {
    pub name: String,
    pub nodes: Vec<AssetNode>,
    pub animations: Vec<AnimationClip>,
}

impl RenderableAsset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            animations: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: AssetNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_animation(mut self, clip: AnimationClip) -> Self {
        self.animations.push(clip);
        self
    }
}

/// Where one instance of a named asset sits in the world
#[derive(Clone, Debug)]
pub struct Placement {
    pub asset: String,
    pub transform: InstanceTransform,
}

impl Placement {
    pub fn new(asset: impl Into<String>, transform: InstanceTransform) -> Self {
        Self {
            asset: asset.into(),
            transform,
        }
    }
}
