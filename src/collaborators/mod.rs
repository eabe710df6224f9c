//! Narrow interfaces to everything outside the streaming and choreography
//! core: asset loading, the renderer, audio, UI, and post-processing.
//!
//! The in-memory implementations in [`memory`] and [`recording`] back the
//! headless driver and the tests.

pub mod asset;
pub mod memory;
pub mod recording;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{Mat4, Result};
use crate::core::{CameraUniform, Error};
use crate::streaming::PoolId;

pub use asset::{AssetNode, Placement, RenderableAsset};
pub use memory::MemoryAssets;
pub use recording::{AudioCall, RecordingAudio, RecordingPost, RecordingRenderer, ScriptedUi};

/// Resolved assets and placement tables.
///
/// Readiness is polled: the session checks [`AssetProvider::is_ready`] once
/// per tick and builds the world the first time it returns true.
pub trait AssetProvider {
    fn get_asset(&self, id: &str) -> Option<&RenderableAsset>;

    /// Placement table (where each instance of a content category goes)
    fn placements(&self, id: &str) -> Option<&[Placement]>;

    /// Fraction of required assets resolved, in [0, 1]
    fn load_progress(&self) -> f32;

    fn is_ready(&self) -> bool {
        self.load_progress() >= 1.0
    }

    /// Like [`AssetProvider::get_asset`], but a missing asset is an error
    fn require(&self, id: &str) -> Result<&RenderableAsset> {
        self.get_asset(id)
            .ok_or_else(|| Error::AssetMissing(id.to_string()))
    }

    fn require_placements(&self, id: &str) -> Result<&[Placement]> {
        self.placements(id)
            .ok_or_else(|| Error::AssetMissing(format!("placements '{}'", id)))
    }
}

/// Device-side instance buffers
pub trait InstanceSink {
    /// Replace the contents of `pool`'s buffer with `matrices`.
    ///
    /// Callers batch: one call per pool per frame at most.
    fn upload_instance_matrices(&mut self, pool: PoolId, matrices: &[Mat4]);

    /// Per-frame view data. Sinks that draw nothing may ignore it.
    fn upload_camera(&mut self, _camera: &CameraUniform) {}
}

pub trait AudioSink {
    fn play(&mut self, clip: &str);
    fn play_looping(&mut self, clip: &str);
    fn fade(&mut self, clip: &str, from: f32, to: f32, duration_ms: u32);
}

/// Page elements the choreography toggles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiElement {
    LoaderScreen,
    Menu,
    MenuContent,
    EnterButton,
    LoadingElement,
    LoadingBar,
}

impl fmt::Display for UiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UiElement::LoaderScreen => "loader-screen",
            UiElement::Menu => "menu",
            UiElement::MenuContent => "menu-content",
            UiElement::EnterButton => "enter",
            UiElement::LoadingElement => "loading-element",
            UiElement::LoadingBar => "loading-bar",
        };
        f.write_str(name)
    }
}

/// User input surfaced by the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiSignal {
    /// The menu's call-to-action was clicked
    Begin,
    /// The "enter" affordance in front of the door was clicked
    Enter,
}

pub trait UiSurface {
    fn show(&mut self, element: UiElement);
    fn hide(&mut self, element: UiElement);
    fn set_interactive(&mut self, element: UiElement, interactive: bool);
    fn set_load_progress(&mut self, progress: f32);
    /// Animate a progress element's fill to `target` over `duration_secs`
    fn animate_progress(&mut self, element: UiElement, target: f32, duration_secs: f32);
    /// Next pending user signal, if any
    fn poll_signal(&mut self) -> Option<UiSignal>;
}

/// Cosmetic screen-space effects; fire and forget
pub trait PostProcessing {
    fn blur_background(&mut self);
    fn trigger_bloom_transition(&mut self);
}

/// Mutable handles to every outward-facing collaborator for one frame
pub struct Collaborators<'a> {
    pub renderer: &'a mut dyn InstanceSink,
    pub audio: &'a mut dyn AudioSink,
    pub ui: &'a mut dyn UiSurface,
    pub post: &'a mut dyn PostProcessing,
}
