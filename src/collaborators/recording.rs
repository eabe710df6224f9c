//! Collaborators that record what they are asked to do
//!
//! Used by the headless driver in place of a GPU, speakers, and a page, and by
//! tests to assert on the choreography's outward effects.

use std::collections::{HashMap, HashSet, VecDeque};
use std::mem::size_of;

use crate::core::types::Mat4;
use crate::core::CameraUniform;
use crate::streaming::PoolId;

use super::{AudioSink, InstanceSink, PostProcessing, UiElement, UiSignal, UiSurface};

#[derive(Default)]
struct StagingBuffer {
    bytes: Vec<u8>,
    uploads: usize,
}

/// Packs uploaded matrices into per-pool byte staging buffers, the way they
/// would be copied into a vertex buffer
#[derive(Default)]
pub struct RecordingRenderer {
    buffers: HashMap<PoolId, StagingBuffer>,
    camera: Vec<u8>,
    camera_uploads: usize,
}

impl RecordingRenderer {
    /// Number of uploads received for `pool`
    pub fn upload_count(&self, pool: PoolId) -> usize {
        self.buffers.get(&pool).map_or(0, |b| b.uploads)
    }

    pub fn total_uploads(&self) -> usize {
        self.buffers.values().map(|b| b.uploads).sum()
    }

    /// Raw bytes of the last upload to `pool`
    pub fn bytes(&self, pool: PoolId) -> &[u8] {
        self.buffers
            .get(&pool)
            .map(|b| b.bytes.as_slice())
            .unwrap_or(&[])
    }

    /// Decode the last upload to `pool` back into matrices
    pub fn matrices(&self, pool: PoolId) -> Vec<Mat4> {
        self.bytes(pool)
            .chunks_exact(size_of::<Mat4>())
            .map(bytemuck::pod_read_unaligned::<Mat4>)
            .collect()
    }

    pub fn pools(&self) -> impl Iterator<Item = PoolId> + '_ {
        self.buffers.keys().copied()
    }

    /// Last camera block received, decoded from its staging bytes
    pub fn camera(&self) -> Option<CameraUniform> {
        if self.camera.len() != size_of::<CameraUniform>() {
            return None;
        }
        Some(bytemuck::pod_read_unaligned(&self.camera))
    }

    pub fn camera_uploads(&self) -> usize {
        self.camera_uploads
    }
}

impl InstanceSink for RecordingRenderer {
    fn upload_instance_matrices(&mut self, pool: PoolId, matrices: &[Mat4]) {
        let buffer = self.buffers.entry(pool).or_default();
        buffer.bytes.clear();
        buffer.bytes.extend_from_slice(bytemuck::cast_slice(matrices));
        buffer.uploads += 1;
    }

    fn upload_camera(&mut self, camera: &CameraUniform) {
        self.camera.clear();
        self.camera.extend_from_slice(bytemuck::bytes_of(camera));
        self.camera_uploads += 1;
    }
}

/// One audio request
#[derive(Clone, Debug, PartialEq)]
pub enum AudioCall {
    Play(String),
    Loop(String),
    Fade {
        clip: String,
        from: f32,
        to: f32,
        duration_ms: u32,
    },
}

#[derive(Default)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
}

impl RecordingAudio {
    /// How many times `clip` was started, looping or not
    pub fn play_count(&self, clip: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, AudioCall::Play(id) | AudioCall::Loop(id) if id == clip))
            .count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, clip: &str) {
        self.calls.push(AudioCall::Play(clip.to_string()));
    }

    fn play_looping(&mut self, clip: &str) {
        self.calls.push(AudioCall::Loop(clip.to_string()));
    }

    fn fade(&mut self, clip: &str, from: f32, to: f32, duration_ms: u32) {
        self.calls.push(AudioCall::Fade {
            clip: clip.to_string(),
            from,
            to,
            duration_ms,
        });
    }
}

/// UI state tracker with a queue of pre-scripted or injected clicks
pub struct ScriptedUi {
    visible: HashSet<UiElement>,
    disabled: HashSet<UiElement>,
    signals: VecDeque<UiSignal>,
    load_progress: f32,
    progress_animations: Vec<(UiElement, f32, f32)>,
    /// Number of times each element was shown
    show_counts: HashMap<UiElement, usize>,
}

impl ScriptedUi {
    /// Fresh page: the loader screen is up and the hidden menu holds its content
    pub fn new() -> Self {
        Self {
            visible: HashSet::from([UiElement::LoaderScreen, UiElement::MenuContent]),
            disabled: HashSet::new(),
            signals: VecDeque::new(),
            load_progress: 0.0,
            progress_animations: Vec::new(),
            show_counts: HashMap::new(),
        }
    }

    /// Inject a click to be delivered on the next poll
    pub fn click(&mut self, signal: UiSignal) {
        self.signals.push_back(signal);
    }

    pub fn is_visible(&self, element: UiElement) -> bool {
        self.visible.contains(&element)
    }

    pub fn is_interactive(&self, element: UiElement) -> bool {
        !self.disabled.contains(&element)
    }

    pub fn show_count(&self, element: UiElement) -> usize {
        self.show_counts.get(&element).copied().unwrap_or(0)
    }

    pub fn load_progress(&self) -> f32 {
        self.load_progress
    }

    pub fn progress_animations(&self) -> &[(UiElement, f32, f32)] {
        &self.progress_animations
    }
}

impl Default for ScriptedUi {
    fn default() -> Self {
        Self::new()
    }
}

impl UiSurface for ScriptedUi {
    fn show(&mut self, element: UiElement) {
        self.visible.insert(element);
        *self.show_counts.entry(element).or_insert(0) += 1;
    }

    fn hide(&mut self, element: UiElement) {
        self.visible.remove(&element);
    }

    fn set_interactive(&mut self, element: UiElement, interactive: bool) {
        if interactive {
            self.disabled.remove(&element);
        } else {
            self.disabled.insert(element);
        }
    }

    fn set_load_progress(&mut self, progress: f32) {
        self.load_progress = progress.clamp(0.0, 1.0);
    }

    fn animate_progress(&mut self, element: UiElement, target: f32, duration_secs: f32) {
        self.progress_animations.push((element, target, duration_secs));
    }

    fn poll_signal(&mut self) -> Option<UiSignal> {
        self.signals.pop_front()
    }
}

#[derive(Default)]
pub struct RecordingPost {
    pub blur_count: usize,
    pub bloom_count: usize,
}

impl PostProcessing for RecordingPost {
    fn blur_background(&mut self) {
        self.blur_count += 1;
    }

    fn trigger_bloom_transition(&mut self) {
        self.bloom_count += 1;
    }
}
