//! Frame timing utilities

use std::time::Instant;

/// Longest delta a single frame may report, in seconds.
///
/// A stalled tab or a debugger pause would otherwise teleport the camera past
/// several segments in one tick.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Where frame deltas come from
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockSource {
    /// Wall-clock time between `tick` calls
    Realtime,
    /// Every tick advances by exactly this many seconds
    Fixed(f32),
}

/// Tracks frame timing for the render loop
pub struct FrameTimer {
    source: ClockSource,
    last_frame: Instant,
    delta: f32,
    elapsed: f64,
    frame_count: u64,
    fps_timer: f32,
    fps: f32,
    fps_frame_count: u32,
}

impl FrameTimer {
    /// Create a wall-clock timer
    pub fn new() -> Self {
        Self::with_source(ClockSource::Realtime)
    }

    /// Create a timer that advances by a constant step each tick
    pub fn fixed(step_secs: f32) -> Self {
        Self::with_source(ClockSource::Fixed(step_secs))
    }

    fn with_source(source: ClockSource) -> Self {
        Self {
            source,
            last_frame: Instant::now(),
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
            fps: 0.0,
            fps_frame_count: 0,
        }
    }

    /// Call once per frame to update timing. Returns the frame delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let raw = match self.source {
            ClockSource::Realtime => {
                let now = Instant::now();
                let delta = now - self.last_frame;
                self.last_frame = now;
                delta.as_secs_f32()
            }
            ClockSource::Fixed(step) => step,
        };

        self.delta = raw.clamp(0.0, MAX_FRAME_DELTA);
        self.elapsed += self.delta as f64;
        self.frame_count += 1;
        self.fps_frame_count += 1;

        // Update FPS every second of simulated time
        self.fps_timer += self.delta;
        if self.fps_timer >= 1.0 {
            self.fps = self.fps_frame_count as f32 / self.fps_timer;
            self.fps_frame_count = 0;
            self.fps_timer = 0.0;
        }

        self.delta
    }

    /// Total simulated time since the timer was created
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    /// Get current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
