//! Easing, tweens, and clip playback

pub mod easing;
pub mod tween;
pub mod clip;
pub mod player;

pub use easing::Ease;
pub use tween::{Interpolate, Tween};
pub use clip::{AnimationClip, TransformKeyframe};
pub use player::AnimationPlayer;
