//! Core types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod time;
pub mod camera;
pub mod camera_rig;

pub use types::*;
pub use error::Error;
pub use camera::{Camera, CameraUniform};
pub use camera_rig::{CameraMotion, CameraRig, CameraSnapshot, RigConfig};
