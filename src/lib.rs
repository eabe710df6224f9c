//! Skyroad - an endless corridor streaming engine with a scripted door sequence

pub mod core;
pub mod math;
pub mod animation;
pub mod streaming;
pub mod collaborators;
pub mod narrative;
pub mod world;
