//! Mathematical utilities

pub mod axis;

pub use axis::TravelAxis;
