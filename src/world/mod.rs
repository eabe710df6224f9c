//! Assembly of the whole experience from configuration and loaded assets

pub mod config;
pub mod layout;
pub mod world;
pub mod session;

pub use config::{AssetIds, StreamCategory, WorldConfig};
pub use session::{Session, SessionPhase};
pub use world::World;
