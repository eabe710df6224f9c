//! Endless-corridor streaming
//!
//! Scenery is never loaded or unloaded while travelling. A fixed set of
//! instances is translated forward by a whole span whenever the camera passes
//! it, so the corridor appears infinite.

pub mod pool;
pub mod group;
pub mod conveyor;
pub mod door;
pub mod follower;

pub use pool::{InstanceTransform, PoolId, TransformPool};
pub use group::{RecyclePolicy, StreamConfig, StreamStats, StreamingGroup};
pub use conveyor::{ConveyorConfig, ConveyorEvent, ConveyorPools, SegmentConveyor, SegmentRecord};
pub use door::{Door, DoorConfig, DoorPhase, LightPlane};
pub use follower::{CameraFollower, FollowerConfig};
