//! Narrative sequencing: typed event channels, scheduled continuations, and
//! the state machine that owns the story

pub mod events;
pub mod schedule;
pub mod state;
pub mod choreographer;

pub use events::EventChannel;
pub use schedule::Schedule;
pub use state::{NarrativeEvent, NarrativeState, Transition};
pub use choreographer::{AudioClips, Choreographer, NarrativeConfig, Stage};
