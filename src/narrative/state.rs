//! Narrative states and the events that move between them

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the scripted sequence currently stands.
///
/// Owned by the choreographer; nothing else mutates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeState {
    Cruising,
    AwaitingDoorTrigger,
    CameraStopping,
    DoorSpawning,
    DoorIdle,
    DoorOpening,
    Diving,
    GameStarting,
}

impl NarrativeState {
    /// Whether `event` drives a transition out of this state
    pub fn next(self, event: NarrativeEvent) -> Option<NarrativeState> {
        use NarrativeEvent as E;
        use NarrativeState as S;
        match (self, event) {
            (S::Cruising, E::UserBegin) => Some(S::AwaitingDoorTrigger),
            (S::AwaitingDoorTrigger, E::CameraStopRequested) => Some(S::CameraStopping),
            (S::CameraStopping, E::DoorSpawned) => Some(S::DoorSpawning),
            (S::DoorSpawning, E::DoorReady) => Some(S::DoorIdle),
            (S::DoorIdle, E::UserEnter) => Some(S::DoorOpening),
            (S::DoorOpening, E::DoorHeld) => Some(S::Diving),
            (S::DoorOpening | S::Diving, E::PostDiveElapsed) => Some(S::GameStarting),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == NarrativeState::GameStarting
    }
}

impl fmt::Display for NarrativeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NarrativeState::Cruising => "cruising",
            NarrativeState::AwaitingDoorTrigger => "awaiting-door-trigger",
            NarrativeState::CameraStopping => "camera-stopping",
            NarrativeState::DoorSpawning => "door-spawning",
            NarrativeState::DoorIdle => "door-idle",
            NarrativeState::DoorOpening => "door-opening",
            NarrativeState::Diving => "diving",
            NarrativeState::GameStarting => "game-starting",
        };
        f.write_str(name)
    }
}

/// Everything the choreographer reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeEvent {
    /// User clicked the menu's call-to-action
    UserBegin,
    /// Road halted at a lap start
    CameraStopRequested,
    DoorSpawned,
    /// Door intro finished and froze
    DoorReady,
    /// User clicked "enter"
    UserEnter,
    /// The door's opening hold ran out
    DoorHeld,
    /// Fixed wait after the dive ran out
    PostDiveElapsed,
}

/// Outcome of feeding one event to the choreographer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Applied {
        from: NarrativeState,
        to: NarrativeState,
    },
    /// Not valid in `state`; logged and dropped
    Ignored {
        state: NarrativeState,
        event: NarrativeEvent,
    },
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }
}
