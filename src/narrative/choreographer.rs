//! The scripted sequence from cruising to the game-start screen
//!
//! The choreographer is the only owner of [`NarrativeState`]. It reacts to UI
//! signals and conveyor events, drives the camera rig and collaborators, and
//! turns fixed waits into scheduled continuations so the frame loop never
//! blocks.

use serde::{Deserialize, Serialize};

use crate::collaborators::{AudioSink, PostProcessing, UiElement, UiSignal, UiSurface};
use crate::core::CameraRig;
use crate::streaming::{ConveyorEvent, SegmentConveyor};

use super::schedule::Schedule;
use super::state::{NarrativeEvent, NarrativeState, Transition};

/// Audio clip ids used by the sequence
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioClips {
    pub bgm: String,
    pub click: String,
    pub door_comeout: String,
    pub door_through: String,
}

impl Default for AudioClips {
    fn default() -> Self {
        Self {
            bgm: "bgm".to_string(),
            click: "click".to_string(),
            door_comeout: "door_comeout".to_string(),
            door_through: "door_through".to_string(),
        }
    }
}

/// Waits and UI targets of the sequence
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// From start until the loader screen hides and music starts
    pub reveal_delay: f32,
    /// From the reveal until the menu shows
    pub menu_delay: f32,
    /// From "enter" until the game-start screen
    pub post_dive_delay: f32,
    pub bgm_fade_ms: u32,
    /// Fill fraction the game-start loading bar animates to
    pub loading_bar_target: f32,
    pub loading_bar_secs: f32,
    pub clips: AudioClips,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            reveal_delay: 1.0,
            menu_delay: 1.0,
            post_dive_delay: 2.0,
            bgm_fade_ms: 2000,
            loading_bar_target: 0.944,
            loading_bar_secs: 5.0,
            clips: AudioClips::default(),
        }
    }
}

/// Continuations waiting on frame time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cue {
    /// Hide the loader and start the music; no state change
    Reveal,
    /// Show the menu; no state change
    ShowMenu,
    Narrative(NarrativeEvent),
}

/// Everything the choreographer may act on during one frame
pub struct Stage<'a> {
    pub rig: &'a mut CameraRig,
    pub conveyor: &'a mut SegmentConveyor,
    pub audio: &'a mut dyn AudioSink,
    pub ui: &'a mut dyn UiSurface,
    pub post: &'a mut dyn PostProcessing,
}

pub struct Choreographer {
    state: NarrativeState,
    config: NarrativeConfig,
    schedule: Schedule<Cue>,
}

impl Choreographer {
    /// Start in [`NarrativeState::Cruising`] with the intro cues queued
    pub fn new(config: NarrativeConfig) -> Self {
        let mut schedule = Schedule::new();
        schedule.schedule(config.reveal_delay, Cue::Reveal);
        schedule.schedule(config.reveal_delay + config.menu_delay, Cue::ShowMenu);

        Self {
            state: NarrativeState::Cruising,
            config,
            schedule,
        }
    }

    pub fn state(&self) -> NarrativeState {
        self.state
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// Number of continuations still waiting
    pub fn pending_cues(&self) -> usize {
        self.schedule.len()
    }

    /// Process this frame's input: UI signals first, then conveyor events,
    /// then any continuations that came due.
    pub fn tick(&mut self, dt: f32, stage: &mut Stage) -> Vec<Transition> {
        let mut transitions = Vec::new();

        while let Some(signal) = stage.ui.poll_signal() {
            let event = match signal {
                UiSignal::Begin => NarrativeEvent::UserBegin,
                UiSignal::Enter => NarrativeEvent::UserEnter,
            };
            transitions.push(self.handle(event, stage));
        }

        let conveyor_events: Vec<ConveyorEvent> = stage.conveyor.events().drain().collect();
        for event in conveyor_events {
            if let Some(event) = Self::translate(&event) {
                transitions.push(self.handle(event, stage));
            }
        }

        for cue in self.schedule.advance(dt) {
            match cue {
                Cue::Reveal => {
                    log::info!("Revealing world");
                    stage.ui.hide(UiElement::LoaderScreen);
                    stage.audio.play_looping(&self.config.clips.bgm);
                }
                Cue::ShowMenu => stage.ui.show(UiElement::Menu),
                Cue::Narrative(event) => transitions.push(self.handle(event, stage)),
            }
        }

        transitions
    }

    fn translate(event: &ConveyorEvent) -> Option<NarrativeEvent> {
        match event {
            ConveyorEvent::SegmentPassedLapStart { segment, .. } => {
                log::debug!("Lap start {} passed", segment);
                None
            }
            ConveyorEvent::CameraStopRequested => Some(NarrativeEvent::CameraStopRequested),
            ConveyorEvent::DoorSpawned { .. } => Some(NarrativeEvent::DoorSpawned),
            ConveyorEvent::DoorReady { .. } => Some(NarrativeEvent::DoorReady),
        }
    }

    /// Apply one event. Events not valid in the current state are logged
    /// and dropped without side effects.
    pub fn handle(&mut self, event: NarrativeEvent, stage: &mut Stage) -> Transition {
        let from = self.state;
        let Some(to) = from.next(event) else {
            log::warn!("Ignoring {:?} while {}", event, from);
            return Transition::Ignored { state: from, event };
        };

        self.enter(to, stage);
        self.state = to;
        log::info!("Narrative: {} -> {}", from, to);
        Transition::Applied { from, to }
    }

    fn enter(&mut self, state: NarrativeState, stage: &mut Stage) {
        let clips = &self.config.clips;
        match state {
            NarrativeState::Cruising => {}
            NarrativeState::AwaitingDoorTrigger => {
                stage.audio.play(&clips.click);
                stage.ui.hide(UiElement::MenuContent);
                stage.conveyor.activate_door_trigger();
            }
            NarrativeState::CameraStopping => {
                stage.rig.stop();
                stage.ui.set_interactive(UiElement::Menu, false);
            }
            NarrativeState::DoorSpawning => {
                stage.audio.play(&clips.door_comeout);
            }
            NarrativeState::DoorIdle => {
                stage.ui.show(UiElement::EnterButton);
                stage.post.blur_background();
            }
            NarrativeState::DoorOpening => {
                stage.audio.play(&clips.door_through);
                stage.ui.hide(UiElement::EnterButton);
                if !stage.conveyor.open_door() {
                    log::debug!("Diving without an opening door");
                }
                stage.rig.dive();
                stage.post.trigger_bloom_transition();
                stage
                    .audio
                    .fade(&clips.bgm, 1.0, 0.0, self.config.bgm_fade_ms);

                let hold = stage.conveyor.config().door.open_hold_secs;
                self.schedule
                    .schedule(hold, Cue::Narrative(NarrativeEvent::DoorHeld));
                self.schedule.schedule(
                    self.config.post_dive_delay,
                    Cue::Narrative(NarrativeEvent::PostDiveElapsed),
                );
            }
            NarrativeState::Diving => {}
            NarrativeState::GameStarting => {
                log::info!("Starting game");
                stage.ui.show(UiElement::LoadingElement);
                stage.ui.animate_progress(
                    UiElement::LoadingBar,
                    self.config.loading_bar_target,
                    self.config.loading_bar_secs,
                );
            }
        }
    }
}
