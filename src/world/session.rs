//! Loading phase followed by the running world

use crate::collaborators::{AssetProvider, Collaborators};
use crate::core::types::Result;
use crate::narrative::{NarrativeState, Transition};

use super::config::WorldConfig;
use super::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Running,
}

/// Owns the world once assets are resolved.
///
/// Until then every tick forwards load progress to the UI. The world is
/// built exactly once, on the first tick the provider reports ready.
pub struct Session {
    config: WorldConfig,
    world: Option<World>,
}

impl Session {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            world: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.world.is_some() {
            SessionPhase::Running
        } else {
            SessionPhase::Loading
        }
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn state(&self) -> Option<NarrativeState> {
        self.world.as_ref().map(World::state)
    }

    /// Advance one frame. Construction failures are returned, not retried.
    pub fn tick(
        &mut self,
        assets: &dyn AssetProvider,
        dt: f32,
        collaborators: &mut Collaborators,
    ) -> Result<Vec<Transition>> {
        if self.world.is_none() {
            collaborators.ui.set_load_progress(assets.load_progress());
            if !assets.is_ready() {
                return Ok(Vec::new());
            }
            log::info!("Assets ready; building world");
            self.world = Some(World::new(assets, &self.config)?);
            return Ok(Vec::new());
        }

        Ok(self
            .world
            .as_mut()
            .map(|world| world.tick(dt, collaborators))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        AssetProvider, MemoryAssets, RecordingAudio, RecordingPost, RecordingRenderer, ScriptedUi,
    };
    use crate::core::Error;
    use crate::world::layout::demo_assets;

    #[test]
    fn test_loading_reports_progress_then_runs() {
        let config = WorldConfig::default();
        let mut assets = demo_assets(&config);
        let mut session = Session::new(config);

        let mut renderer = RecordingRenderer::default();
        let mut audio = RecordingAudio::default();
        let mut ui = ScriptedUi::new();
        let mut post = RecordingPost::default();

        let mut seen = Vec::new();
        while session.phase() == SessionPhase::Loading {
            let mut c = Collaborators {
                renderer: &mut renderer,
                audio: &mut audio,
                ui: &mut ui,
                post: &mut post,
            };
            session.tick(&assets, 1.0 / 60.0, &mut c).unwrap();
            seen.push(ui.load_progress());
            assets.load_next();
            assert!(seen.len() < 100);
        }

        assert_eq!(seen.first().copied(), Some(0.0));
        assert_eq!(seen.last().copied(), Some(1.0));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(renderer.total_uploads(), 0);
        assert_eq!(session.state(), Some(NarrativeState::Cruising));

        let mut c = Collaborators {
            renderer: &mut renderer,
            audio: &mut audio,
            ui: &mut ui,
            post: &mut post,
        };
        session.tick(&assets, 1.0 / 60.0, &mut c).unwrap();
        assert!(renderer.total_uploads() > 0);
        assert_eq!(session.world().map(World::frame), Some(1));
    }

    #[test]
    fn test_missing_assets_surface_error() {
        let assets = MemoryAssets::new();
        assert!(assets.is_ready());
        let mut session = Session::new(WorldConfig::default());

        let mut renderer = RecordingRenderer::default();
        let mut audio = RecordingAudio::default();
        let mut ui = ScriptedUi::new();
        let mut post = RecordingPost::default();
        let mut c = Collaborators {
            renderer: &mut renderer,
            audio: &mut audio,
            ui: &mut ui,
            post: &mut post,
        };
        let result = session.tick(&assets, 0.016, &mut c);
        assert!(matches!(result, Err(Error::AssetMissing(_))));
        assert_eq!(session.phase(), SessionPhase::Loading);
    }
}
