//! In-memory asset provider with staged loading

use std::collections::{HashMap, VecDeque};

use super::asset::{Placement, RenderableAsset};
use super::AssetProvider;

enum Pending {
    Asset(RenderableAsset),
    Placements(String, Vec<Placement>),
}

/// Holds assets and placement tables in memory.
///
/// Entries can be queued and released one at a time with
/// [`MemoryAssets::load_next`] so the loading phase reports real progress.
#[derive(Default)]
pub struct MemoryAssets {
    assets: HashMap<String, RenderableAsset>,
    placements: HashMap<String, Vec<Placement>>,
    pending: VecDeque<Pending>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an asset available immediately, keyed by its name
    pub fn insert_asset(&mut self, asset: RenderableAsset) {
        self.assets.insert(asset.name.clone(), asset);
    }

    pub fn insert_placements(&mut self, id: impl Into<String>, placements: Vec<Placement>) {
        self.placements.insert(id.into(), placements);
    }

    /// Queue an asset to be resolved by a later `load_next`
    pub fn queue_asset(&mut self, asset: RenderableAsset) {
        self.pending.push_back(Pending::Asset(asset));
    }

    pub fn queue_placements(&mut self, id: impl Into<String>, placements: Vec<Placement>) {
        self.pending.push_back(Pending::Placements(id.into(), placements));
    }

    /// Resolve one queued entry. Returns false once nothing is pending.
    pub fn load_next(&mut self) -> bool {
        match self.pending.pop_front() {
            Some(Pending::Asset(asset)) => {
                log::debug!("Resolved asset '{}'", asset.name);
                self.insert_asset(asset);
                true
            }
            Some(Pending::Placements(id, placements)) => {
                log::debug!("Resolved placements '{}' ({} entries)", id, placements.len());
                self.insert_placements(id, placements);
                true
            }
            None => false,
        }
    }

    fn resolved_count(&self) -> usize {
        self.assets.len() + self.placements.len()
    }
}

impl AssetProvider for MemoryAssets {
    fn get_asset(&self, id: &str) -> Option<&RenderableAsset> {
        self.assets.get(id)
    }

    fn placements(&self, id: &str) -> Option<&[Placement]> {
        self.placements.get(id).map(Vec::as_slice)
    }

    fn load_progress(&self) -> f32 {
        let total = self.resolved_count() + self.pending.len();
        if total == 0 {
            return 1.0;
        }
        self.resolved_count() as f32 / total as f32
    }

    fn is_ready(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;

    #[test]
    fn test_staged_progress() {
        let mut assets = MemoryAssets::new();
        assets.queue_asset(RenderableAsset::new("door"));
        assets.queue_asset(RenderableAsset::new("road"));
        assets.queue_placements("clouds", Vec::new());
        assets.queue_asset(RenderableAsset::new("plane"));

        assert_eq!(assets.load_progress(), 0.0);
        assert!(!assets.is_ready());

        assert!(assets.load_next());
        assert!((assets.load_progress() - 0.25).abs() < 1e-6);
        while assets.load_next() {}
        assert_eq!(assets.load_progress(), 1.0);
        assert!(assets.is_ready());
        assert!(assets.get_asset("road").is_some());
        assert!(assets.placements("clouds").is_some());
    }

    #[test]
    fn test_require_missing_asset() {
        let assets = MemoryAssets::new();
        assert!(assets.is_ready());
        match assets.require("DOOR") {
            Err(Error::AssetMissing(id)) => assert_eq!(id, "DOOR"),
            other => panic!("expected AssetMissing, got {:?}", other.map(|a| a.name.clone())),
        }
        assert!(matches!(
            assets.require_placements("columns"),
            Err(Error::AssetMissing(_))
        ));
    }
}
