//! Asset loading progress.
//!
//! Loading itself happens elsewhere (a loader thread in the binary); it
//! reports back with [`LoadEvent`]s.  The controller only cares whether
//! each entity has what it needs yet.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetId {
    Craft,
    Collectible,
    Hazard,
    Skybox,
}

impl AssetId {
    pub const ALL: [AssetId; 4] =
        [AssetId::Craft, AssetId::Collectible, AssetId::Hazard, AssetId::Skybox];

    pub fn label(self) -> &'static str {
        match self {
            AssetId::Craft => "craft",
            AssetId::Collectible => "star",
            AssetId::Hazard => "bomb",
            AssetId::Skybox => "sky",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadEvent {
    Progress { asset: AssetId, loaded: u64, total: u64 },
    Loaded(AssetId),
    Failed { asset: AssetId, reason: String },
}

/// Aggregate progress across every asset that has reported.
#[derive(Clone, Debug, Default)]
pub struct LoadingBar {
    progress: BTreeMap<AssetId, (u64, u64)>,
    pub visible: bool,
}

impl LoadingBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, asset: AssetId, loaded: u64, total: u64) {
        self.progress.insert(asset, (loaded.min(total), total));
    }

    /// Mark an asset as fully loaded, keeping its last known size.  An
    /// asset that never reported a size counts as one complete unit.
    pub fn finish(&mut self, asset: AssetId) {
        let entry = self.progress.entry(asset).or_insert((1, 1));
        if entry.1 == 0 {
            *entry = (1, 1);
        }
        entry.0 = entry.1;
    }

    /// Fraction in [0, 1]: mean of the per-asset fractions.
    pub fn fraction(&self) -> f32 {
        if self.progress.is_empty() {
            return 0.0;
        }
        let sum: f32 = self
            .progress
            .values()
            .map(|&(loaded, total)| if total == 0 { 0.0 } else { loaded as f32 / total as f32 })
            .sum();
        sum / self.progress.len() as f32
    }

    pub fn entries(&self) -> impl Iterator<Item = (AssetId, u64, u64)> + '_ {
        self.progress.iter().map(|(&a, &(l, t))| (a, l, t))
    }
}
