use std::collections::HashMap;
use crate::assets::manifest::AssetManifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// Load status of every model a scene declared, plus the manifest facts a
/// scene needs at runtime (slot names, clip lengths).
/// Unknown, pending and failed assets all read as "not ready".
pub struct AssetRegistry {
    states: HashMap<u32, LoadState>,
    slots: HashMap<u32, Vec<String>>,
    /// Keyed by sound event id.
    durations: HashMap<u32, f32>,
    progress: f32,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            slots: HashMap::new(),
            durations: HashMap::new(),
            progress: 0.0,
        }
    }

    /// Register every model in the manifest as pending.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut registry = Self::new();
        for model in manifest.models.values() {
            registry.states.insert(model.id, LoadState::Pending);
            registry.slots.insert(model.id, model.slots.clone());
        }
        for sound in manifest.sounds.values() {
            if let (Some(id), Some(duration)) = (sound.event_id, sound.duration) {
                registry.durations.insert(id, duration);
            }
        }
        registry
    }

    pub fn register(&mut self, asset: u32) {
        self.states.entry(asset).or_insert(LoadState::Pending);
    }

    pub fn mark_loaded(&mut self, asset: u32) {
        log::info!("asset {asset} ready");
        self.states.insert(asset, LoadState::Ready);
    }

    pub fn mark_failed(&mut self, asset: u32) {
        log::warn!("asset {asset} failed to load; rendering without it");
        self.states.insert(asset, LoadState::Failed);
    }

    pub fn state(&self, asset: u32) -> Option<LoadState> {
        self.states.get(&asset).copied()
    }

    pub fn is_ready(&self, asset: u32) -> bool {
        self.state(asset) == Some(LoadState::Ready)
    }

    /// Index of a named slot within a model.
    pub fn slot_index(&self, asset: u32, slot: &str) -> Option<u32> {
        self.slots
            .get(&asset)?
            .iter()
            .position(|s| s == slot)
            .map(|i| i as u32)
    }

    /// Clip length of the sound bound to `event_id`, if the manifest gave one.
    pub fn sound_duration(&self, event_id: u32) -> Option<f32> {
        self.durations.get(&event_id).copied()
    }

    /// Overall progress reported by the host, 0..=100.
    pub fn set_progress(&mut self, percent: f32) {
        self.progress = percent.clamp(0.0, 100.0);
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
