use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Asset manifest describing the models and sounds a scene consumes.
/// Loaded from a JSON file at runtime; the host does the actual fetching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub models: HashMap<String, ModelDescriptor>,
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// Describes a 3D model file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Numeric ID used by `MeshShape::Model` and asset load events.
    pub id: u32,
    /// Relative path to the model file (e.g., "spaceship/scene.gltf").
    pub path: String,
    /// Named sub-mesh / material slots, indexed by position.
    #[serde(default)]
    pub slots: Vec<String>,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
    /// Numeric event ID that triggers this sound from Rust.
    #[serde(default)]
    pub event_id: Option<u32>,
    /// Clip length in seconds, when the scene needs to schedule around it.
    #[serde(default)]
    pub duration: Option<f32>,
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Index of a named slot within a model.
    pub fn slot_index(&self, model: &str, slot: &str) -> Option<u32> {
        self.models
            .get(model)?
            .slots
            .iter()
            .position(|s| s == slot)
            .map(|i| i as u32)
    }

    /// Duration of the sound bound to `event_id`.
    pub fn sound_duration(&self, event_id: u32) -> Option<f32> {
        self.sounds
            .values()
            .find(|s| s.event_id == Some(event_id))
            .and_then(|s| s.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_with_sounds() {
        let json = r#"{
            "sounds": {
                "idle": { "path": "SpaceShipIdlee.mp3", "event_id": 1, "duration": 4.2 },
                "takeoff": { "path": "SpaceShipTakeOff.mp3", "event_id": 3 }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.sounds.len(), 2);
        assert_eq!(manifest.sounds["idle"].event_id, Some(1));
        assert_eq!(manifest.sound_duration(1), Some(4.2));
        assert_eq!(manifest.sound_duration(3), None);
        assert!(manifest.models.is_empty());
    }

    #[test]
    fn parse_model_slots() {
        let json = r#"{
            "models": {
                "spaceship": { "id": 1, "path": "spaceship/scene.gltf", "slots": ["BASE", "WINGS"] }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.slot_index("spaceship", "WINGS"), Some(1));
        assert_eq!(manifest.slot_index("spaceship", "ENGINE"), None);
        assert_eq!(manifest.slot_index("rover", "BASE"), None);
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        assert!(AssetManifest::from_json(r#"{ "models": 3 }"#).is_err());
    }
}
