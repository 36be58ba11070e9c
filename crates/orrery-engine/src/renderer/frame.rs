use glam::{Quat, Vec3};
use serde::Serialize;
use crate::api::types::{CursorStyle, EntityId, GameEvent};
use crate::audio::AudioCommand;

/// Everything the host needs besides the instance buffer, serialized to JSON
/// once per frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameDescription {
    pub camera: CameraView,
    pub cursor: CursorStyle,
    pub labels: Vec<LabelView>,
    pub events: Vec<GameEvent>,
    pub audio: Vec<AudioCommand>,
    /// Scene-specific UI state (nitro bar, fade, mission log, ...).
    pub overlay: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelView {
    pub entity: EntityId,
    pub text: String,
    pub position: Vec3,
    pub font_size: f32,
    pub visible: bool,
    pub orientation: Quat,
    pub render_order: i32,
}

impl FrameDescription {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
