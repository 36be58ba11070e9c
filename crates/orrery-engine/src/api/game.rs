use serde::Deserialize;
use crate::api::types::{CursorStyle, EntityId, GameEvent};
use crate::assets::registry::AssetRegistry;
use crate::audio::mixer::AudioQueue;
use crate::core::scene::Scene;
use crate::input::bus::InputBus;
use crate::renderer::camera::Camera3D;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Largest frame delta passed to `Game::update`, in seconds (default: 0.25).
    /// Longer gaps (tab in background, debugger pause) are clamped to this.
    pub max_frame_dt: f32,
    /// Maximum number of render instances (default: 256).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.25,
            max_instances: 256,
            max_events: 32,
        }
    }
}

impl GameConfig {
    /// Parse host overrides; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The core contract every scene must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, subscribe to input.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One frame. `dt` is already clamped to `GameConfig::max_frame_dt`.
    fn update(&mut self, ctx: &mut EngineContext, dt: f32);

    /// Scene-specific UI state forwarded to the host with each frame.
    fn overlay(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Release everything the scene owns: timers, sounds, subscriptions.
    fn teardown(&mut self, _ctx: &mut EngineContext) {}
}

/// Mutable access to engine state, passed to every `Game` hook.
pub struct EngineContext {
    pub scene: Scene,
    pub camera: Camera3D,
    pub input: InputBus,
    pub audio: AudioQueue,
    pub assets: AssetRegistry,
    pub events: Vec<GameEvent>,
    pub cursor: CursorStyle,
    /// Seconds since the Unix epoch when the scene was started.
    pub wall_clock_seconds: f64,
    max_events: usize,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera3D::default(),
            input: InputBus::new(),
            audio: AudioQueue::new(),
            assets: AssetRegistry::new(),
            events: Vec::new(),
            cursor: CursorStyle::Default,
            wall_clock_seconds: 0.0,
            max_events: config.max_events,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to the host. Dropped past `max_events`.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() < self.max_events {
            self.events.push(event);
        } else {
            log::warn!("event queue full; dropping event kind {}", event.kind);
        }
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    /// Engine-side release after the scene's own teardown.
    pub fn shutdown(&mut self) {
        self.audio.stop_all();
        self.input.clear();
        self.scene.clear();
        self.cursor = CursorStyle::Default;
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
