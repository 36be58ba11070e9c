use orrery_engine::{
    build_render_buffer, collect_labels, AssetManifest, AssetRegistry, EngineContext,
    FrameClock, FrameDescription, Game, GameConfig, InputEvent, RenderBuffer,
};
use orrery_engine::renderer::CameraView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunnerState {
    Created,
    Running,
    TornDown,
}

/// Generic runner that wires a `Game` to the host frame loop.
///
/// Each concrete scene creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    render_buffer: RenderBuffer,
    clock: FrameClock,
    config: GameConfig,
    state: RunnerState,
    /// Last serialized `FrameDescription`, read by the host after each tick.
    frame_json: String,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::with_config(&config),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            clock: FrameClock::new(config.max_frame_dt),
            config,
            game,
            state: RunnerState::Created,
            frame_json: String::from("{}"),
        }
    }

    /// Apply host overrides on top of the game's config. Only valid before `init`.
    pub fn apply_config_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        if self.state != RunnerState::Created {
            log::warn!("config overrides ignored after init");
            return Ok(());
        }
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::json!({
            "max_frame_dt": self.config.max_frame_dt,
            "max_instances": self.config.max_instances,
            "max_events": self.config.max_events,
        });
        if let (Some(base), Some(extra)) = (merged.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        self.config = serde_json::from_value(merged)?;
        self.ctx = EngineContext::with_config(&self.config);
        self.render_buffer = RenderBuffer::with_capacity(self.config.max_instances);
        self.clock = FrameClock::new(self.config.max_frame_dt);
        Ok(())
    }

    /// Register the scene's assets as pending. Call before or after `init`.
    pub fn load_manifest(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let manifest = AssetManifest::from_json(json)?;
        let mut registry = AssetRegistry::from_manifest(&manifest);
        registry.set_progress(self.ctx.assets.progress());
        self.ctx.assets = registry;
        Ok(())
    }

    /// Initialize the game. `wall_clock_seconds` seeds time-of-day dependent state.
    pub fn init(&mut self, wall_clock_seconds: f64) {
        if self.state != RunnerState::Created {
            return;
        }
        self.ctx.wall_clock_seconds = wall_clock_seconds;
        self.game.init(&mut self.ctx);
        self.state = RunnerState::Running;
    }

    /// Route an event to the engine services that care, then publish it.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.state == RunnerState::TornDown {
            return;
        }
        if event.is_user_gesture() {
            self.ctx.audio.on_user_gesture();
        }
        match event {
            InputEvent::SoundEnded { sound } => self.ctx.audio.on_ended(sound),
            InputEvent::SoundRejected { sound } => self.ctx.audio.on_rejected(sound),
            InputEvent::AssetLoaded { asset } => self.ctx.assets.mark_loaded(asset),
            InputEvent::AssetFailed { asset } => self.ctx.assets.mark_failed(asset),
            InputEvent::LoadProgress { percent } => self.ctx.assets.set_progress(percent),
            _ => {}
        }
        self.ctx.input.publish(event);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.ctx.camera.resize(width, height);
    }

    /// Run one frame: clamp dt, update, build render data.
    pub fn tick(&mut self, raw_dt: f32) {
        if self.state != RunnerState::Running {
            return;
        }

        self.ctx.clear_frame_data();

        let dt = self.clock.advance(raw_dt);
        self.game.update(&mut self.ctx, dt);

        build_render_buffer(&self.ctx.scene, &self.ctx.assets, &mut self.render_buffer);
        self.describe_frame();
    }

    fn describe_frame(&mut self) {
        let frame = FrameDescription {
            camera: CameraView {
                position: self.ctx.camera.position,
                target: self.ctx.camera.target,
                fov: self.ctx.camera.fov,
            },
            cursor: self.ctx.cursor,
            labels: collect_labels(&self.ctx.scene),
            events: self.ctx.events.clone(),
            audio: self.ctx.audio.drain(),
            overlay: self.game.overlay(),
        };
        match frame.to_json() {
            Ok(json) => self.frame_json = json,
            Err(err) => log::warn!("frame description not serializable: {err}"),
        }
    }

    /// Tear the scene down: game-owned resources first, then engine services.
    /// Every later tick or input is ignored.
    pub fn teardown(&mut self) {
        if self.state == RunnerState::TornDown {
            return;
        }
        self.game.teardown(&mut self.ctx);
        self.ctx.shutdown();
        self.state = RunnerState::TornDown;
        // Final stop commands still need to reach the host.
        self.describe_frame();
        log::info!("scene torn down");
    }

    pub fn is_running(&self) -> bool {
        self.state == RunnerState::Running
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Accessors for host reads ----

    pub fn frame_json(&self) -> &str {
        &self.frame_json
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }
}
