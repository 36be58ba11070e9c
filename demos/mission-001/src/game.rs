/// Mission 001: fly the ship from the launch pad to Mercury.
///
/// Switch the speed unit to Kilometers, hold W until the nitro gauge hits
/// its mark, and keep holding through the takeoff cue.

use std::f32::consts::FRAC_PI_2;
use glam::Vec3;
use orrery_engine::*;
use serde::Serialize;

use crate::idle_loop::IdleLoop;
use crate::overlay::{MissionLog, OverlayState};
use crate::sequencer::{MissionSequencer, Phase, SequencerEffect, SpeedUnit};
use crate::settings::{
    MissionSettings, MODEL_SPACESHIP, SLOT_BASE, SLOT_WINGS, SOUND_IDLE_A, SOUND_IDLE_B,
    SOUND_TAKEOFF,
};

// ── Custom event kinds from the host ─────────────────────────────────

/// a = 0 for light years, 1 for kilometers.
const CUSTOM_SELECT_UNIT: u32 = 1;
const CUSTOM_DISMISS_LOG: u32 = 2;
const CUSTOM_SHOW_LOG: u32 = 3;
/// Viewport resize: a = width, b = height (CSS pixels).
const CUSTOM_RESIZE: u32 = 99;

// ── Game event kinds to the host ─────────────────────────────────────

/// a = phase index (0 idle .. 4 arrived).
const EVENT_PHASE: u32 = 1;
/// a = fade duration in seconds.
const EVENT_FADE: u32 = 2;

// ── Scene ────────────────────────────────────────────────────────────

const THRUST_KEY: KeyCode = KeyCode::W;

const SUN_RADIUS: f32 = 1000.0;
const SUN_Z: f32 = 1500.0;
const SUN_COLOR: u32 = 0xffd700;
const MERCURY_RADIUS: f32 = 50.0;
const MERCURY_COLOR: u32 = 0x8c8c8c;

/// Host-side lighting, sent with the overlay.
#[derive(Debug, Clone, Copy, Serialize)]
struct Lighting {
    ambient: f32,
    point: Vec3,
}

const LIGHTING: Lighting = Lighting {
    ambient: 0.2,
    point: Vec3::new(0.0, 0.0, 200.0),
};

fn phase_code(phase: Phase) -> f32 {
    match phase {
        Phase::AmbientIdle => 0.0,
        Phase::Charging => 1.0,
        Phase::Takeoff => 2.0,
        Phase::Transit => 3.0,
        Phase::Arrived => 4.0,
    }
}

/// Deferred work, fired through the session's timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissionTimer {
    ShowLevel,
    HideLevel,
    LoadSettled,
    LogSettled,
}

/// Everything the running mission owns. Dropping out of `Mission` via
/// `close` is the only way it ends, so each resource is released once.
struct MissionSession {
    input: Subscription,
    timers: TimerQueue<MissionTimer>,
    load_timer: Option<TimerId>,
    log_timer: Option<TimerId>,
    sequencer: MissionSequencer,
    idle: IdleLoop,
    controls: OrbitControls,
    keys: KeyState,
    log: MissionLog,
    /// Base hull and wings, two slots of the same model.
    ship: [(EntityId, &'static str); 2],
    loaded: bool,
    /// Set once the first load settles; the level banner runs only once.
    level_scheduled: bool,
    level_shown: bool,
}

impl MissionSession {
    fn frame(&mut self, settings: &MissionSettings, ctx: &mut EngineContext, dt: f32) {
        let phase_before = self.sequencer.phase();

        for timer in self.timers.tick(dt) {
            self.on_timer(timer, settings, ctx);
        }
        self.handle_input(settings, ctx);

        let effects = self.sequencer.update(self.keys.is_held(THRUST_KEY), dt);
        self.apply(&effects, settings, ctx);

        self.idle.set_clip_seconds(ctx.assets.sound_duration(SOUND_IDLE_A.0));
        self.idle.update(&mut ctx.audio, dt);
        self.controls.update(&mut ctx.camera, dt);
        self.resolve_ship_slots(ctx);

        let phase = self.sequencer.phase();
        if phase != phase_before {
            ctx.emit_event(GameEvent::new(EVENT_PHASE, phase_code(phase), 0.0, 0.0));
        }
    }

    fn handle_input(&mut self, settings: &MissionSettings, ctx: &mut EngineContext) {
        for event in ctx.input.drain(&self.input) {
            if event.is_user_gesture() {
                self.idle.unmute(&mut ctx.audio);
            }
            match event {
                InputEvent::KeyDown { key } => self.keys.press(key),
                InputEvent::KeyUp { key } => self.keys.release(key),
                InputEvent::Custom { kind: CUSTOM_SELECT_UNIT, a, .. } => {
                    let unit = if a >= 0.5 { SpeedUnit::Kilometers } else { SpeedUnit::LightYears };
                    if !self.sequencer.select_unit(unit) {
                        log::debug!("unit change to {unit:?} refused");
                    }
                }
                InputEvent::Custom { kind: CUSTOM_DISMISS_LOG, .. } => {
                    if self.log.dismiss() {
                        self.log_timer = Some(self.timers.schedule(settings.log_settle, MissionTimer::LogSettled));
                    }
                }
                InputEvent::Custom { kind: CUSTOM_SHOW_LOG, .. } => {
                    if let Some(id) = self.log_timer.take() {
                        self.timers.cancel(id);
                    }
                    self.log.show();
                }
                InputEvent::Custom { kind: CUSTOM_RESIZE, a, b, .. } => self.controls.resize(a, b),
                InputEvent::SoundEnded { sound } if sound == SOUND_TAKEOFF => {
                    let effects = self.sequencer.on_takeoff_complete();
                    self.apply(&effects, settings, ctx);
                }
                InputEvent::SoundEnded { sound } => self.idle.on_ended(sound, &mut ctx.audio),
                InputEvent::LoadProgress { percent } => self.on_progress(percent, settings),
                InputEvent::PointerDown { .. }
                | InputEvent::PointerMove { .. }
                | InputEvent::PointerUp { .. }
                | InputEvent::Wheel { .. } => self.controls.handle(&event, &ctx.camera),
                _ => {}
            }
        }
    }

    fn on_progress(&mut self, percent: f32, settings: &MissionSettings) {
        if percent >= 100.0 {
            if !self.loaded && self.load_timer.is_none() {
                self.load_timer = Some(self.timers.schedule(settings.load_settle, MissionTimer::LoadSettled));
            }
        } else {
            if let Some(id) = self.load_timer.take() {
                self.timers.cancel(id);
            }
            self.loaded = false;
        }
    }

    fn on_timer(&mut self, timer: MissionTimer, settings: &MissionSettings, ctx: &mut EngineContext) {
        match timer {
            MissionTimer::LoadSettled => {
                self.load_timer = None;
                self.loaded = true;
                log::info!("mission: assets settled");
                self.idle.unmute(&mut ctx.audio);
                if !self.level_scheduled {
                    self.level_scheduled = true;
                    self.timers.schedule(settings.level_show_at, MissionTimer::ShowLevel);
                    self.timers.schedule(settings.level_hide_at, MissionTimer::HideLevel);
                }
            }
            MissionTimer::ShowLevel => self.level_shown = true,
            MissionTimer::HideLevel => self.level_shown = false,
            MissionTimer::LogSettled => {
                self.log_timer = None;
                self.log.settle();
            }
        }
    }

    fn apply(&mut self, effects: &[SequencerEffect], settings: &MissionSettings, ctx: &mut EngineContext) {
        for effect in effects {
            match *effect {
                SequencerEffect::PlayTakeoff => ctx.audio.play(SOUND_TAKEOFF, settings.takeoff_volume),
                SequencerEffect::CancelTakeoff => ctx.audio.stop(SOUND_TAKEOFF),
                SequencerEffect::StopAmbient => {
                    self.idle.stop(&mut ctx.audio);
                    // The ship now owns the camera target.
                    self.controls.cancel_return();
                    self.controls.settings.return_to_default = None;
                }
                SequencerEffect::ShipMoved(z) => {
                    for (id, _) in self.ship {
                        if let Some(entity) = ctx.scene.get_mut(id) {
                            entity.position.z = z;
                        }
                    }
                    ctx.camera.target = settings.follow_target(z);
                }
                SequencerEffect::BeginFade => {
                    ctx.emit_event(GameEvent::new(EVENT_FADE, settings.sequencer.fade_seconds, 0.0, 0.0));
                }
            }
        }
    }

    /// Slot indices come from the manifest, which may arrive after init.
    fn resolve_ship_slots(&self, ctx: &mut EngineContext) {
        for (id, name) in self.ship {
            let Some(slot) = ctx.assets.slot_index(MODEL_SPACESHIP, name) else { continue };
            let Some(mesh) = ctx.scene.get_mut(id).and_then(|e| e.mesh.as_mut()) else { continue };
            mesh.shape = MeshShape::Model { asset: MODEL_SPACESHIP, slot };
        }
    }

    fn close(mut self, ctx: &mut EngineContext) {
        self.timers.cancel_all();
        ctx.input.unsubscribe(self.input);
        self.idle.stop(&mut ctx.audio);
        if ctx.audio.is_playing(SOUND_TAKEOFF) {
            ctx.audio.stop(SOUND_TAKEOFF);
        }
        self.controls.cancel_return();
        self.keys.clear();
        log::info!("mission: session closed in {:?}", self.sequencer.phase());
    }
}

pub struct Mission {
    settings: MissionSettings,
    session: Option<MissionSession>,
}

impl Mission {
    pub fn new() -> Self {
        Self::with_settings(MissionSettings::default())
    }

    pub fn with_settings(settings: MissionSettings) -> Self {
        Self { settings, session: None }
    }

    pub fn phase(&self) -> Option<Phase> {
        self.session.as_ref().map(|s| s.sequencer.phase())
    }

    pub fn sequencer(&self) -> Option<&MissionSequencer> {
        self.session.as_ref().map(|s| &s.sequencer)
    }

    fn spawn_scene(&self, ctx: &mut EngineContext) -> [(EntityId, &'static str); 2] {
        let id = ctx.next_id();
        let sun_color = Color::from_hex(SUN_COLOR);
        ctx.scene.spawn(
            Entity::new(id)
                .with_tag("sun")
                .with_position(Vec3::new(0.0, 0.0, SUN_Z))
                // Unlit: emissive carries the whole colour.
                .with_mesh(MeshComponent::new(MeshShape::Sphere { radius: SUN_RADIUS }, sun_color).with_emissive(sun_color, 1.0)),
        );

        let id = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(id)
                .with_tag("mercury")
                .with_position(Vec3::new(0.0, 0.0, self.settings.sequencer.destination))
                .with_mesh(
                    MeshComponent::new(MeshShape::Sphere { radius: MERCURY_RADIUS }, Color::from_hex(MERCURY_COLOR))
                        .with_roughness(0.7)
                        .with_metalness(0.3),
                ),
        );

        let start = Vec3::new(0.0, 0.0, self.settings.sequencer.start_position);
        [(0, SLOT_BASE), (1, SLOT_WINGS)].map(|(fallback, name)| {
            let slot = ctx.assets.slot_index(MODEL_SPACESHIP, name).unwrap_or(fallback);
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id)
                    .with_tag(format!("spaceship:{}", name.to_lowercase()))
                    .with_position(start)
                    .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0))
                    .with_mesh(MeshComponent::new(MeshShape::Model { asset: MODEL_SPACESHIP, slot }, Color::WHITE)),
            );
            (id, name)
        })
    }
}

impl Default for Mission {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Mission {
    fn init(&mut self, ctx: &mut EngineContext) {
        let s = &self.settings;
        ctx.camera = Camera3D::new(s.camera_position, s.camera_target)
            .with_fov(s.camera_fov)
            .with_clip(s.camera_near, s.camera_far);

        let ship = self.spawn_scene(ctx);

        let mut idle = IdleLoop::new(SOUND_IDLE_A, SOUND_IDLE_B, self.settings.idle_loop());
        idle.set_clip_seconds(ctx.assets.sound_duration(SOUND_IDLE_A.0));
        idle.start(&mut ctx.audio);

        let input = ctx.input.subscribe(&[
            InputChannel::Keyboard,
            InputChannel::Pointer,
            InputChannel::Ui,
            InputChannel::Audio,
            InputChannel::Assets,
        ]);

        let mut session = MissionSession {
            input,
            timers: TimerQueue::new(),
            load_timer: None,
            log_timer: None,
            sequencer: MissionSequencer::new(self.settings.sequencer),
            idle,
            controls: OrbitControls::new(self.settings.orbit_settings()),
            keys: KeyState::new(),
            log: MissionLog::default(),
            ship,
            loaded: false,
            level_scheduled: false,
            level_shown: false,
        };
        // Progress may have reached 100 before the scene started.
        session.on_progress(ctx.assets.progress(), &self.settings);

        log::info!("mission: {} entities", ctx.scene.len());
        self.session = Some(session);
    }

    fn update(&mut self, ctx: &mut EngineContext, dt: f32) {
        let Some(session) = self.session.as_mut() else { return };
        session.frame(&self.settings, ctx, dt);
    }

    fn overlay(&self) -> serde_json::Value {
        let Some(session) = &self.session else {
            return serde_json::Value::Null;
        };
        let state = OverlayState::build(
            &session.sequencer,
            &session.log,
            session.loaded,
            session.level_shown,
            self.settings.starfield,
        );
        let mut value = serde_json::to_value(state).unwrap_or_default();
        if let (Some(map), Ok(lighting)) = (value.as_object_mut(), serde_json::to_value(LIGHTING)) {
            map.insert("lighting".into(), lighting);
        }
        value
    }

    fn teardown(&mut self, ctx: &mut EngineContext) {
        if let Some(session) = self.session.take() {
            session.close(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn started() -> (Mission, EngineContext) {
        let mut game = Mission::new();
        let mut ctx = EngineContext::new();
        game.init(&mut ctx);
        (game, ctx)
    }

    /// What the runner does with host events.
    fn push(ctx: &mut EngineContext, event: InputEvent) {
        if event.is_user_gesture() {
            ctx.audio.on_user_gesture();
        }
        match event {
            InputEvent::SoundEnded { sound } => ctx.audio.on_ended(sound),
            InputEvent::LoadProgress { percent } => ctx.assets.set_progress(percent),
            _ => {}
        }
        ctx.input.publish(event);
    }

    fn run(game: &mut Mission, ctx: &mut EngineContext, seconds: f32) {
        let frames = (seconds / FRAME).round() as usize;
        for _ in 0..frames {
            game.update(ctx, FRAME);
        }
    }

    fn select_km(game: &mut Mission, ctx: &mut EngineContext) {
        push(ctx, InputEvent::Custom { kind: CUSTOM_SELECT_UNIT, a: 1.0, b: 0.0, c: 0.0 });
        game.update(ctx, 0.0);
    }

    fn ship_z(ctx: &EngineContext) -> f32 {
        ctx.scene.find_by_tag("spaceship:base").unwrap().position.z
    }

    #[test]
    fn init_builds_the_launch_scene() {
        let (game, mut ctx) = started();
        assert_eq!(game.phase(), Some(Phase::AmbientIdle));
        assert_eq!(ctx.camera.position, Vec3::new(-2.0, 8.0, -216.0));
        assert_eq!(ctx.camera.target, Vec3::new(0.0, 5.0, -200.0));
        assert_eq!(ctx.camera.fov, 75.0);
        assert_eq!(ctx.scene.find_by_tag("sun").unwrap().position.z, 1500.0);
        assert_eq!(ctx.scene.find_by_tag("mercury").unwrap().position.z, 200.0);

        let wings = ctx.scene.find_by_tag("spaceship:wings").unwrap();
        assert_eq!(wings.mesh.unwrap().shape, MeshShape::Model { asset: MODEL_SPACESHIP, slot: 1 });
        assert_eq!(ship_z(&ctx), -200.0);

        // Idle hum starts muted.
        let cmds = ctx.audio.drain();
        assert!(cmds.contains(&AudioCommand::SetMuted { sound: SOUND_IDLE_A, muted: true }));
        assert!(ctx.audio.is_playing(SOUND_IDLE_A));
    }

    #[test]
    fn first_gesture_unmutes_idle_hum() {
        let (mut game, mut ctx) = started();
        ctx.audio.drain();
        push(&mut ctx, InputEvent::PointerDown { x: 10.0, y: 10.0, button: 0 });
        game.update(&mut ctx, FRAME);
        let cmds = ctx.audio.drain();
        assert!(cmds.contains(&AudioCommand::SetMuted { sound: SOUND_IDLE_A, muted: false }));
        assert!(cmds.contains(&AudioCommand::SetMuted { sound: SOUND_IDLE_B, muted: false }));
    }

    #[test]
    fn load_settles_then_level_banner_runs() {
        let (mut game, mut ctx) = started();
        push(&mut ctx, InputEvent::LoadProgress { percent: 100.0 });
        game.update(&mut ctx, FRAME);
        game.update(&mut ctx, 0.4);
        assert_eq!(game.overlay()["loaded"], false);
        game.update(&mut ctx, 0.2);
        assert_eq!(game.overlay()["loaded"], true);
        assert_eq!(game.overlay()["level_indicator"], false);

        run(&mut game, &mut ctx, 3.1);
        assert_eq!(game.overlay()["level_indicator"], true);
        run(&mut game, &mut ctx, 3.0);
        assert_eq!(game.overlay()["level_indicator"], false);
    }

    #[test]
    fn unit_toggle_is_one_way() {
        let (mut game, mut ctx) = started();
        select_km(&mut game, &mut ctx);
        push(&mut ctx, InputEvent::Custom { kind: CUSTOM_SELECT_UNIT, a: 0.0, b: 0.0, c: 0.0 });
        game.update(&mut ctx, FRAME);
        let overlay = game.overlay();
        assert_eq!(overlay["units"]["selected"], "Kilometers");
        assert_eq!(overlay["units"]["light_years_enabled"], false);
        assert_eq!(overlay["mission_log"]["objectives"][0]["done"], true);
    }

    #[test]
    fn light_years_never_launch() {
        let (mut game, mut ctx) = started();
        push(&mut ctx, InputEvent::KeyDown { key: KeyCode::W });
        run(&mut game, &mut ctx, 2.0);
        assert_eq!(game.phase(), Some(Phase::AmbientIdle));
        assert!(!ctx.audio.is_playing(SOUND_TAKEOFF));
    }

    #[test]
    fn full_flight_to_mercury() {
        let (mut game, mut ctx) = started();
        select_km(&mut game, &mut ctx);

        push(&mut ctx, InputEvent::KeyDown { key: KeyCode::W });
        run(&mut game, &mut ctx, 0.5);
        assert_eq!(game.phase(), Some(Phase::Takeoff));
        assert!(ctx.audio.is_playing(SOUND_TAKEOFF));
        assert_eq!(game.overlay()["speed_readout"], "91mil Km/s");
        assert_eq!(game.overlay()["nitro_marker"], 9.1_f32 as f64);

        ctx.events.clear();
        push(&mut ctx, InputEvent::SoundEnded { sound: SOUND_TAKEOFF });
        game.update(&mut ctx, FRAME);
        assert_eq!(game.phase(), Some(Phase::Transit));
        assert!(!ctx.audio.is_playing(SOUND_IDLE_A));
        assert!(ctx.events.contains(&GameEvent::new(EVENT_PHASE, 3.0, 0.0, 0.0)));

        run(&mut game, &mut ctx, 1.0);
        assert_eq!(game.phase(), Some(Phase::Arrived));
        assert_eq!(ship_z(&ctx), 200.0);
        assert_eq!(ctx.scene.find_by_tag("spaceship:wings").unwrap().position.z, 200.0);
        assert_eq!(ctx.camera.target, Vec3::new(0.0, 5.0, 200.0));

        run(&mut game, &mut ctx, 3.5);
        let fade = game.overlay()["fade_opacity"].as_f64().unwrap();
        assert!((fade - 1.0).abs() < 1e-6);
    }

    #[test]
    fn releasing_during_takeoff_rewinds_the_cue() {
        let (mut game, mut ctx) = started();
        select_km(&mut game, &mut ctx);
        push(&mut ctx, InputEvent::KeyDown { key: KeyCode::W });
        run(&mut game, &mut ctx, 0.5);
        ctx.audio.drain();

        push(&mut ctx, InputEvent::KeyUp { key: KeyCode::W });
        game.update(&mut ctx, FRAME);
        assert_eq!(game.phase(), Some(Phase::Charging));
        assert!(ctx.audio.drain().contains(&AudioCommand::Stop { sound: SOUND_TAKEOFF }));

        // A stale end report must not launch the ship.
        push(&mut ctx, InputEvent::SoundEnded { sound: SOUND_TAKEOFF });
        game.update(&mut ctx, FRAME);
        assert_ne!(game.phase(), Some(Phase::Transit));
    }

    #[test]
    fn mission_log_dismiss_and_show() {
        let (mut game, mut ctx) = started();
        push(&mut ctx, InputEvent::Custom { kind: CUSTOM_DISMISS_LOG, a: 0.0, b: 0.0, c: 0.0 });
        game.update(&mut ctx, FRAME);
        assert_eq!(game.overlay()["mission_log"]["visible"], false);
        assert_eq!(game.overlay()["mission_log"]["show_button"], false);

        run(&mut game, &mut ctx, 0.6);
        assert_eq!(game.overlay()["mission_log"]["show_button"], true);

        push(&mut ctx, InputEvent::Custom { kind: CUSTOM_SHOW_LOG, a: 0.0, b: 0.0, c: 0.0 });
        game.update(&mut ctx, FRAME);
        assert_eq!(game.overlay()["mission_log"]["visible"], true);
        assert_eq!(game.overlay()["mission_log"]["show_button"], false);
    }

    #[test]
    fn camera_drifts_home_after_a_drag() {
        let (mut game, mut ctx) = started();
        push(&mut ctx, InputEvent::PointerDown { x: 100.0, y: 100.0, button: 0 });
        push(&mut ctx, InputEvent::PointerMove { x: 300.0, y: 120.0, button: 0 });
        push(&mut ctx, InputEvent::PointerUp { x: 300.0, y: 120.0, button: 0 });
        run(&mut game, &mut ctx, 0.5);
        assert!(ctx.camera.position.distance(Vec3::new(-2.0, 8.0, -216.0)) > 0.1);

        run(&mut game, &mut ctx, 2.0);
        assert!(ctx.camera.position.distance(Vec3::new(-2.0, 8.0, -216.0)) < 1e-3);
        assert_eq!(ctx.camera.target, Vec3::new(0.0, 5.0, -200.0));
    }

    #[test]
    fn overlay_carries_lighting_and_starfield() {
        let (game, _ctx) = started();
        let overlay = game.overlay();
        assert_eq!(overlay["lighting"]["ambient"], 0.2_f32 as f64);
        assert_eq!(overlay["starfield"]["radius"], 300.0);
        assert_eq!(overlay["phase"], "ambient_idle");
    }

    #[test]
    fn teardown_releases_everything_once() {
        let (mut game, mut ctx) = started();
        push(&mut ctx, InputEvent::Custom { kind: CUSTOM_DISMISS_LOG, a: 0.0, b: 0.0, c: 0.0 });
        game.update(&mut ctx, FRAME);
        ctx.audio.drain();

        game.teardown(&mut ctx);
        assert_eq!(ctx.input.subscriber_count(), 0);
        assert!(!ctx.audio.is_playing(SOUND_IDLE_A));
        assert!(ctx.audio.drain().contains(&AudioCommand::Pause { sound: SOUND_IDLE_A }));
        assert!(game.overlay().is_null());

        game.teardown(&mut ctx);
        game.update(&mut ctx, FRAME);
        assert!(ctx.audio.drain().is_empty());
    }
}
