/// Galaxy: the solar system at real orbital and spin rates.
///
/// Free-fly keys and orbit drag/zoom steer the camera; hovering a body
/// enlarges it, highlights its orbit and spreads the Moon's orbit.

use glam::Vec3;
use orrery_engine::*;
use serde_json::json;

use crate::bodies::{self, BodyClass, CelestialBody, Ephemeris, EphemerisError};
use crate::hover::{cursor_for, HoverState};
use crate::labels::billboard;
use crate::orbit::{Integrator, ELLIPTICAL_FACTOR};
use crate::settings::GalaxySettings;

// ── Custom event kinds from the host ─────────────────────────────────

/// Viewport resize: a = width, b = height (CSS pixels).
const CUSTOM_RESIZE: u32 = 99;

// ── Game event kinds to the host ─────────────────────────────────────

/// a = body index, b = 1 on enter / 0 on leave.
const EVENT_HOVER: u32 = 1;
/// The body tables failed validation; the scene stays empty.
/// The message is in the overlay's `error` field.
const EVENT_CONFIG_ERROR: u32 = 2;

// ── Materials ────────────────────────────────────────────────────────

const PLANET_EMISSIVE_HOVERED: f32 = 0.4;
const MOON_EMISSIVE_HOVERED: f32 = 0.2;
const RING_EMISSIVE_HOVERED: f32 = 0.2;

const ORBIT_WIDTH: f32 = 2.0;
const ORBIT_WIDTH_HOVERED: f32 = 4.0;

/// Saturn's two bands: inner and outer radius relative to the planet,
/// colour, idle and hovered opacity.
const SATURN_BANDS: [(f32, f32, u32, f32, f32); 2] = [
    (1.2, 2.2, 0xf4d03f, 0.8, 0.9),
    (1.3, 1.9, 0xc4a63f, 0.6, 0.8),
];

/// Half-width of the Moon's orbit ring.
const MOON_RING_HALF_WIDTH: f32 = 0.1;
const MOON_RING_OPACITY: f32 = 0.1;
const MOON_RING_OPACITY_HOVERED: f32 = 0.5;

const SUN_LABEL_ORDER: i32 = 999;

fn label_offset(class: BodyClass) -> f32 {
    match class {
        BodyClass::Star => 50.0,
        BodyClass::InnerPlanet => 10.0,
        BodyClass::OuterPlanet => 20.0,
        BodyClass::Moon => 0.0,
    }
}

/// Entities owned by one body.
#[derive(Debug, Clone, Default)]
struct BodyEntities {
    body: Option<EntityId>,
    /// Invisible sphere the host hit-tests for pointer enter/leave.
    hit: Option<EntityId>,
    orbit_path: Option<EntityId>,
    /// Saturn's bands, or the Moon's orbit ring.
    rings: Vec<EntityId>,
}

/// Everything that only exists once the ephemeris is built.
struct Simulation {
    ephemeris: Ephemeris,
    integrator: Integrator,
    hover: Vec<HoverState>,
    entities: Vec<BodyEntities>,
}

pub struct Galaxy {
    settings: GalaxySettings,
    sim: Option<Simulation>,
    keys: KeyState,
    fly: FreeFly,
    orbit: OrbitControls,
    input: Option<Subscription>,
    error: Option<EphemerisError>,
}

impl Galaxy {
    pub fn new() -> Self {
        Self::with_settings(GalaxySettings::default())
    }

    pub fn with_settings(settings: GalaxySettings) -> Self {
        Self {
            fly: FreeFly::new(settings.fly_horizontal_speed, settings.fly_vertical_speed),
            orbit: OrbitControls::new(settings.orbit_settings()),
            settings,
            sim: None,
            keys: KeyState::new(),
            input: None,
            error: None,
        }
    }

    /// Name of the hovered body, if any.
    pub fn hovered(&self) -> Option<&str> {
        let sim = self.sim.as_ref()?;
        sim.hover
            .iter()
            .zip(sim.ephemeris.bodies())
            .find(|(h, b)| h.is_hovered() && b.parent().is_none())
            .map(|(_, b)| b.name())
    }

    pub fn ephemeris(&self) -> Option<&Ephemeris> {
        self.sim.as_ref().map(|s| &s.ephemeris)
    }

    /// Why the scene is empty, if the body tables were rejected.
    pub fn error(&self) -> Option<&EphemerisError> {
        self.error.as_ref()
    }

    // ── Setup ────────────────────────────────────────────────────────

    fn start(&mut self, ctx: &mut EngineContext, built: Result<Ephemeris, EphemerisError>) {
        let ephemeris = match built {
            Ok(e) => e,
            Err(err) => {
                log::error!("galaxy: invalid ephemeris: {err}");
                ctx.emit_event(GameEvent::new(EVENT_CONFIG_ERROR, 0.0, 0.0, 0.0));
                self.error = Some(err);
                return;
            }
        };

        let entities: Vec<BodyEntities> =
            ephemeris.bodies().iter().map(|b| self.spawn_body(ctx, b)).collect();
        let hover = ephemeris
            .bodies()
            .iter()
            .map(|b| HoverState::new(b, self.settings.hover))
            .collect();
        let integrator = Integrator::new(&ephemeris, ctx.wall_clock_seconds)
            .with_max_step(self.settings.max_step_seconds);

        self.input = Some(ctx.input.subscribe(&[InputChannel::Keyboard, InputChannel::Pointer, InputChannel::Ui]));
        log::info!("galaxy: {} bodies, {} entities", ephemeris.len(), ctx.scene.len());

        let sim = Simulation { ephemeris, integrator, hover, entities };
        Self::write_scene(&sim, ctx);
        self.sim = Some(sim);
        self.update_labels(ctx);
    }

    fn spawn_body(&self, ctx: &mut EngineContext, body: &CelestialBody) -> BodyEntities {
        let mut owned = BodyEntities::default();
        let radius = body.radius() as f32;

        let mut mesh = MeshComponent::new(MeshShape::Sphere { radius }, body.color());
        if body.class() == BodyClass::Star {
            mesh = mesh.with_emissive(Color::from_hex(bodies::SUN_EMISSIVE), bodies::SUN_EMISSIVE_INTENSITY);
        }
        let id = ctx.next_id();
        let mut entity = Entity::new(id).with_tag(body.name()).with_mesh(mesh);
        if body.class() != BodyClass::Moon {
            let order = if body.class() == BodyClass::Star { SUN_LABEL_ORDER } else { 1 };
            entity = entity.with_label(
                LabelComponent::new(body.label_text())
                    .with_offset(Vec3::Y * label_offset(body.class()))
                    .with_render_order(order),
            );
        }
        ctx.scene.spawn(entity);
        owned.body = Some(id);

        if body.parent().is_none() {
            let id = ctx.next_id();
            let proxy = MeshComponent::new(
                MeshShape::Sphere { radius: radius * self.settings.hit_radius_factor },
                Color::WHITE,
            )
            .with_opacity(0.0);
            ctx.scene.spawn(Entity::new(id).with_tag(format!("{}:hit", body.name())).with_mesh(proxy));
            owned.hit = Some(id);
        }

        if let Some(orbit) = body.orbit() {
            let r = orbit.radius as f32;
            if body.parent().is_none() {
                let id = ctx.next_id();
                let path = MeshComponent::new(
                    MeshShape::OrbitPath {
                        radius_x: r,
                        radius_z: r * (1.0 - ELLIPTICAL_FACTOR as f32),
                        width: ORBIT_WIDTH,
                    },
                    body.color(),
                )
                .with_opacity(self.settings.hover.orbit_opacity_idle);
                ctx.scene.spawn(Entity::new(id).with_tag(format!("{}:orbit", body.name())).with_mesh(path));
                owned.orbit_path = Some(id);
            } else {
                let id = ctx.next_id();
                let ring = MeshComponent::new(
                    MeshShape::Ring {
                        inner: r - MOON_RING_HALF_WIDTH,
                        outer: r + MOON_RING_HALF_WIDTH,
                    },
                    Color::WHITE,
                )
                .with_opacity(MOON_RING_OPACITY);
                ctx.scene.spawn(
                    Entity::new(id)
                        .with_tag(format!("{}:orbit", body.name()))
                        .with_mesh(ring),
                );
                owned.rings.push(id);
            }
        }

        if body.name() == "saturn" {
            for (i, &(inner, outer, color, opacity, _)) in SATURN_BANDS.iter().enumerate() {
                let id = ctx.next_id();
                let color = Color::from_hex(color);
                let band = MeshComponent::new(
                    MeshShape::Ring { inner: radius * inner, outer: radius * outer },
                    color,
                )
                .with_emissive(color, 0.0)
                .with_roughness(0.3)
                .with_metalness(0.5)
                .with_opacity(opacity);
                ctx.scene.spawn(
                    Entity::new(id)
                        .with_tag(format!("saturn:ring{i}"))
                        .with_mesh(band),
                );
                owned.rings.push(id);
            }
        }

        owned
    }

    // ── Per-frame ────────────────────────────────────────────────────

    fn handle_input(&mut self, ctx: &mut EngineContext) {
        let Some(sub) = &self.input else { return };
        for event in ctx.input.drain(sub) {
            match event {
                InputEvent::KeyDown { key } => self.keys.press(key),
                InputEvent::KeyUp { key } => self.keys.release(key),
                InputEvent::PointerEnter { entity } => self.set_hovered(ctx, entity, true),
                InputEvent::PointerLeave { entity } => self.set_hovered(ctx, entity, false),
                InputEvent::Custom { kind: CUSTOM_RESIZE, a, b, .. } => self.orbit.resize(a, b),
                InputEvent::PointerDown { .. }
                | InputEvent::PointerMove { .. }
                | InputEvent::PointerUp { .. }
                | InputEvent::Wheel { .. } => self.orbit.handle(&event, &ctx.camera),
                _ => {}
            }
        }
    }

    fn set_hovered(&mut self, ctx: &mut EngineContext, entity: EntityId, hovered: bool) {
        let Some(sim) = self.sim.as_mut() else { return };
        let Some(index) = sim.entities.iter().position(|e| e.hit == Some(entity)) else {
            log::debug!("pointer event for unknown entity {entity:?}");
            return;
        };
        if sim.hover[index].is_hovered() == hovered {
            return;
        }
        sim.hover[index].set_hovered(hovered);
        // Moons follow their parent's hover.
        for (i, body) in sim.ephemeris.bodies().iter().enumerate() {
            if body.parent() == Some(index) {
                sim.hover[i].set_hovered(hovered);
            }
        }
        ctx.emit_event(GameEvent::new(EVENT_HOVER, index as f32, if hovered { 1.0 } else { 0.0 }, 0.0));
    }

    fn write_scene(sim: &Simulation, ctx: &mut EngineContext) {
        let positions = sim
            .integrator
            .world_positions(&sim.ephemeris, |i| f64::from(sim.hover[i].distance_scale.current));

        for (i, body) in sim.ephemeris.bodies().iter().enumerate() {
            let hover = &sim.hover[i];
            let hovered = hover.is_hovered();
            let owned = &sim.entities[i];
            let position = positions[i].as_vec3();
            let spin = sim.integrator.state(i).map_or(0.0, |s| s.rotation_angle as f32);

            if let Some(e) = owned.body.and_then(|id| ctx.scene.get_mut(id)) {
                e.position = position;
                e.rotation.y = spin;
                e.scale = hover.scale.current;
                if let Some(mesh) = e.mesh.as_mut() {
                    apply_body_material(mesh, body, hovered);
                }
            }

            if let Some(e) = owned.hit.and_then(|id| ctx.scene.get_mut(id)) {
                e.position = position;
            }

            if let Some(e) = owned.orbit_path.and_then(|id| ctx.scene.get_mut(id)) {
                if let Some(mesh) = e.mesh.as_mut() {
                    mesh.opacity = hover.orbit_opacity.current;
                    if let MeshShape::OrbitPath { width, .. } = &mut mesh.shape {
                        *width = if hovered { ORBIT_WIDTH_HOVERED } else { ORBIT_WIDTH };
                    }
                }
            }

            if body.class() == BodyClass::Moon {
                let parent_position = body.parent().map_or(Vec3::ZERO, |p| positions[p].as_vec3());
                let r = body.orbit().map_or(0.0, |o| o.radius as f32) * hover.distance_scale.current;
                for &id in &owned.rings {
                    let Some(e) = ctx.scene.get_mut(id) else { continue };
                    e.position = parent_position;
                    if let Some(mesh) = e.mesh.as_mut() {
                        mesh.shape = MeshShape::Ring {
                            inner: r - MOON_RING_HALF_WIDTH,
                            outer: r + MOON_RING_HALF_WIDTH,
                        };
                        mesh.opacity = if hovered { MOON_RING_OPACITY_HOVERED } else { MOON_RING_OPACITY };
                    }
                }
            } else {
                let radius = body.radius() as f32 * hover.ring_scale.current;
                for (&(inner, outer, _, opacity, opacity_hovered), &id) in
                    SATURN_BANDS.iter().zip(&owned.rings)
                {
                    let Some(e) = ctx.scene.get_mut(id) else { continue };
                    e.position = position;
                    if let Some(mesh) = e.mesh.as_mut() {
                        mesh.shape = MeshShape::Ring { inner: radius * inner, outer: radius * outer };
                        mesh.opacity = if hovered { opacity_hovered } else { opacity };
                        mesh.emissive = if hovered { RING_EMISSIVE_HOVERED } else { 0.0 };
                    }
                }
            }
        }
    }

    fn update_labels(&self, ctx: &mut EngineContext) {
        let Some(sim) = self.sim.as_ref() else { return };
        let policy = &self.settings.labels;
        let camera = ctx.camera.position;
        for (body, owned) in sim.ephemeris.bodies().iter().zip(&sim.entities) {
            let Some(e) = owned.body.and_then(|id| ctx.scene.get_mut(id)) else { continue };
            let position = e.position;
            let Some(label) = e.label.as_mut() else { continue };
            let at = position + label.offset;
            let decision = policy.decide(body.class(), at.distance(camera), label.font_size);
            label.visible = decision.visible;
            if decision.visible {
                label.font_size = decision.font_size;
                label.orientation = billboard(at, camera);
            }
        }
    }
}

fn apply_body_material(mesh: &mut MeshComponent, body: &CelestialBody, hovered: bool) {
    match body.class() {
        // The sun glows on its own and ignores hover.
        BodyClass::Star => {}
        BodyClass::Moon => {
            mesh.emissive_color = if hovered { body.color() } else { Color::BLACK };
            mesh.emissive = if hovered { MOON_EMISSIVE_HOVERED } else { 0.0 };
            mesh.roughness = if hovered { 0.4 } else { 0.7 };
            mesh.metalness = if hovered { 0.6 } else { 0.3 };
        }
        BodyClass::InnerPlanet | BodyClass::OuterPlanet => {
            mesh.emissive_color = if hovered { body.color() } else { Color::BLACK };
            mesh.emissive = if hovered { PLANET_EMISSIVE_HOVERED } else { 0.0 };
            mesh.roughness = if hovered { 0.3 } else { 0.5 };
            mesh.metalness = if hovered { 0.7 } else { 0.5 };
        }
    }
}

impl Default for Galaxy {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Galaxy {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_frame_dt: self.settings.max_step_seconds as f32,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let s = &self.settings;
        ctx.camera = Camera3D::new(s.camera_position, Vec3::ZERO)
            .with_fov(s.camera_fov)
            .with_clip(s.camera_near, s.camera_far);

        let built = Ephemeris::solar_system(ctx.wall_clock_seconds);
        self.start(ctx, built);
    }

    fn update(&mut self, ctx: &mut EngineContext, dt: f32) {
        self.handle_input(ctx);

        self.orbit.set_free_flight(FreeFly::is_active(&self.keys));
        self.fly.apply(&mut ctx.camera, &self.keys, dt);
        self.orbit.update(&mut ctx.camera, dt);

        let smoothing = self.settings.smoothing;
        if let Some(sim) = self.sim.as_mut() {
            sim.integrator.step_frame(&sim.ephemeris, f64::from(dt));
            for state in &mut sim.hover {
                state.step(smoothing, dt);
            }
            Self::write_scene(sim, ctx);
            ctx.cursor = cursor_for(&sim.hover);
        }
        self.update_labels(ctx);
    }

    fn overlay(&self) -> serde_json::Value {
        json!({
            "starfield": self.settings.starfield,
            "hovered": self.hovered(),
            "error": self.error.as_ref().map(ToString::to_string),
        })
    }

    fn teardown(&mut self, ctx: &mut EngineContext) {
        if let Some(sub) = self.input.take() {
            ctx.input.unsubscribe(sub);
        }
        self.keys.clear();
        self.orbit.cancel_return();
    }
}
