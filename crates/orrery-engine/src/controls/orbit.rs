// controls/orbit.rs
//
// Orbit-around-target camera with damped rotate/pan, wheel zoom and an
// optional "return to default pose" once the user lets go.
//
// Rotation works on spherical coordinates of (position - target): theta is
// the azimuth around +Y, phi the polar angle measured from +Y. The offset is
// re-read from the camera every frame, so anything else that moves the
// camera (free-fly keys, scripted targets) composes with the controls.

use std::f32::consts::{PI, TAU};
use glam::{Vec2, Vec3};
use crate::core::timer::Timer;
use crate::extensions::easing::Easing;
use crate::extensions::tween::Tween;
use crate::input::queue::InputEvent;
use crate::renderer::camera::Camera3D;
use super::CameraMode;

const POLAR_EPS: f32 = 1e-6;
const BUTTON_ROTATE: u32 = 0;
const BUTTON_PAN: u32 = 2;

/// Default pose the camera eases back to after the user goes idle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnToDefault {
    pub position: Vec3,
    pub target: Vec3,
    /// Seconds of inactivity before the return starts.
    pub idle_delay: f32,
    /// Length of the eased return.
    pub duration: f32,
    pub easing: Easing,
}

impl ReturnToDefault {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            idle_delay: 1.0,
            duration: 1.0,
            easing: Easing::QuadInOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar clamp, a sub-range of [0, PI].
    pub min_polar: f32,
    pub max_polar: f32,
    /// Fraction of pending rotate/pan applied per update. 0 disables damping.
    pub damping: f32,
    pub return_to_default: Option<ReturnToDefault>,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            enable_zoom: true,
            enable_pan: true,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar: 0.0,
            max_polar: PI,
            damping: 0.05,
            return_to_default: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Rotate,
    Pan,
}

/// Spherical offset of the camera from its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self { radius: 0.0, theta: 0.0, phi: 0.0 };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

pub struct OrbitControls {
    pub settings: OrbitSettings,
    mode: CameraMode,
    drag: Option<Drag>,
    last_pointer: Vec2,
    /// Pending azimuth / polar rotation, consumed over frames when damped.
    rotate_delta: Vec2,
    pan_delta: Vec3,
    zoom_scale: f32,
    viewport: Vec2,
    idle_timer: Option<Timer>,
    returning: Option<Tween<(Vec3, Vec3)>>,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            mode: CameraMode::OrbitIdle,
            drag: None,
            last_pointer: Vec2::ZERO,
            rotate_delta: Vec2::ZERO,
            pan_delta: Vec3::ZERO,
            zoom_scale: 1.0,
            viewport: Vec2::new(1920.0, 1080.0),
            idle_timer: None,
            returning: None,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_idle_timer_pending(&self) -> bool {
        self.idle_timer.is_some()
    }

    /// Viewport size in CSS pixels, used to convert drags to angles.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    fn set_mode(&mut self, mode: CameraMode) {
        if self.mode != mode {
            log::debug!("camera {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Pan/rotate/zoom started: user control wins over any idle return.
    pub fn begin_interaction(&mut self) {
        self.idle_timer = None;
        self.returning = None;
        self.set_mode(CameraMode::OrbitUserDriven);
    }

    /// Pan/rotate/zoom ended: arm the idle timer if a default pose is set.
    pub fn end_interaction(&mut self) {
        self.drag = None;
        self.set_mode(CameraMode::OrbitIdle);
        if let Some(ret) = self.settings.return_to_default {
            self.idle_timer = Some(Timer::new(ret.idle_delay));
        }
    }

    /// Drop the idle timer and any return in flight (teardown, scripted camera).
    pub fn cancel_return(&mut self) {
        self.idle_timer = None;
        if self.returning.take().is_some() {
            self.set_mode(CameraMode::OrbitIdle);
        }
    }

    /// Key flight engaged or released. Flying preempts any idle return;
    /// an active drag keeps the camera user-driven.
    pub fn set_free_flight(&mut self, active: bool) {
        if active {
            if self.mode == CameraMode::Free {
                return;
            }
            self.idle_timer = None;
            self.returning = None;
            if self.drag.is_none() {
                self.set_mode(CameraMode::Free);
            }
        } else if self.mode == CameraMode::Free {
            self.end_interaction();
        }
    }

    pub fn handle(&mut self, event: &InputEvent, camera: &Camera3D) {
        match *event {
            InputEvent::PointerDown { x, y, button } => {
                let drag = match button {
                    BUTTON_ROTATE => Some(Drag::Rotate),
                    BUTTON_PAN if self.settings.enable_pan => Some(Drag::Pan),
                    _ => None,
                };
                if drag.is_some() {
                    self.drag = drag;
                    self.last_pointer = Vec2::new(x, y);
                    self.begin_interaction();
                }
            }
            InputEvent::PointerMove { x, y, .. } => {
                let Some(drag) = self.drag else { return };
                let pos = Vec2::new(x, y);
                let delta = pos - self.last_pointer;
                self.last_pointer = pos;
                match drag {
                    Drag::Rotate => self.rotate_by_pixels(delta),
                    Drag::Pan => self.pan_by_pixels(delta, camera),
                }
            }
            InputEvent::PointerUp { .. } => {
                if self.drag.is_some() {
                    self.end_interaction();
                }
            }
            InputEvent::Wheel { delta } => {
                if !self.settings.enable_zoom || delta == 0.0 {
                    return;
                }
                let dragging = self.drag.is_some();
                if !dragging {
                    self.begin_interaction();
                }
                let step = 0.95_f32.powf(self.settings.zoom_speed);
                if delta < 0.0 {
                    self.zoom_scale *= step;
                } else {
                    self.zoom_scale /= step;
                }
                if !dragging {
                    self.end_interaction();
                }
            }
            _ => {}
        }
    }

    fn rotate_by_pixels(&mut self, delta: Vec2) {
        let h = self.viewport.y;
        self.rotate_delta.x -= TAU * delta.x / h * self.settings.rotate_speed;
        self.rotate_delta.y -= TAU * delta.y / h * self.settings.rotate_speed;
    }

    fn pan_by_pixels(&mut self, delta: Vec2, camera: &Camera3D) {
        let offset = camera.position - camera.target;
        let target_distance = offset.length() * (camera.fov.to_radians() / 2.0).tan();
        let forward = camera.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        let scale = 2.0 * target_distance / self.viewport.y * self.settings.pan_speed;
        self.pan_delta += -right * delta.x * scale + up * delta.y * scale;
    }

    /// Advance timers and damping, then write the resulting pose to `camera`.
    pub fn update(&mut self, camera: &mut Camera3D, dt: f32) {
        let mut return_dt = dt;
        if let Some(timer) = self.idle_timer.as_mut() {
            let remaining = timer.remaining();
            if timer.tick(dt) {
                self.idle_timer = None;
                // Only the time past the deadline belongs to the return.
                return_dt = dt - remaining;
                if let Some(ret) = self.settings.return_to_default {
                    self.returning = Some(Tween::new(
                        (camera.position, camera.target),
                        (ret.position, ret.target),
                        ret.duration,
                        ret.easing,
                    ));
                    self.rotate_delta = Vec2::ZERO;
                    self.pan_delta = Vec3::ZERO;
                    self.set_mode(CameraMode::ReturningToDefault);
                }
            }
        }

        if let Some(tween) = self.returning.as_mut() {
            let (position, target) = tween.tick(return_dt);
            camera.position = position;
            camera.target = target;
            if tween.is_complete() {
                self.returning = None;
                self.set_mode(CameraMode::OrbitIdle);
            }
            return;
        }

        let factor = if self.settings.damping > 0.0 {
            self.settings.damping.min(1.0)
        } else {
            1.0
        };

        let settled = self.rotate_delta == Vec2::ZERO
            && self.pan_delta == Vec3::ZERO
            && self.zoom_scale == 1.0;

        let mut sph = Spherical::from_offset(camera.position - camera.target);
        let before = sph;
        sph.theta += self.rotate_delta.x * factor;
        sph.phi += self.rotate_delta.y * factor;
        let min_phi = self.settings.min_polar.max(POLAR_EPS);
        let max_phi = self.settings.max_polar.min(PI - POLAR_EPS);
        sph.phi = sph.phi.clamp(min_phi, max_phi.max(min_phi));
        sph.radius = (sph.radius * self.zoom_scale)
            .clamp(self.settings.min_distance, self.settings.max_distance.max(self.settings.min_distance));

        // Nothing pending and already inside the limits: leave the pose untouched.
        if settled && sph == before {
            return;
        }

        camera.target += self.pan_delta * factor;
        camera.position = camera.target + sph.to_offset();

        self.rotate_delta *= 1.0 - factor;
        self.pan_delta *= 1.0 - factor;
        if self.rotate_delta.length_squared() < 1e-12 {
            self.rotate_delta = Vec2::ZERO;
        }
        if self.pan_delta.length_squared() < 1e-12 {
            self.pan_delta = Vec3::ZERO;
        }
        self.zoom_scale = 1.0;
    }
}
