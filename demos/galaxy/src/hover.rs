/// Hover feedback: per-body smoothed scale, ring scale and orbit highlight.
///
/// Each body is Idle or Hovered. Every frame, whatever the state, the
/// smoothed values step toward the targets for that state.

use orrery_engine::{CursorStyle, Smoothed, Smoothing};
use serde::Deserialize;
use crate::bodies::{BodyClass, CelestialBody};

/// Target values while hovered (and the idle orbit opacity).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HoverTargets {
    pub star_scale: f32,
    pub inner_scale: f32,
    pub mercury_scale: f32,
    pub outer_scale: f32,
    pub moon_scale: f32,
    /// Saturn's ring bands.
    pub ring_scale: f32,
    /// Moon orbit radius multiplier while its parent is hovered.
    pub moon_spread: f32,
    pub orbit_opacity_hovered: f32,
    pub orbit_opacity_idle: f32,
}

impl Default for HoverTargets {
    fn default() -> Self {
        Self {
            star_scale: 1.0,
            inner_scale: 1.3,
            mercury_scale: 1.4,
            outer_scale: 1.2,
            moon_scale: 1.3,
            ring_scale: 1.3,
            moon_spread: 1.3,
            orbit_opacity_hovered: 0.8,
            orbit_opacity_idle: 0.4,
        }
    }
}

impl HoverTargets {
    /// Largest scale a body reaches while hovered.
    pub fn max_scale(&self, body: &CelestialBody) -> f32 {
        match body.class() {
            BodyClass::Star => self.star_scale,
            BodyClass::InnerPlanet if body.name() == "mercury" => self.mercury_scale,
            BodyClass::InnerPlanet => self.inner_scale,
            BodyClass::OuterPlanet => self.outer_scale,
            BodyClass::Moon => self.moon_scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    hovered: bool,
    max_scale: f32,
    targets: HoverTargets,
    pub scale: Smoothed,
    pub ring_scale: Smoothed,
    pub orbit_opacity: Smoothed,
    pub distance_scale: Smoothed,
}

impl HoverState {
    pub fn new(body: &CelestialBody, targets: HoverTargets) -> Self {
        Self {
            hovered: false,
            max_scale: targets.max_scale(body),
            targets,
            scale: Smoothed::new(1.0),
            ring_scale: Smoothed::new(1.0),
            orbit_opacity: Smoothed::new(targets.orbit_opacity_idle),
            distance_scale: Smoothed::new(1.0),
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    /// Pointer entered (true) or left (false). Only retargets; values move
    /// on `step`.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
        let t = &self.targets;
        if hovered {
            self.scale.set_target(self.max_scale);
            self.ring_scale.set_target(t.ring_scale);
            self.orbit_opacity.set_target(t.orbit_opacity_hovered);
            self.distance_scale.set_target(t.moon_spread);
        } else {
            self.scale.set_target(1.0);
            self.ring_scale.set_target(1.0);
            self.orbit_opacity.set_target(t.orbit_opacity_idle);
            self.distance_scale.set_target(1.0);
        }
    }

    pub fn step(&mut self, smoothing: Smoothing, dt: f32) {
        self.scale.step(smoothing, dt);
        self.ring_scale.step(smoothing, dt);
        self.orbit_opacity.step(smoothing, dt);
        self.distance_scale.step(smoothing, dt);
    }
}

/// Pointer affordance while anything is hovered.
pub fn cursor_for<'a>(states: impl IntoIterator<Item = &'a HoverState>) -> CursorStyle {
    if states.into_iter().any(HoverState::is_hovered) {
        CursorStyle::Pointer
    } else {
        CursorStyle::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::Ephemeris;

    fn state_for(name: &str) -> HoverState {
        let eph = Ephemeris::solar_system(0.0).unwrap();
        HoverState::new(eph.by_name(name).unwrap(), HoverTargets::default())
    }

    fn converge(smoothing: Smoothing, dt: f32) {
        let mut state = state_for("earth");
        state.set_hovered(true);
        let mut steps = 0;
        while !state.scale.is_settled(1e-3) {
            let before = state.scale.current;
            state.step(smoothing, dt);
            assert!(state.scale.current >= before);
            assert!((1.0..=1.3).contains(&state.scale.current));
            steps += 1;
            assert!(steps < 200, "did not converge");
        }
    }

    #[test]
    fn scale_converges_without_overshoot_per_frame() {
        converge(Smoothing::PerFrame(0.1), 1.0 / 60.0);
    }

    #[test]
    fn scale_converges_without_overshoot_half_life() {
        converge(Smoothing::default(), 1.0 / 60.0);
        converge(Smoothing::default(), 1.0 / 144.0);
    }

    #[test]
    fn half_life_matches_per_frame_at_60hz() {
        let mut a = state_for("venus");
        let mut b = state_for("venus");
        a.set_hovered(true);
        b.set_hovered(true);
        for _ in 0..30 {
            a.step(Smoothing::PerFrame(0.1), 1.0 / 60.0);
            b.step(Smoothing::default(), 1.0 / 60.0);
        }
        assert!((a.scale.current - b.scale.current).abs() < 1e-3);
    }

    #[test]
    fn class_dependent_maximum() {
        assert_eq!(state_for("sun").max_scale(), 1.0);
        assert_eq!(state_for("mercury").max_scale(), 1.4);
        assert_eq!(state_for("mars").max_scale(), 1.3);
        assert_eq!(state_for("neptune").max_scale(), 1.2);
    }

    #[test]
    fn unhover_returns_to_idle() {
        let mut state = state_for("saturn");
        state.set_hovered(true);
        for _ in 0..120 {
            state.step(Smoothing::PerFrame(0.1), 1.0 / 60.0);
        }
        assert!((state.ring_scale.current - 1.3).abs() < 1e-3);
        assert!((state.orbit_opacity.current - 0.8).abs() < 1e-3);

        state.set_hovered(false);
        for _ in 0..120 {
            state.step(Smoothing::PerFrame(0.1), 1.0 / 60.0);
            assert!(state.scale.current >= 1.0);
        }
        assert!((state.scale.current - 1.0).abs() < 1e-3);
        assert!((state.orbit_opacity.current - 0.4).abs() < 1e-3);
    }

    #[test]
    fn cursor_tracks_any_hover() {
        let mut states = vec![state_for("earth"), state_for("mars")];
        assert_eq!(cursor_for(&states), CursorStyle::Default);
        states[1].set_hovered(true);
        assert_eq!(cursor_for(&states), CursorStyle::Pointer);
        states[1].set_hovered(false);
        assert_eq!(cursor_for(&states), CursorStyle::Default);
    }
}
