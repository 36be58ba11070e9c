use std::f32::consts::PI;
use glam::Vec3;
use orrery_engine::{OrbitSettings, Smoothing};
use serde::{Deserialize, Serialize};
use crate::hover::HoverTargets;
use crate::labels::LabelPolicy;

/// Tunables of the galaxy scene. Every field has a default, so a partial
/// JSON document is enough to override a few of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GalaxySettings {
    pub camera_position: Vec3,
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    /// Free-fly speeds, units per second.
    pub fly_horizontal_speed: f32,
    pub fly_vertical_speed: f32,
    pub orbit_rotate_speed: f32,
    pub orbit_pan_speed: f32,
    pub orbit_zoom_speed: f32,
    pub orbit_min_distance: f32,
    pub orbit_max_distance: f32,
    pub orbit_damping: f32,
    pub smoothing: Smoothing,
    pub hover: HoverTargets,
    pub labels: LabelPolicy,
    /// Hit proxy radius relative to the visible sphere.
    pub hit_radius_factor: f32,
    /// Clamp on the integrator step, seconds.
    pub max_step_seconds: f64,
    /// Backdrop star field, forwarded to the host as-is.
    pub starfield: Starfield,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Starfield {
    pub radius: f32,
    pub depth: f32,
    pub count: u32,
    pub factor: f32,
    pub saturation: f32,
    pub speed: f32,
}

impl Default for Starfield {
    fn default() -> Self {
        Self {
            radius: 10_000.0,
            depth: 5_000.0,
            count: 7_000,
            factor: 10.0,
            saturation: 0.5,
            speed: 0.5,
        }
    }
}

impl Default for GalaxySettings {
    fn default() -> Self {
        Self {
            camera_position: Vec3::new(300.0, 150.0, 0.0),
            camera_fov: 45.0,
            camera_near: 0.1,
            camera_far: 100_000.0,
            fly_horizontal_speed: 100.0,
            fly_vertical_speed: 50.0,
            orbit_rotate_speed: 0.5,
            orbit_pan_speed: 1.0,
            orbit_zoom_speed: 2.0,
            orbit_min_distance: 50.0,
            orbit_max_distance: 1.0e11,
            orbit_damping: 0.05,
            smoothing: Smoothing::default(),
            hover: HoverTargets::default(),
            labels: LabelPolicy::default(),
            hit_radius_factor: 2.0,
            max_step_seconds: crate::orbit::MAX_STEP_SECONDS,
            starfield: Starfield::default(),
        }
    }
}

impl GalaxySettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn orbit_settings(&self) -> OrbitSettings {
        OrbitSettings {
            rotate_speed: self.orbit_rotate_speed,
            pan_speed: self.orbit_pan_speed,
            zoom_speed: self.orbit_zoom_speed,
            enable_zoom: true,
            enable_pan: true,
            min_distance: self.orbit_min_distance,
            max_distance: self.orbit_max_distance,
            min_polar: 0.0,
            max_polar: PI,
            damping: self.orbit_damping,
            return_to_default: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let s = GalaxySettings::from_json(
            r#"{ "camera_fov": 60, "smoothing": { "PerFrame": 0.1 }, "labels": { "inner_hide_distance": 900 } }"#,
        )
        .unwrap();
        assert_eq!(s.camera_fov, 60.0);
        assert_eq!(s.smoothing, Smoothing::PerFrame(0.1));
        assert_eq!(s.labels.inner_hide_distance, 900.0);
        assert_eq!(s.labels.outer_hide_distance, 4800.0);
        assert_eq!(s.fly_horizontal_speed, 100.0);
    }

    #[test]
    fn orbit_settings_follow_scene_defaults() {
        let orbit = GalaxySettings::default().orbit_settings();
        assert_eq!(orbit.zoom_speed, 2.0);
        assert_eq!(orbit.min_distance, 50.0);
        assert_eq!(orbit.damping, 0.05);
        assert!(orbit.return_to_default.is_none());
    }
}
