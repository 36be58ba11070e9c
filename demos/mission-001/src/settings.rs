use std::f32::consts::PI;
use glam::Vec3;
use orrery_engine::{Easing, OrbitSettings, ReturnToDefault, SoundId};
use serde::{Deserialize, Serialize};
use crate::idle_loop::IdleLoopSettings;
use crate::sequencer::SequencerSettings;

// ── Asset ids (match the manifest) ──────────────────────────────────
pub const SOUND_IDLE_A: SoundId = SoundId(1);
pub const SOUND_IDLE_B: SoundId = SoundId(2);
pub const SOUND_TAKEOFF: SoundId = SoundId(3);
pub const MODEL_SPACESHIP: u32 = 10;
pub const SLOT_BASE: &str = "BASE";
pub const SLOT_WINGS: &str = "WINGS";

/// Tunables of the Mercury mission. Missing JSON fields keep defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MissionSettings {
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub orbit_rotate_speed: f32,
    pub orbit_damping: f32,
    pub orbit_min_distance: f32,
    pub orbit_max_distance: f32,
    /// Seconds after a pan/rotate before the camera drifts home.
    pub return_delay: f32,
    pub return_duration: f32,
    pub idle_volume: f32,
    pub takeoff_volume: f32,
    pub crossfade_lead: f32,
    pub restart_lead: f32,
    pub level_show_at: f32,
    pub level_hide_at: f32,
    /// Delay between reaching 100% load and revealing the overlay.
    pub load_settle: f32,
    /// Delay between dismissing the log and offering the show button.
    pub log_settle: f32,
    /// Height of the camera aim point above the ship.
    pub target_height: f32,
    pub sequencer: SequencerSettings,
    pub starfield: Starfield,
}

/// Backdrop star field, forwarded to the host.
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
            radius: 300.0,
            depth: 100.0,
            count: 50_000,
            factor: 4.0,
            saturation: 0.0,
            speed: 2.0,
        }
    }
}

impl Default for MissionSettings {
    fn default() -> Self {
        Self {
            camera_position: Vec3::new(-2.0, 8.0, -216.0),
            camera_target: Vec3::new(0.0, 5.0, -200.0),
            camera_fov: 75.0,
            camera_near: 0.1,
            camera_far: 1000.0,
            orbit_rotate_speed: 0.5,
            orbit_damping: 0.5,
            orbit_min_distance: 5.0,
            orbit_max_distance: 1.0e6,
            return_delay: 1.0,
            return_duration: 1.0,
            idle_volume: 0.3,
            takeoff_volume: 1.0,
            crossfade_lead: 0.5,
            restart_lead: 0.05,
            level_show_at: 3.0,
            level_hide_at: 6.0,
            load_settle: 0.5,
            log_settle: 0.5,
            target_height: 5.0,
            sequencer: SequencerSettings::default(),
            starfield: Starfield::default(),
        }
    }
}

impl MissionSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Rotate and pan only; the camera drifts back to the launch pose.
    pub fn orbit_settings(&self) -> OrbitSettings {
        OrbitSettings {
            rotate_speed: self.orbit_rotate_speed,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            enable_zoom: false,
            enable_pan: true,
            min_distance: self.orbit_min_distance,
            max_distance: self.orbit_max_distance,
            min_polar: 0.0,
            max_polar: PI,
            damping: self.orbit_damping,
            return_to_default: Some(ReturnToDefault {
                idle_delay: self.return_delay,
                duration: self.return_duration,
                easing: Easing::QuadInOut,
                ..ReturnToDefault::new(self.camera_position, self.camera_target)
            }),
        }
    }

    pub fn idle_loop(&self) -> IdleLoopSettings {
        IdleLoopSettings {
            volume: self.idle_volume,
            crossfade_lead: self.crossfade_lead,
            restart_lead: self.restart_lead,
        }
    }

    /// Where the camera aims while following the ship at `z`.
    pub fn follow_target(&self, z: f32) -> Vec3 {
        Vec3::new(0.0, self.target_height, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_pose_is_the_return_pose() {
        let s = MissionSettings::default();
        let orbit = s.orbit_settings();
        assert!(!orbit.enable_zoom);
        assert!(orbit.enable_pan);
        let ret = orbit.return_to_default.unwrap();
        assert_eq!(ret.position, Vec3::new(-2.0, 8.0, -216.0));
        assert_eq!(ret.target, Vec3::new(0.0, 5.0, -200.0));
        assert_eq!(ret.idle_delay, 1.0);
        assert_eq!(ret.easing, Easing::QuadInOut);
    }

    #[test]
    fn follow_target_matches_launch_target() {
        let s = MissionSettings::default();
        assert_eq!(s.follow_target(s.sequencer.start_position), s.camera_target);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s = MissionSettings::from_json(
            r#"{ "idle_volume": 0.5, "sequencer": { "transit_step": 50 } }"#,
        )
        .unwrap();
        assert_eq!(s.idle_volume, 0.5);
        assert_eq!(s.idle_loop().volume, 0.5);
        assert_eq!(s.sequencer.transit_step, 50.0);
        assert_eq!(s.sequencer.gated_cap, 9.1);
        assert_eq!(s.starfield.count, 50_000);
    }
}
