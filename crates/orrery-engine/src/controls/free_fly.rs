use glam::Vec3;
use crate::input::keys::{KeyCode, KeyState};
use crate::renderer::camera::Camera3D;

const FLY_KEYS: [KeyCode; 6] = [
    KeyCode::W,
    KeyCode::S,
    KeyCode::A,
    KeyCode::D,
    KeyCode::Space,
    KeyCode::ShiftLeft,
];

/// Key-driven camera translation along world axes.
///
/// W/S move along -Z/+Z, A/D along -X/+X, Space/ShiftLeft along +Y/-Y.
/// Held keys add up; opposing keys cancel. Only the camera position moves,
/// the look-at target stays where it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeFly {
    /// Units per second on the X/Z plane.
    pub horizontal_speed: f32,
    /// Units per second along Y.
    pub vertical_speed: f32,
}

impl FreeFly {
    pub fn new(horizontal_speed: f32, vertical_speed: f32) -> Self {
        Self {
            horizontal_speed,
            vertical_speed,
        }
    }

    /// True while any fly key is held, even if opposing keys cancel out.
    pub fn is_active(keys: &KeyState) -> bool {
        FLY_KEYS.iter().any(|&key| keys.is_held(key))
    }

    /// World-space displacement for this frame.
    pub fn displacement(&self, keys: &KeyState, dt: f32) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if keys.is_held(KeyCode::W) {
            dir.z -= self.horizontal_speed;
        }
        if keys.is_held(KeyCode::S) {
            dir.z += self.horizontal_speed;
        }
        if keys.is_held(KeyCode::A) {
            dir.x -= self.horizontal_speed;
        }
        if keys.is_held(KeyCode::D) {
            dir.x += self.horizontal_speed;
        }
        if keys.is_held(KeyCode::Space) {
            dir.y += self.vertical_speed;
        }
        if keys.is_held(KeyCode::ShiftLeft) {
            dir.y -= self.vertical_speed;
        }
        dir * dt.max(0.0)
    }

    pub fn apply(&self, camera: &mut Camera3D, keys: &KeyState, dt: f32) {
        camera.position += self.displacement(keys, dt);
    }
}

impl Default for FreeFly {
    fn default() -> Self {
        Self::new(100.0, 50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keys_no_motion() {
        let fly = FreeFly::default();
        assert_eq!(fly.displacement(&KeyState::new(), 0.5), Vec3::ZERO);
    }

    #[test]
    fn forward_moves_negative_z_at_speed() {
        let fly = FreeFly::default();
        let mut keys = KeyState::new();
        keys.press(KeyCode::W);
        let d = fly.displacement(&keys, 0.5);
        assert!((d.z + 50.0).abs() < 1e-5);
        assert_eq!(d.x, 0.0);
    }

    #[test]
    fn held_keys_are_additive() {
        let fly = FreeFly::default();
        let mut keys = KeyState::new();
        keys.press(KeyCode::D);
        keys.press(KeyCode::Space);
        keys.press(KeyCode::W);
        let d = fly.displacement(&keys, 1.0);
        assert_eq!(d, Vec3::new(100.0, 50.0, -100.0));

        keys.press(KeyCode::S);
        assert_eq!(fly.displacement(&keys, 1.0).z, 0.0);
    }

    #[test]
    fn active_while_any_fly_key_is_held() {
        let mut keys = KeyState::new();
        assert!(!FreeFly::is_active(&keys));
        keys.press(KeyCode::Other(13));
        assert!(!FreeFly::is_active(&keys));
        keys.press(KeyCode::W);
        keys.press(KeyCode::S);
        assert!(FreeFly::is_active(&keys));
        keys.release(KeyCode::W);
        keys.release(KeyCode::S);
        assert!(!FreeFly::is_active(&keys));
    }

    #[test]
    fn apply_leaves_target_alone() {
        let fly = FreeFly::default();
        let mut cam = Camera3D::new(Vec3::new(300.0, 150.0, 0.0), Vec3::ZERO);
        let mut keys = KeyState::new();
        keys.press(KeyCode::ShiftLeft);
        fly.apply(&mut cam, &keys, 0.1);
        assert!((cam.position.y - 145.0).abs() < 1e-4);
        assert_eq!(cam.target, Vec3::ZERO);
    }
}
