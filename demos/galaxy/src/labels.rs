/// Label policy: visibility and font size from camera distance, plus
/// billboard orientation.

use glam::{EulerRot, Quat, Vec3};
use serde::Deserialize;
use crate::bodies::BodyClass;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelPolicy {
    pub base_size: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Upper bound for the star, which must stay legible at any zoom.
    pub star_max_size: f32,
    /// Below this distance labels shrink.
    pub near_distance: f32,
    /// Above this distance labels grow.
    pub far_distance: f32,
    /// Floor of the shrink factor.
    pub min_scale: f32,
    pub inner_hide_distance: f32,
    pub outer_hide_distance: f32,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            base_size: 7.0,
            min_size: 3.0,
            max_size: 300.0,
            star_max_size: 10_000.0,
            near_distance: 50.0,
            far_distance: 500.0,
            min_scale: 0.3,
            inner_hide_distance: 1569.0,
            outer_hide_distance: 4800.0,
        }
    }
}

/// Outcome for one label this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelDecision {
    pub visible: bool,
    pub font_size: f32,
}

impl LabelPolicy {
    pub fn is_visible(&self, class: BodyClass, distance: f32) -> bool {
        match class {
            BodyClass::Star => true,
            BodyClass::InnerPlanet => distance <= self.inner_hide_distance,
            BodyClass::OuterPlanet => distance <= self.outer_hide_distance,
            BodyClass::Moon => true,
        }
    }

    pub fn scale_factor(&self, distance: f32) -> f32 {
        if distance < self.near_distance {
            self.min_scale.max(distance / self.near_distance)
        } else if distance > self.far_distance {
            1.0 + (distance - self.far_distance) / self.far_distance
        } else {
            1.0
        }
    }

    pub fn font_size(&self, class: BodyClass, distance: f32) -> f32 {
        let max = if class == BodyClass::Star {
            self.star_max_size
        } else {
            self.max_size
        };
        (self.base_size * self.scale_factor(distance)).clamp(self.min_size, max)
    }

    /// Hidden labels keep their last size; the host skips them anyway.
    pub fn decide(&self, class: BodyClass, distance: f32, last_size: f32) -> LabelDecision {
        if !self.is_visible(class, distance) {
            return LabelDecision {
                visible: false,
                font_size: last_size,
            };
        }
        LabelDecision {
            visible: true,
            font_size: self.font_size(class, distance),
        }
    }
}

/// Rotation that points a label's +Z at the camera (yaw, then pitch).
pub fn billboard(label_position: Vec3, camera_position: Vec3) -> Quat {
    let dir = (camera_position - label_position).normalize_or_zero();
    if dir == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let yaw = dir.x.atan2(dir.z);
    let pitch = -dir.y.clamp(-1.0, 1.0).asin();
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}
