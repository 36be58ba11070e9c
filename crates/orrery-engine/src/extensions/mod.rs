// extensions/mod.rs
//
// Optional animation helpers.
// Decoupled from core Entity/Scene; scenes opt in by owning these values.

pub mod easing;
pub mod smoothing;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec3, ease, ease_vec3};
pub use smoothing::{Smoothed, Smoothing, HALF_LIFE_MATCHING_60HZ};
pub use tween::{Lerp, Tween};
