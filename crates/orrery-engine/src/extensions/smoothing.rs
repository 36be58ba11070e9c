// extensions/smoothing.rs
//
// Single-pole low-pass used for hover feedback:
//   current += (target - current) * factor
// `PerFrame` applies a fixed factor per call, tying the feel to the display
// refresh rate. `HalfLife` derives the factor from dt so the response is
// the same at 60 Hz and 144 Hz.

use serde::{Deserialize, Serialize};

/// Half-life that reproduces a 0.1 per-frame factor at 60 Hz:
/// ln(0.5) / (60 * ln(0.9)).
pub const HALF_LIFE_MATCHING_60HZ: f32 = 0.109_647;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Smoothing {
    /// Fixed fraction of the remaining distance per update.
    PerFrame(f32),
    /// Seconds for the remaining distance to halve.
    HalfLife(f32),
}

impl Smoothing {
    /// Fraction of the remaining distance to cover this update, in [0, 1].
    pub fn factor(&self, dt: f32) -> f32 {
        let f = match *self {
            Smoothing::PerFrame(k) => k,
            Smoothing::HalfLife(h) if h <= 0.0 => 1.0,
            Smoothing::HalfLife(h) => 1.0 - 0.5_f32.powf(dt.max(0.0) / h),
        };
        f.clamp(0.0, 1.0)
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::HalfLife(HALF_LIFE_MATCHING_60HZ)
    }
}

/// A scalar that chases a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed {
    pub current: f32,
    pub target: f32,
}

impl Smoothed {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Move `current` toward `target`; never passes it.
    pub fn step(&mut self, smoothing: Smoothing, dt: f32) -> f32 {
        self.current += (self.target - self.current) * smoothing.factor(dt);
        self.current
    }

    pub fn is_settled(&self, tolerance: f32) -> bool {
        (self.target - self.current).abs() <= tolerance
    }
}
