// extensions/tween.rs
//
// Time-driven transition between two values of any lerpable type.
// Decoupled from Entity/Scene: the owner reads `value()` and applies it.
//
// Usage:
//   let mut fade = Tween::new(0.0, 1.0, 3.0, Easing::QuadInOut);
//   let opacity = fade.tick(dt);

use glam::Vec3;
use super::easing::{lerp, lerp_vec3, Easing};

/// Values a tween can interpolate.
pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        lerp(a, b, t)
    }
}

impl Lerp for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        lerp_vec3(a, b, t)
    }
}

impl<A: Lerp, B: Lerp> Lerp for (A, B) {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        (A::lerp(a.0, b.0, t), B::lerp(a.1, b.1, t))
    }
}

/// A single one-way tween.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Value at the current progress.
    pub fn value(&self) -> T {
        self.value_at(self.progress())
    }

    /// Value at an arbitrary normalized progress.
    pub fn value_at(&self, t: f32) -> T {
        T::lerp(self.from, self.to, self.easing.apply(t))
    }

    /// Advance and return the new value.
    pub fn tick(&mut self, dt: f32) -> T {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration.max(0.0));
        self.value()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_tween_reaches_target() {
        let mut t = Tween::new(0.0_f32, 1.0, 3.0, Easing::QuadInOut);
        assert_eq!(t.value(), 0.0);
        t.tick(1.5);
        assert!((t.value() - 0.5).abs() < 1e-6);
        t.tick(10.0);
        assert!(t.is_complete());
        assert_eq!(t.value(), 1.0);
    }

    #[test]
    fn paired_tween_moves_both_halves() {
        let from = (Vec3::new(10.0, 3.0, -1.0), Vec3::ZERO);
        let to = (Vec3::new(-2.0, 8.0, -216.0), Vec3::new(0.0, 5.0, -200.0));
        let t = Tween::new(from, to, 1.0, Easing::QuadInOut);
        assert_eq!(t.value_at(0.0), from);
        assert_eq!(t.value_at(1.0), to);
    }

    #[test]
    fn zero_duration_is_complete() {
        let t = Tween::new(2.0_f32, 4.0, 0.0, Easing::Linear);
        assert!(t.is_complete());
        assert_eq!(t.value(), 4.0);
    }
}
