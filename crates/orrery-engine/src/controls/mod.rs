pub mod free_fly;
pub mod orbit;

pub use free_fly::FreeFly;
pub use orbit::{OrbitControls, OrbitSettings, ReturnToDefault, Spherical};

/// What is currently steering the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Key-driven free flight, no orbit target.
    Free,
    #[default]
    OrbitIdle,
    /// A pan/rotate/zoom gesture is in progress.
    OrbitUserDriven,
    /// Easing back to the default pose after the idle timeout.
    ReturningToDefault,
}
