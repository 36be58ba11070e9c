pub mod camera;
pub mod frame;
pub mod instance;

pub use camera::Camera3D;
pub use frame::{CameraView, FrameDescription, LabelView};
pub use instance::{RenderBuffer, RenderInstance};
