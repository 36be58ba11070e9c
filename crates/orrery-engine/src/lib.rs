pub mod api;
pub mod assets;
pub mod audio;
pub mod components;
pub mod controls;
pub mod core;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{CursorStyle, EntityId, GameEvent, SoundId};
pub use assets::{AssetManifest, AssetRegistry, LoadState};
pub use audio::{AudioCommand, AudioQueue};
pub use components::entity::Entity;
pub use components::label::LabelComponent;
pub use components::mesh::{Color, MeshComponent, MeshShape};
pub use controls::{CameraMode, FreeFly, OrbitControls, OrbitSettings, ReturnToDefault};
pub use core::scene::Scene;
pub use core::time::{FixedTimestep, FrameClock, FrameGate};
pub use core::timer::{Timer, TimerId, TimerQueue};
pub use input::{InputBus, InputChannel, InputEvent, KeyCode, KeyState, Subscription};
pub use renderer::{Camera3D, FrameDescription, LabelView, RenderBuffer, RenderInstance};
pub use systems::render::{build_render_buffer, collect_labels};

// Extensions: decoupled optional helpers
pub use extensions::{Easing, Lerp, Smoothed, Smoothing, Tween, ease, ease_vec3, lerp, lerp_vec3};
