pub mod manifest;
pub mod registry;

pub use manifest::{AssetManifest, ModelDescriptor, SoundDescriptor};
pub use registry::{AssetRegistry, LoadState};
