pub mod render;

pub use render::{build_render_buffer, collect_labels};
