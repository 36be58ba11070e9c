use glam::{Quat, Vec3};

/// Text drawn next to an entity, billboarded toward the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelComponent {
    pub text: String,
    /// World-space font size.
    pub font_size: f32,
    pub visible: bool,
    /// Offset from the owning entity's position.
    pub offset: Vec3,
    pub orientation: Quat,
    /// Higher values draw on top.
    pub render_order: i32,
}

impl LabelComponent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 7.0,
            visible: true,
            offset: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            render_order: 1,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_render_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }
}
