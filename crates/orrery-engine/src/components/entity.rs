use glam::Vec3;
use crate::api::types::EntityId;
use crate::components::label::LabelComponent;
use crate::components::mesh::MeshComponent;

/// Fat Entity: a single struct with optional components.
/// Simplicity over ECS purity: bodies, rings, orbit paths and labels all
/// live in the same flat list.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Inactive entities are skipped by every system.
    pub active: bool,
    /// Hidden entities keep updating but are not rendered.
    pub visible: bool,
    /// Position in world space.
    pub position: Vec3,
    /// Euler rotation in radians (x, y, z).
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
    pub mesh: Option<MeshComponent>,
    pub label: Option<LabelComponent>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            visible: true,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            mesh: None,
            label: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_label(mut self, label: LabelComponent) -> Self {
        self.label = Some(label);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}
