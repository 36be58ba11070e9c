use serde::{Deserialize, Serialize};

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Geometry a mesh entity is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    Sphere { radius: f32 },
    /// Flat annulus in the entity's local XZ plane.
    Ring { inner: f32, outer: f32 },
    /// Ellipse outline centred on the entity's position.
    OrbitPath { radius_x: f32, radius_z: f32, width: f32 },
    /// Loaded model; `slot` selects a named sub-mesh / material slot.
    Model { asset: u32, slot: u32 },
}

impl MeshShape {
    /// Numeric discriminant written into the render buffer.
    pub fn kind(&self) -> f32 {
        match self {
            MeshShape::Sphere { .. } => 0.0,
            MeshShape::Ring { .. } => 1.0,
            MeshShape::OrbitPath { .. } => 2.0,
            MeshShape::Model { .. } => 3.0,
        }
    }
}

/// Standard-material mesh component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub shape: MeshShape,
    pub color: Color,
    /// Emissive intensity; values above 1 push into HDR.
    pub emissive: f32,
    pub emissive_color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self {
            shape: MeshShape::Sphere { radius: 1.0 },
            color: Color::default(),
            emissive: 0.0,
            emissive_color: Color::BLACK,
            roughness: 0.5,
            metalness: 0.5,
            opacity: 1.0,
        }
    }
}

impl MeshComponent {
    pub fn new(shape: MeshShape, color: Color) -> Self {
        Self {
            shape,
            color,
            ..Default::default()
        }
    }

    pub fn with_emissive(mut self, color: Color, intensity: f32) -> Self {
        self.emissive_color = color;
        self.emissive = intensity;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}
