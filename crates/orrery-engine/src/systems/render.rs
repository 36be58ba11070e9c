use crate::assets::registry::AssetRegistry;
use crate::components::mesh::MeshShape;
use crate::core::scene::Scene;
use crate::renderer::frame::LabelView;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from the scene.
/// Skips inactive and hidden entities, and model meshes whose asset has not
/// resolved yet (or failed): those render as nothing rather than as garbage.
pub fn build_render_buffer(scene: &Scene, assets: &AssetRegistry, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in scene.iter() {
        if !entity.active || !entity.visible {
            continue;
        }

        let mesh = match &entity.mesh {
            Some(m) => m,
            None => continue,
        };

        let params = match mesh.shape {
            MeshShape::Sphere { radius } => [radius, 0.0, 0.0],
            MeshShape::Ring { inner, outer } => [inner, outer, 0.0],
            MeshShape::OrbitPath { radius_x, radius_z, width } => [radius_x, radius_z, width],
            MeshShape::Model { asset, slot } => {
                if !assets.is_ready(asset) {
                    continue;
                }
                [asset as f32, slot as f32, 0.0]
            }
        };

        let instance = RenderInstance {
            position: entity.position.to_array(),
            rotation: entity.rotation.to_array(),
            scale: entity.scale,
            kind: mesh.shape.kind(),
            params,
            entity: entity.id.0 as f32,
            color: [mesh.color.r, mesh.color.g, mesh.color.b],
            opacity: mesh.opacity,
            emissive_color: [mesh.emissive_color.r, mesh.emissive_color.g, mesh.emissive_color.b],
            emissive: mesh.emissive,
            roughness: mesh.roughness,
            metalness: mesh.metalness,
            _pad: [0.0; 2],
        };

        if !buffer.push(instance) {
            log::warn!("render buffer full; dropping remaining instances");
            break;
        }
    }
}

/// Collect label state for the frame description.
pub fn collect_labels(scene: &Scene) -> Vec<LabelView> {
    scene
        .iter()
        .filter(|e| e.active)
        .filter_map(|e| {
            let label = e.label.as_ref()?;
            Some(LabelView {
                entity: e.id,
                text: label.text.clone(),
                position: e.position + label.offset,
                font_size: label.font_size,
                visible: label.visible && e.visible,
                orientation: label.orientation,
                render_order: label.render_order,
            })
        })
        .collect()
}
