use std::path::Path;

use glam::{Mat4, Vec3};

use super::MeshData;
use crate::error::{RenderError, Result};

/// Loads every triangle primitive of a glTF file into one mesh, with node
/// transforms baked into the positions.
pub fn load_gltf_mesh(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();

    let (document, buffers, _images) = gltf::import(path).map_err(|e| match e {
        gltf::Error::Io(source) => RenderError::io(path, source),
        other => RenderError::parse(path, other),
    })?;

    log::debug!(
        "glTF {}: {} scenes, {} nodes, {} meshes",
        path.display(),
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count()
    );

    let mut mesh = MeshData::default();

    for scene in document.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut mesh)
                .map_err(|message| RenderError::parse(path, message))?;
        }
    }

    Ok(mesh)
}

/// Recursively processes glTF nodes
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    mesh: &mut MeshData,
) -> std::result::Result<(), String> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(gltf_mesh) = node.mesh() {
        process_mesh(&gltf_mesh, buffers, &global_transform, mesh)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, mesh)?;
    }

    Ok(())
}

fn process_mesh(
    gltf_mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    mesh: &mut MeshData,
) -> std::result::Result<(), String> {
    for primitive in gltf_mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                gltf_mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions = reader
            .read_positions()
            .ok_or_else(|| format!("mesh {:?} has a primitive without positions", gltf_mesh.name()))?;

        let vertices: Vec<[f32; 3]> = positions
            .map(|p| transform.transform_point3(Vec3::from_array(p)).to_array())
            .collect();

        // Non-indexed primitives are plain triangle lists
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };

        let faces = indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();

        mesh.append(MeshData::new(vertices, faces));
    }

    Ok(())
}
