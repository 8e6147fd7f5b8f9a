//! Mesh decoding. The renderer only ever sees [`MeshData`].

pub mod gltf;
pub mod obj;
pub mod ply;

use std::path::Path;

use crate::error::{RenderError, Result};

pub use self::gltf::load_gltf_mesh;
pub use self::obj::load_obj_mesh;
pub use self::ply::load_ply_mesh;

/// Decoded triangle mesh: positions plus index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl MeshData {
    pub fn new(vertices: Vec<[f32; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Appends `other`, rebasing its indices.
    pub fn append(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.faces
            .extend(other.faces.into_iter().map(|f| f.map(|i| i + base)));
    }
}

/// Decodes a mesh file, picking the decoder from the file extension.
///
/// A missing or unreadable file is reported as [`RenderError::Io`] carrying
/// the path.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();

    std::fs::metadata(path).map_err(|e| RenderError::io(path, e))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let mesh = match extension.as_deref() {
        Some("gltf") | Some("glb") => load_gltf_mesh(path)?,
        Some("obj") => load_obj_mesh(path)?,
        Some("ply") => load_ply_mesh(path)?,
        _ => {
            return Err(RenderError::parse(
                path,
                "unsupported mesh format (expected .ply, .gltf, .glb or .obj)",
            ))
        }
    };

    log::info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );

    Ok(mesh)
}
