use std::path::Path;

use super::MeshData;
use crate::error::{RenderError, Result};

/// Loads all models of a Wavefront OBJ file into one mesh. Polygons are
/// triangulated; materials are ignored.
pub fn load_obj_mesh(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();

    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| match e {
        tobj::LoadError::OpenFileFailed => RenderError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, e),
        ),
        other => RenderError::parse(path, other),
    })?;

    let mut mesh = MeshData::default();

    for model in models {
        let vertices = model
            .mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        let faces = model
            .mesh
            .indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();

        mesh.append(MeshData::new(vertices, faces));
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_triangulated_quad() {
        let path = std::env::temp_dir().join(format!("mirror-room-quad-{}.obj", std::process::id()));
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let mesh = load_obj_mesh(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert!(mesh.faces.iter().flatten().all(|&i| i < 4));
    }
}
