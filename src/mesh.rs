use std::path::Path;

use glam::Vec3;

use crate::backend::{BackendScene, Device, Geometry, GeometryId};
use crate::error::{RenderError, Result};
use crate::loaders::{self, MeshData};
use crate::math::AABB;

/// A triangle mesh registered with an intersection backend.
///
/// The object owns its geometry handle, which is released on drop. The
/// backend scene it was attached to stays owned by the caller.
#[derive(Debug)]
pub struct MeshObject<G> {
    geometry: G,
    id: GeometryId,
    aabb: AABB,
}

impl<G: Geometry> MeshObject<G> {
    /// Copies the buffers into backend storage and attaches the geometry to
    /// `scene`. The scene still has to be committed before it is queried.
    pub fn from_buffers<D>(
        device: &D,
        scene: &mut D::Scene,
        vertices: &[Vec3],
        faces: &[[u32; 3]],
    ) -> Result<Self>
    where
        D: Device<Geometry = G>,
    {
        if vertices.is_empty() {
            return Err(RenderError::EmptyMesh);
        }

        let geometry = device.new_geometry(vertices, faces)?;
        let id = scene.attach(&geometry)?;
        device.check()?;

        let aabb = AABB::from_points(geometry.vertices().iter().copied());

        Ok(Self { geometry, id, aabb })
    }

    pub fn from_mesh<D>(device: &D, scene: &mut D::Scene, mesh: &MeshData) -> Result<Self>
    where
        D: Device<Geometry = G>,
    {
        let vertices: Vec<Vec3> = mesh.vertices.iter().copied().map(Vec3::from_array).collect();
        Self::from_buffers(device, scene, &vertices, &mesh.faces)
    }

    /// Decodes `path` and registers the result.
    pub fn from_path<D>(device: &D, scene: &mut D::Scene, path: impl AsRef<Path>) -> Result<Self>
    where
        D: Device<Geometry = G>,
    {
        let mesh = loaders::load_mesh(path)?;
        Self::from_mesh(device, scene, &mesh)
    }

    pub fn geometry_id(&self) -> GeometryId {
        self.id
    }

    pub fn aabb(&self) -> &AABB {
        &self.aabb
    }

    pub fn vertices(&self) -> &[Vec3] {
        self.geometry.vertices()
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        self.geometry.faces()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn face_count(&self) -> usize {
        self.faces().len()
    }
}
