use std::sync::Arc;

use glam::Vec3;

use super::bvh::{BVHNode, BVHPrimitive};
use super::triangle::{geometric_normal, moller_trumbore_intersect};
use super::{BackendScene, Device, ErrorChannel, Geometry, GeometryId, Hit};
use crate::error::BackendError;
use crate::math::{inverse_direction, Ray, AABB};

/// Reference backend: a BVH over all attached triangles, rebuilt on commit.
#[derive(Debug, Default)]
pub struct CpuDevice {
    errors: Arc<ErrorChannel>,
}

impl CpuDevice {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
struct GeometryData {
    vertices: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
}

/// Shared handle to backend-owned vertex and index buffers.
#[derive(Debug, Clone)]
pub struct CpuGeometry {
    data: Arc<GeometryData>,
}

impl Geometry for CpuGeometry {
    fn vertices(&self) -> &[Vec3] {
        &self.data.vertices
    }

    fn faces(&self) -> &[[u32; 3]] {
        &self.data.faces
    }
}

impl Device for CpuDevice {
    type Geometry = CpuGeometry;
    type Scene = CpuScene;

    fn new_geometry(
        &self,
        vertices: &[Vec3],
        faces: &[[u32; 3]],
    ) -> Result<CpuGeometry, BackendError> {
        let vertex_count = vertices.len();
        if let Some(face) = faces
            .iter()
            .find(|face| face.iter().any(|&i| i as usize >= vertex_count))
        {
            return Err(BackendError::InvalidArgument(format!(
                "face {face:?} references a vertex outside 0..{vertex_count}"
            )));
        }
        if let Some(v) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(BackendError::InvalidArgument(format!(
                "non-finite vertex {v}"
            )));
        }

        Ok(CpuGeometry {
            data: Arc::new(GeometryData {
                vertices: vertices.to_vec(),
                faces: faces.to_vec(),
            }),
        })
    }

    fn new_scene(&self) -> Result<CpuScene, BackendError> {
        Ok(CpuScene {
            errors: Arc::clone(&self.errors),
            geometries: Vec::new(),
            committed: None,
        })
    }

    fn check(&self) -> Result<(), BackendError> {
        self.errors.check()
    }
}

/// One triangle of the committed scene, in world space.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    geometry: GeometryId,
}

impl BVHPrimitive for Triangle {
    fn bounds(&self) -> AABB {
        AABB::from_points([self.v0, self.v1, self.v2])
    }
}

#[derive(Debug)]
struct Committed {
    triangles: Vec<Triangle>,
    bvh: Option<BVHNode>,
}

#[derive(Debug)]
pub struct CpuScene {
    errors: Arc<ErrorChannel>,
    geometries: Vec<CpuGeometry>,
    committed: Option<Committed>,
}

impl CpuScene {
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.committed.as_ref().map_or(0, |c| c.triangles.len())
    }

    fn committed(&self, query: &str) -> Option<&Committed> {
        if self.committed.is_none() {
            self.errors.report(BackendError::InvalidOperation(format!(
                "{query} issued against an uncommitted scene"
            )));
        }
        self.committed.as_ref()
    }
}

impl BackendScene for CpuScene {
    type Geometry = CpuGeometry;

    fn attach(&mut self, geometry: &CpuGeometry) -> Result<GeometryId, BackendError> {
        let id = GeometryId::try_from(self.geometries.len()).map_err(|_| {
            BackendError::OutOfMemory("geometry id space exhausted".to_string())
        })?;
        self.geometries.push(geometry.clone());
        self.committed = None;
        Ok(id)
    }

    fn commit(&mut self) -> Result<(), BackendError> {
        let triangles: Vec<Triangle> = self
            .geometries
            .iter()
            .zip(0..)
            .flat_map(|(geometry, id)| {
                let vertices = geometry.vertices();
                geometry.faces().iter().map(move |&[a, b, c]| Triangle {
                    v0: vertices[a as usize],
                    v1: vertices[b as usize],
                    v2: vertices[c as usize],
                    geometry: id,
                })
            })
            .collect();

        let bvh = BVHNode::build(&triangles);
        if let Some(stats) = bvh.as_ref().map(BVHNode::stats) {
            log::debug!(
                "committed {} triangles: {} nodes, {} leaves, depth {}, {:.1} per leaf",
                triangles.len(),
                stats.num_nodes,
                stats.num_leaves,
                stats.max_depth,
                stats.avg_leaf_size
            );
        }

        self.committed = Some(Committed { triangles, bvh });
        Ok(())
    }

    fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let committed = self.committed("intersect")?;
        let bvh = committed.bvh.as_ref()?;
        let inv_dir = inverse_direction(ray.direction);

        let (index, distance) = bvh.closest(ray, inv_dir, |idx, far| {
            let tri = &committed.triangles[idx as usize];
            moller_trumbore_intersect(ray, far, tri.v0, tri.v1, tri.v2).map(|hit| hit.t)
        })?;

        let tri = &committed.triangles[index as usize];
        Some(Hit {
            distance,
            geometry: tri.geometry,
            normal: geometric_normal(tri.v0, tri.v1, tri.v2),
        })
    }

    fn occluded(&self, ray: &Ray) -> bool {
        let Some(committed) = self.committed("occluded") else {
            return false;
        };
        let Some(bvh) = committed.bvh.as_ref() else {
            return false;
        };
        let inv_dir = inverse_direction(ray.direction);

        bvh.any(ray, inv_dir, |idx| {
            let tri = &committed.triangles[idx as usize];
            moller_trumbore_intersect(ray, ray.far, tri.v0, tri.v1, tri.v2).is_some()
        })
    }
}
