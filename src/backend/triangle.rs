use glam::Vec3;

use crate::math::Ray;

/// Result of triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleIntersection {
    pub t: f32,           // Distance along ray
    pub u: f32,           // Barycentric coordinate u
    pub v: f32,           // Barycentric coordinate v
}

/// Möller-Trumbore ray-triangle intersection, two-sided.
///
/// Accepts hits with `ray.near <= t <= far`.
pub fn moller_trumbore_intersect(
    ray: &Ray,
    far: f32,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleIntersection> {
    const EPSILON: f32 = 1e-8;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if t < ray.near || t > far {
        return None;
    }

    Some(TriangleIntersection { t, u, v })
}

/// Unnormalized geometric normal with counter-clockwise winding.
pub fn geometric_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0)
}
