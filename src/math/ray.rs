use glam::Vec3;

use super::AABB;

/// A ray segment `origin + t * direction` for `t` in `[near, far]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub near: f32,
    pub far: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    pub fn with_near(mut self, near: f32) -> Self {
        self.near = near;
        self
    }

    pub fn with_far(mut self, far: f32) -> Self {
        self.far = far;
        self
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Slab test against `bounds`, restricted to `[ray.near, far]`.
///
/// Returns the entry distance clamped to `ray.near`, or `None` when the
/// segment misses the box.
pub fn intersect_aabb(ray: &Ray, inv_dir: Vec3, bounds: &AABB, far: f32) -> Option<f32> {
    let t_min = (bounds.min - ray.origin) * inv_dir;
    let t_max = (bounds.max - ray.origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.max_element().max(ray.near);
    let t_far = t2.min_element().min(far);

    (t_near <= t_far).then_some(t_near)
}

/// Inverse direction with near-zero components clamped, so the slab test
/// never divides by zero.
pub fn inverse_direction(dir: Vec3) -> Vec3 {
    const EPSILON: f32 = 1e-8;

    let inv = |c: f32| {
        if c.abs() < EPSILON {
            1.0 / EPSILON.copysign(c)
        } else {
            1.0 / c
        }
    };

    Vec3::new(inv(dir.x), inv(dir.y), inv(dir.z))
}
