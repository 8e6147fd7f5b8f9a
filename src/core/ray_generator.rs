use glam::{UVec2, Vec3};

use crate::camera::Camera;
use crate::math::Ray;

/// Per-frame mapping from pixel coordinates to primary rays.
///
/// `direction(x, y) = normalize(x * coeff_x + y * coeff_y + coeff_z)`, with
/// pixel row 0 at the bottom of the image plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayBasis {
    pub origin: Vec3,
    pub coeff_x: Vec3,
    pub coeff_y: Vec3,
    pub coeff_z: Vec3,
}

impl RayBasis {
    pub fn new(camera: &Camera, size: UVec2) -> Self {
        // 0.4 rather than the textbook 0.5 * tan(fov / 2); kept for output
        // compatibility with existing renders.
        let fov_scale = 1.0 / (0.4 * camera.fov.to_radians()).tan();

        let forward = (camera.center - camera.position).normalize();
        let right = camera.up.cross(forward).normalize();
        let up = forward.cross(right).normalize();

        let (width, height) = (size.x as f32, size.y as f32);

        let coeff_x = right;
        let mut coeff_y = -up;
        let mut coeff_z = -0.5 * width * right + 0.5 * height * up + 0.5 * height * fov_scale * forward;

        // Flip y
        coeff_z += coeff_y * height;
        coeff_y = -coeff_y;

        Self {
            origin: camera.position,
            coeff_x,
            coeff_y,
            coeff_z,
        }
    }

    pub fn direction(&self, x: u32, y: u32) -> Vec3 {
        (self.coeff_x * x as f32 + self.coeff_y * y as f32 + self.coeff_z).normalize()
    }

    pub fn ray(&self, x: u32, y: u32) -> Ray {
        Ray::new(self.origin, self.direction(x, y))
    }
}

impl Default for RayBasis {
    fn default() -> Self {
        Self::new(&Camera::default(), UVec2::ONE)
    }
}
