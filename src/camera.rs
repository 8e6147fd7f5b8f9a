use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::AABB;

/// Look-at camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Field of view in degrees.
    pub fov: f32,
}

impl Camera {
    pub fn new(position: Vec3, center: Vec3, up: Vec3, fov: f32) -> Self {
        Self {
            position,
            center,
            up,
            fov,
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.center - self.position).normalize()
    }

    /// Rotates the position by `angle` radians about the +Z axis through
    /// `pivot`. The look-at center is left alone.
    pub fn orbit(&mut self, pivot: Vec3, angle: f32) {
        self.position = orbit_point(self.position, pivot, angle);
    }

    /// Places the camera half the largest extent off the box center along +Y,
    /// looking at the center with +Z up.
    pub fn frame(&mut self, bounds: &AABB) {
        let center = bounds.center();
        self.position = center + Vec3::new(0.0, bounds.max_extent() * 0.5, 0.0);
        self.center = center;
        self.up = Vec3::Z;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(1.5, 1.5, -1.5), Vec3::ZERO, Vec3::Y, 120.0)
    }
}

/// Rotation of `point` about the +Z axis through `pivot`.
pub(crate) fn orbit_point(point: Vec3, pivot: Vec3, angle: f32) -> Vec3 {
    Mat3::from_rotation_z(angle) * (point - pivot) + pivot
}
