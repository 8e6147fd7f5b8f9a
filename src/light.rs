use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::orbit_point;
use crate::math::AABB;

/// Point light. `specular` is carried but the integrator only uses the
/// ambient and diffuse terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Light {
    pub fn new(position: Vec3, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            position,
            ambient,
            diffuse,
            specular,
        }
    }

    pub fn orbit(&mut self, pivot: Vec3, angle: f32) {
        self.position = orbit_point(self.position, pivot, angle);
    }

    /// Moves the light one full extent off the box center along +Y.
    pub fn frame(&mut self, bounds: &AABB) {
        self.position = bounds.center() + Vec3::new(0.0, bounds.max_extent(), 0.0);
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(
            Vec3::new(1.5, 1.5, -1.5),
            Vec3::splat(0.3),
            Vec3::ONE,
            Vec3::ONE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_places_light_above_center() {
        let mut light = Light::default();
        light.frame(&AABB::new(Vec3::ZERO, Vec3::splat(2.0)));
        assert_eq!(light.position, Vec3::new(1.0, 3.0, 1.0));
        assert_eq!(light.ambient, Vec3::splat(0.3));
    }
}
