use glam::{Vec3, Vec4};

use super::tiles::RayCounter;
use super::RayBasis;
use crate::backend::{BackendScene, GeometryId};
use crate::config::MAX_REFLECTION_DEPTH;
use crate::light::Light;
use crate::math::Ray;

/// Start offset for every ray leaving a surface or the camera.
pub const RAY_NEAR: f32 = 0.01;
/// Light contribution kept when the shadow ray is blocked.
pub const SHADOW_FACTOR: f32 = 0.3;
/// Falloff per main-object extent of light distance.
pub const ATTENUATION_FACTOR: f32 = 0.3;
/// Weight of the mirror bounce.
pub const REFLECTION_WEIGHT: f32 = 0.6;

/// Background written when there is nothing to render.
pub const EMPTY_PIXEL: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// Flat colors of the three scene objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub main: Vec3,
    pub room: Vec3,
    pub mirror: Vec3,
}

/// Geometry ids of the three scene objects in their backend scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectIds {
    pub main: GeometryId,
    pub room: GeometryId,
    pub mirror: GeometryId,
}

/// Direct lighting with dimmed shadows plus a single mirror bounce.
pub struct Integrator<'a, S> {
    pub scene: &'a S,
    pub lights: &'a [Light],
    pub ids: ObjectIds,
    pub palette: Palette,
    /// Largest extent of the main object, the unit for light attenuation.
    pub max_extent: f32,
}

impl<'a, S: BackendScene> Integrator<'a, S> {
    pub fn shade_pixel(&self, basis: &RayBasis, x: u32, y: u32, counter: &mut RayCounter) -> Vec4 {
        let primary = basis.ray(x, y);
        self.trace(primary.origin, primary.direction, 0, counter)
            .extend(1.0)
    }

    /// Color seen along `direction` from `origin`. Black on a miss.
    pub fn trace(&self, origin: Vec3, direction: Vec3, depth: u32, counter: &mut RayCounter) -> Vec3 {
        let ray = Ray::new(origin, direction).with_near(RAY_NEAR);
        let hit = self.scene.intersect(&ray);
        counter.add();

        let Some(hit) = hit else {
            return Vec3::ZERO;
        };

        let position = ray.at(hit.distance);
        let normal = hit.normal.normalize();
        let object_color = self.object_color(hit.geometry);

        let mut color = Vec3::ZERO;
        for light in self.lights {
            color += self.direct(position, normal, object_color, light, counter);
        }

        if hit.geometry == self.ids.mirror && depth < MAX_REFLECTION_DEPTH {
            let reflected = reflect(direction, normal);
            color += REFLECTION_WEIGHT * self.trace(position, reflected, depth + 1, counter);
        }

        color
    }

    fn direct(
        &self,
        position: Vec3,
        normal: Vec3,
        object_color: Vec3,
        light: &Light,
        counter: &mut RayCounter,
    ) -> Vec3 {
        let to_light = (light.position - position).normalize();
        let lambertian = normal.dot(to_light).max(0.0);

        let distance = position.distance(light.position);
        let attenuation = 1.0 / (1.0 + distance / self.max_extent * ATTENUATION_FACTOR);

        let color = (light.ambient + lambertian * light.diffuse) * object_color * attenuation;

        let shadow = Ray::new(position, to_light)
            .with_near(RAY_NEAR)
            .with_far(distance);
        let occluded = self.scene.occluded(&shadow);
        counter.add();

        if occluded {
            color * SHADOW_FACTOR
        } else {
            color
        }
    }

    /// Unknown ids shade white.
    fn object_color(&self, id: GeometryId) -> Vec3 {
        match id {
            id if id == self.ids.main => self.palette.main,
            id if id == self.ids.room => self.palette.room,
            id if id == self.ids.mirror => self.palette.mirror,
            _ => Vec3::ONE,
        }
    }
}

/// Mirror `incident` about the unit `normal`.
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reflect_flips_normal_component() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn reflect_keeps_length() {
        let d = Vec3::new(0.3, -0.8, 0.52).normalize();
        let n = Vec3::new(1.0, 2.0, -0.5).normalize();
        assert_relative_eq!(reflect(d, n).length(), 1.0, epsilon = 1e-6);
    }
}
