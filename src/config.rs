use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{RenderError, Result};
use crate::light::Light;

/// Mirror bounces are limited to one; not configurable.
pub const MAX_REFLECTION_DEPTH: u32 = 1;

/// Renderer settings. Every field has a default, so a JSON file only needs
/// the keys it wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Throughput cap enforced by the governor, in rays per second.
    pub max_rays_per_second: f64,
    /// Governor sleep between rate checks, in microseconds.
    pub throttle_interval_us: u64,
    /// Room half-size relative to the main object's largest extent.
    pub room_scale: f32,
    pub main_color: Vec3,
    pub room_color: Vec3,
    pub mirror_color: Vec3,
    pub camera: Camera,
    pub lights: Vec<Light>,
    /// Per-frame orbit angles in radians.
    pub camera_step: f32,
    pub light_step: f32,
    /// Worker count; `None` uses the available hardware concurrency.
    pub threads: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            tile_width: 8,
            tile_height: 8,
            max_rays_per_second: 24.5e6,
            throttle_interval_us: 500,
            room_scale: 1.5,
            main_color: Vec3::new(0.8, 0.8, 1.0),
            room_color: Vec3::ONE,
            mirror_color: Vec3::new(0.6, 0.6, 0.7),
            camera: Camera::default(),
            lights: vec![Light::default()],
            camera_step: -0.01,
            light_step: -0.03,
            threads: None,
        }
    }
}

impl RenderConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RenderError::io(path, e))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| RenderError::parse(path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(RenderError::Config(format!(
                "tile size must be non-zero, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if !(self.max_rays_per_second.is_finite() && self.max_rays_per_second > 0.0) {
            return Err(RenderError::Config(format!(
                "max_rays_per_second must be positive, got {}",
                self.max_rays_per_second
            )));
        }
        if !(self.room_scale > 0.0) {
            return Err(RenderError::Config(format!(
                "room_scale must be positive, got {}",
                self.room_scale
            )));
        }
        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(RenderError::Config(format!(
                "camera fov must be in (0, 180) degrees, got {}",
                self.camera.fov
            )));
        }
        if self.lights.is_empty() {
            return Err(RenderError::Config("at least one light is required".into()));
        }
        if self.threads == Some(0) {
            return Err(RenderError::Config("threads must be at least 1".into()));
        }
        Ok(())
    }
}
