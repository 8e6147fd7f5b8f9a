//! Intersection backend seam.
//!
//! The renderer never intersects triangles itself. It registers geometry with
//! a [`Device`], attaches it to a [`BackendScene`], commits, and then issues
//! nearest-hit and occlusion queries. Any backend providing these four
//! capabilities can drive a [`Scene`](crate::scene::Scene); [`cpu`] is the
//! bundled reference implementation.

pub mod bvh;
pub mod cpu;
pub mod triangle;

use std::sync::Mutex;

use glam::Vec3;

use crate::error::BackendError;
use crate::math::Ray;

pub use cpu::{CpuDevice, CpuGeometry, CpuScene};

/// Scene-scoped geometry identifier, dense and starting at 0.
pub type GeometryId = u32;

/// Nearest-hit query result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray direction.
    pub distance: f32,
    pub geometry: GeometryId,
    /// Geometric normal `(v1 - v0) x (v2 - v0)`, not normalized.
    pub normal: Vec3,
}

/// Registered triangle geometry. Dropping the handle releases it.
pub trait Geometry: Send + Sync {
    fn vertices(&self) -> &[Vec3];
    fn faces(&self) -> &[[u32; 3]];
}

pub trait Device: Send + Sync {
    type Geometry: Geometry;
    type Scene: BackendScene<Geometry = Self::Geometry>;

    /// Copies the buffers into backend-owned storage.
    fn new_geometry(
        &self,
        vertices: &[Vec3],
        faces: &[[u32; 3]],
    ) -> Result<Self::Geometry, BackendError>;

    fn new_scene(&self) -> Result<Self::Scene, BackendError>;

    /// Drains the device error channel.
    fn check(&self) -> Result<(), BackendError>;
}

pub trait BackendScene: Send + Sync {
    type Geometry;

    /// Registers geometry and returns its id. Invalidates a previous commit.
    fn attach(&mut self, geometry: &Self::Geometry) -> Result<GeometryId, BackendError>;

    /// Freezes the registered geometry for querying.
    fn commit(&mut self) -> Result<(), BackendError>;

    fn is_committed(&self) -> bool;

    fn intersect(&self, ray: &Ray) -> Option<Hit>;

    fn occluded(&self, ray: &Ray) -> bool;
}

/// First-error-wins slot shared between a device and its scenes.
///
/// Queries cannot fail, so misuse during a query is parked here and surfaces
/// at the next [`Device::check`].
#[derive(Debug, Default)]
pub struct ErrorChannel {
    pending: Mutex<Option<BackendError>>,
}

impl ErrorChannel {
    pub fn report(&self, error: BackendError) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if pending.is_none() {
            log::error!("backend: {error}");
            *pending = Some(error);
        }
    }

    pub fn take(&self) -> Option<BackendError> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    pub fn check(&self) -> Result<(), BackendError> {
        self.take().map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_channel_keeps_first_error() {
        let channel = ErrorChannel::default();
        channel.report(BackendError::InvalidOperation("first".into()));
        channel.report(BackendError::InvalidArgument("second".into()));

        assert_eq!(
            channel.check(),
            Err(BackendError::InvalidOperation("first".into()))
        );
        assert_eq!(channel.check(), Ok(()));
    }
}
