#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use glam::Vec3;
use mirror_room::backend::{CpuDevice, CpuGeometry, CpuScene, Device, ErrorChannel};
use mirror_room::error::BackendError;
use mirror_room::RenderConfig;

/// CPU device that runs out of memory after a fixed number of geometries and
/// can have errors planted on its error channel.
pub struct FlakyDevice {
    inner: CpuDevice,
    remaining: AtomicUsize,
    errors: ErrorChannel,
}

impl FlakyDevice {
    pub fn failing_after(geometries: usize) -> Self {
        Self {
            inner: CpuDevice::new(),
            remaining: AtomicUsize::new(geometries),
            errors: ErrorChannel::default(),
        }
    }

    pub fn unlimited() -> Self {
        Self::failing_after(usize::MAX)
    }

    /// Parks `error` as if a query had reported it.
    pub fn report(&self, error: BackendError) {
        self.errors.report(error);
    }

    pub fn allow(&self, geometries: usize) {
        self.remaining.store(geometries, Ordering::SeqCst);
    }
}

impl Device for FlakyDevice {
    type Geometry = CpuGeometry;
    type Scene = CpuScene;

    fn new_geometry(
        &self,
        vertices: &[Vec3],
        faces: &[[u32; 3]],
    ) -> Result<CpuGeometry, BackendError> {
        let left = self.remaining.load(Ordering::SeqCst);
        if left == 0 {
            return Err(BackendError::OutOfMemory("geometry budget exhausted".into()));
        }
        self.remaining.store(left - 1, Ordering::SeqCst);
        self.inner.new_geometry(vertices, faces)
    }

    fn new_scene(&self) -> Result<CpuScene, BackendError> {
        self.inner.new_scene()
    }

    fn check(&self) -> Result<(), BackendError> {
        self.errors.check()?;
        self.inner.check()
    }
}

pub fn small_config() -> RenderConfig {
    RenderConfig {
        width: 16,
        height: 12,
        threads: Some(2),
        max_rays_per_second: 1e12,
        ..Default::default()
    }
}

/// Writes `contents` to a unique temporary file with the given extension.
pub fn temp_file(name: &str, extension: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "mirror-room-{name}-{}.{extension}",
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

pub const QUAD_OBJ: &str = "v 0 0 0\nv 2 0 0\nv 2 1 0\nv 0 1 0\nf 1 2 3 4\n";

pub const QUAD_PLY: &str = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
2 0 0
2 1 0
0 1 0
4 0 1 2 3
";
