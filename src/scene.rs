use std::path::Path;
use std::time::{Duration, Instant};

use glam::{UVec2, Vec3};

use crate::backend::{BackendScene, CpuDevice, Device};
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::core::{
    FrameReport, Integrator, ObjectIds, Palette, RayBasis, ThroughputGovernor, TileScheduler,
    EMPTY_PIXEL,
};
use crate::error::{RenderError, Result};
use crate::light::Light;
use crate::loaders::MeshData;
use crate::mesh::MeshObject;
use crate::scenes::{mirror_mesh, room_mesh};

/// The three objects of a loaded scene, all attached to one backend scene.
#[derive(Debug)]
pub struct SceneObjects<G> {
    pub main: MeshObject<G>,
    pub room: MeshObject<G>,
    pub mirror: MeshObject<G>,
}

impl<G: crate::backend::Geometry> SceneObjects<G> {
    fn ids(&self) -> ObjectIds {
        ObjectIds {
            main: self.main.geometry_id(),
            room: self.room.geometry_id(),
            mirror: self.mirror.geometry_id(),
        }
    }
}

/// A main object inside a procedural room with a mirrored wall, plus the
/// camera, lights and pixel buffer used to render it.
///
/// `render` takes `&mut self`, so a scene shared with a mutating task has to
/// live behind a lock; see [`RenderGate`](crate::core::RenderGate) for the
/// pause protocol around long rebuilds.
pub struct Scene<D: Device = CpuDevice> {
    device: D,
    backend: Option<D::Scene>,
    objects: Option<SceneObjects<D::Geometry>>,
    rebuild_failed: bool,

    camera: Camera,
    lights: Vec<Light>,
    basis: RayBasis,

    pixels: Vec<f32>,
    size: UVec2,
    rays_per_second: f64,

    scheduler: TileScheduler,
    governor: ThroughputGovernor,

    palette: Palette,
    room_scale: f32,
    camera_step: f32,
    light_step: f32,
}

impl Scene<CpuDevice> {
    /// Scene on the bundled CPU backend.
    pub fn new(config: RenderConfig) -> Result<Self> {
        Self::with_device(CpuDevice::new(), config)
    }
}

impl<D: Device> Scene<D> {
    pub fn with_device(device: D, config: RenderConfig) -> Result<Self> {
        config.validate()?;

        let backend = device.new_scene()?;
        let scheduler = TileScheduler::new(
            UVec2::new(config.tile_width, config.tile_height),
            config.threads,
        )?;
        let governor = ThroughputGovernor::new(
            config.max_rays_per_second,
            Duration::from_micros(config.throttle_interval_us),
        );

        let mut scene = Self {
            device,
            backend: Some(backend),
            objects: None,
            rebuild_failed: false,
            camera: config.camera,
            lights: config.lights,
            basis: RayBasis::default(),
            pixels: Vec::new(),
            size: UVec2::ZERO,
            rays_per_second: 0.0,
            scheduler,
            governor,
            palette: Palette {
                main: config.main_color,
                room: config.room_color,
                mirror: config.mirror_color,
            },
            room_scale: config.room_scale,
            camera_step: config.camera_step,
            light_step: config.light_step,
        };
        scene.set_size(UVec2::new(config.width, config.height));

        Ok(scene)
    }

    /// Replaces the main object with the mesh at `path` and rebuilds the room
    /// around it.
    ///
    /// Must not overlap with [`render`](Self::render). On failure the scene
    /// is left without objects and refuses to render until a later call
    /// succeeds.
    pub fn set_main_object(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.rebuild(|device, backend| MeshObject::from_path(device, backend, path))?;
        log::info!("main object set from {}", path.display());
        Ok(())
    }

    /// Same as [`set_main_object`](Self::set_main_object) for an already
    /// decoded mesh. An empty mesh is rejected before the scene is touched.
    pub fn set_main_mesh(&mut self, mesh: &MeshData) -> Result<()> {
        if mesh.is_empty() {
            return Err(RenderError::EmptyMesh);
        }
        self.rebuild(|device, backend| MeshObject::from_mesh(device, backend, mesh))
    }

    fn rebuild<F>(&mut self, load_main: F) -> Result<()>
    where
        F: FnOnce(&D, &mut D::Scene) -> Result<MeshObject<D::Geometry>>,
    {
        // Objects are released before the backend scene they are attached to.
        self.objects = None;
        self.backend = None;
        self.rebuild_failed = true;

        let mut backend = self.device.new_scene()?;

        let main = load_main(&self.device, &mut backend)?;
        let bounds = *main.aabb();
        let room = MeshObject::from_mesh(
            &self.device,
            &mut backend,
            &room_mesh(&bounds, self.room_scale),
        )?;
        let mirror = MeshObject::from_mesh(
            &self.device,
            &mut backend,
            &mirror_mesh(&bounds, self.room_scale),
        )?;

        backend.commit()?;
        self.device.check()?;

        log::info!(
            "scene rebuilt: main {} vertices / {} triangles, room {} triangles, mirror {} triangles",
            main.vertex_count(),
            main.face_count(),
            room.face_count(),
            mirror.face_count()
        );

        self.backend = Some(backend);
        self.objects = Some(SceneObjects { main, room, mirror });
        self.rebuild_failed = false;

        self.reset_view()
    }

    /// Frames the camera and the first light around the main object.
    pub fn reset_view(&mut self) -> Result<()> {
        let bounds = *self
            .objects
            .as_ref()
            .ok_or(RenderError::InvalidState("no main object set"))?
            .main
            .aabb();

        self.camera.frame(&bounds);
        if let Some(light) = self.lights.first_mut() {
            light.frame(&bounds);
        }
        Ok(())
    }

    /// Resizes the pixel buffer, filling it with opaque white. Same size is a
    /// no-op.
    pub fn set_size(&mut self, size: UVec2) {
        if size == self.size {
            return;
        }

        self.size = size;
        self.pixels = vec![1.0; size.x as usize * size.y as usize * 4];
    }

    /// Renders one frame into the pixel buffer and throttles to the
    /// configured ray budget.
    pub fn render(&mut self) -> Result<FrameReport> {
        if self.rebuild_failed {
            return Err(RenderError::InvalidState(
                "last scene rebuild failed; set a main object before rendering",
            ));
        }

        let frame_start = Instant::now();

        self.animate();
        self.basis = RayBasis::new(&self.camera, self.size);

        let total_rays = match (&self.objects, &self.backend) {
            (Some(objects), Some(backend)) => {
                let integrator = Integrator {
                    scene: backend,
                    lights: &self.lights,
                    ids: objects.ids(),
                    palette: self.palette,
                    max_extent: objects.main.aabb().max_extent(),
                };
                let basis = self.basis;

                self.scheduler
                    .render(&mut self.pixels, self.size, |x, y, counter| {
                        integrator.shade_pixel(&basis, x, y, counter)
                    })
            }
            _ => self
                .scheduler
                .render(&mut self.pixels, self.size, |_, _, _| EMPTY_PIXEL),
        };

        self.device.check()?;

        let report = self.governor.finish(frame_start, total_rays);
        self.rays_per_second = report.rays_per_second;
        Ok(report)
    }

    fn animate(&mut self) {
        let Some(objects) = &self.objects else {
            return;
        };
        let pivot = objects.main.aabb().center();

        self.camera.orbit(pivot, self.camera_step);
        for light in &mut self.lights {
            light.orbit(pivot, self.light_step);
        }
    }

    /// RGBA floats, row-major, `size.x * size.y * 4` long. Values are not
    /// clamped.
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Throttled throughput of the last frame.
    pub fn rays_per_second(&self) -> f64 {
        self.rays_per_second
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn basis(&self) -> &RayBasis {
        &self.basis
    }

    pub fn main_object(&self) -> Option<&MeshObject<D::Geometry>> {
        self.objects.as_ref().map(|o| &o.main)
    }

    pub fn room_object(&self) -> Option<&MeshObject<D::Geometry>> {
        self.objects.as_ref().map(|o| &o.room)
    }

    pub fn mirror_object(&self) -> Option<&MeshObject<D::Geometry>> {
        self.objects.as_ref().map(|o| &o.mirror)
    }

    pub fn has_objects(&self) -> bool {
        self.objects.is_some()
    }

    /// False after a failed rebuild.
    pub fn is_renderable(&self) -> bool {
        !self.rebuild_failed
    }

    pub fn workers(&self) -> usize {
        self.scheduler.workers()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Committed backend scene, if any.
    pub fn backend(&self) -> Option<&D::Scene> {
        self.backend.as_ref().filter(|b| b.is_committed())
    }

    pub fn room_scale(&self) -> f32 {
        self.room_scale
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Center of the main object, or the origin when there is none.
    pub fn pivot(&self) -> Vec3 {
        self.main_object()
            .map_or(Vec3::ZERO, |main| main.aabb().center())
    }
}
