use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use futures::channel::oneshot;

use super::gate::RenderGate;
use crate::backend::Device;
use crate::error::{RenderError, Result};
use crate::loaders;
use crate::scene::Scene;

/// Pending result of [`spawn_reload`].
pub struct ReloadHandle {
    receiver: oneshot::Receiver<Result<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ReloadHandle {
    /// Blocks until the reload finished.
    pub fn wait(mut self) -> Result<()> {
        let result = pollster::block_on(&mut self.receiver).unwrap_or(Err(RenderError::InvalidState(
            "reload task ended without a result",
        )));
        self.join();
        result
    }

    /// `None` while the reload is still running.
    pub fn poll_finished(&mut self) -> Option<Result<()>> {
        let result = match self.receiver.try_recv() {
            Ok(None) => return None,
            Ok(Some(result)) => result,
            Err(oneshot::Canceled) => Err(RenderError::InvalidState(
                "reload task ended without a result",
            )),
        };
        self.join();
        Some(result)
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("mesh reload thread panicked");
            }
        }
    }
}

/// Replaces the scene's main object with the mesh at `path` on a background
/// thread.
///
/// Rendering is paused for the whole reload. The file is decoded before the
/// scene lock is taken so frames in flight are not held up by the parser.
/// The gate is reopened only if the scene is renderable afterwards, whether
/// the reload succeeded or not. A decode failure leaves the scene as it was,
/// so an earlier failed rebuild still keeps rendering paused.
pub fn spawn_reload<D>(scene: Arc<Mutex<Scene<D>>>, gate: Arc<RenderGate>, path: PathBuf) -> ReloadHandle
where
    D: Device + 'static,
    D::Scene: 'static,
    D::Geometry: 'static,
{
    let (sender, receiver) = oneshot::channel();

    let thread = std::thread::spawn(move || {
        let result = reload(&scene, &gate, path);
        if let Err(e) = &result {
            log::warn!("mesh reload failed: {e}");
        }
        // The handle may have been dropped; nobody is waiting then.
        let _ = sender.send(result);
    });

    ReloadHandle {
        receiver,
        thread: Some(thread),
    }
}

fn reload<D: Device>(scene: &Mutex<Scene<D>>, gate: &RenderGate, path: PathBuf) -> Result<()> {
    gate.pause();

    let decoded = loaders::load_mesh(&path);

    let mut scene = scene
        .lock()
        .map_err(|_| RenderError::InvalidState("scene lock poisoned"))?;
    let result = decoded.and_then(|mesh| scene.set_main_mesh(&mesh));

    if scene.is_renderable() {
        gate.resume();
    }

    if result.is_ok() {
        log::info!("reloaded main object from {}", path.display());
    }
    result
}
