use std::sync::{Arc, Mutex, TryLockError};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use mirror_room::cli::Cli;
use mirror_room::core::{spawn_reload, FrameClock, FrameStats, RenderGate, Throttled};
use mirror_room::loaders::MeshData;
use mirror_room::output;
use mirror_room::scene::Scene;

const STATUS_INTERVAL: f32 = 1.0;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .parse_filters(&cli.log_level)
        .init();

    let config = cli.render_config().context("invalid render configuration")?;
    let scene = Arc::new(Mutex::new(
        Scene::new(config).context("failed to create scene")?,
    ));
    let gate = Arc::new(RenderGate::default());

    let mut reload = match &cli.mesh {
        Some(path) => Some(spawn_reload(Arc::clone(&scene), Arc::clone(&gate), path.clone())),
        None => {
            scene
                .lock()
                .map_err(|_| anyhow!("scene lock poisoned"))?
                .set_main_mesh(&MeshData::cube())
                .context("failed to load built-in cube")?;
            None
        }
    };

    let mut clock = FrameClock::new(cli.fps);
    let mut stats = FrameStats::new();
    let mut status = Throttled::new(STATUS_INTERVAL);
    let mut rendered = 0;

    while rendered < cli.frames {
        let tick = clock.wait_next();

        if let Some(result) = reload.as_mut().and_then(|handle| handle.poll_finished()) {
            result.context("failed to load mesh")?;
            reload = None;
        }

        if !gate.is_open() {
            continue;
        }

        let mut scene = match scene.try_lock() {
            Ok(scene) => scene,
            Err(TryLockError::WouldBlock) => continue,
            Err(TryLockError::Poisoned(_)) => return Err(anyhow!("scene lock poisoned")),
        };

        let report = scene.render().context("render failed")?;
        rendered += 1;

        stats.record_frame(tick.delta, report.rays_per_second, scene.size());
        if status.try_tick(tick.delta) {
            log::info!("{}", stats.status_line());
        }
    }

    if let Some(handle) = reload {
        handle.wait().context("failed to load mesh")?;
    }

    if let Some(path) = &cli.output {
        let scene = scene.lock().map_err(|_| anyhow!("scene lock poisoned"))?;
        output::save_png(path, scene.pixels(), scene.size())
            .with_context(|| format!("failed to save {}", path.display()))?;
    }

    log::info!("rendered {rendered} frames, last {}", stats.status_line());
    Ok(())
}
