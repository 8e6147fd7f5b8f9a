// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::RenderConfig;
use crate::error::Result;

#[derive(Parser, Debug, Clone)]
#[command(name = "mirror-room")]
#[command(about = "Ray traces a mesh inside a mirrored room", long_about = None)]
pub struct Cli {
    /// Mesh to place in the room (.ply, .gltf, .glb or .obj); a unit cube if omitted
    #[arg(long)]
    pub mesh: Option<PathBuf>,

    /// JSON render configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Frames to render before exiting
    #[arg(long, default_value_t = 300)]
    pub frames: u64,

    /// Target frame rate
    #[arg(long, default_value_t = 60.0)]
    pub fps: f32,

    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Write the last frame to this PNG file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log filter, e.g. `info` or `mirror_room=debug`
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Loads the configuration file, if any, and applies command-line
    /// overrides on top.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_json_file(path)?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }

        config.validate()?;
        Ok(config)
    }
}
