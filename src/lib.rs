pub mod backend;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod light;
pub mod loaders;
pub mod math;
pub mod mesh;
pub mod output;
pub mod scene;
pub mod scenes;

pub use config::RenderConfig;
pub use error::{BackendError, RenderError, Result};
pub use scene::Scene;
