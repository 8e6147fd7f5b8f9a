use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by an intersection backend, either directly from a call
/// or drained from the device error channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("[INVALID_ARGUMENT] {0}")]
    InvalidArgument(String),

    #[error("[INVALID_OPERATION] {0}")]
    InvalidOperation(String),

    #[error("[OUT_OF_MEMORY] {0}")]
    OutOfMemory(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to write image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("mesh has no vertices")]
    EmptyMesh,

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
