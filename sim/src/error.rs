//! Errors raised while building a scene.
//!
//! The navigation core itself never fails; only loading and validating scene
//! descriptions can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("obstacle {index} is invalid: {reason}")]
    InvalidObstacle { index: usize, reason: String },

    #[error("agent {name:?} is invalid: {reason}")]
    InvalidAgent { name: String, reason: String },
}

pub type SceneResult<T> = Result<T, SceneError>;
