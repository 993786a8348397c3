//! Error types for the simulation and its scene scripting.
//!
//! Every variant is a configuration or scripting mistake. None of them are
//! retryable, so callers are expected to surface them rather than recover.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("launch target y={target_y} is not below the ball (y={ball_y})")]
    TargetNotBelow { target_y: f32, ball_y: f32 },

    #[error("launch target y={target_y} is never reached from y={start_y} with gravity {gravity}")]
    UnreachableTarget {
        start_y: f32,
        target_y: f32,
        gravity: f32,
    },

    #[error("entity name \"{0}\" already exists")]
    DuplicateName(String),

    #[error("entity base name must not be empty")]
    EmptyBaseName,

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("unknown prompt index {index} (scene has {count} prompts)")]
    UnknownPrompt { index: usize, count: usize },

    #[error("JSON parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
