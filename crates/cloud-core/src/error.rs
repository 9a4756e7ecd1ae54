use crate::config::ValueRange;
use thiserror::Error;

/// Why an animation instance could not be attached to its container.
#[derive(Debug, Error)]
pub enum AttachError {
    #[error("2d drawing context not supported: {0}")]
    UnsupportedContext(String),
    #[error("failed to mount drawing surface: {0}")]
    Mount(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("drop_count must be at least 1")]
    DropCount,
    #[error("point_count must be at least 3, got {0}")]
    PointCount(usize),
    #[error("both palettes need at least one color")]
    EmptyPalette,
    #[error("{0} range is invalid: {1:?}")]
    Range(&'static str, ValueRange),
    #[error("{0} is out of bounds: {1}")]
    Value(&'static str, f64),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}
