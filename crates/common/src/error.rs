//! Error types shared across eventcut crates.

use std::path::PathBuf;

/// Top-level error type for eventcut operations.
#[derive(Debug, thiserror::Error)]
pub enum EventcutError {
    #[error("No event metadata file found in {dir}")]
    MetadataNotFound { dir: PathBuf },

    #[error("Expected exactly one event metadata file in {dir} but found {count}")]
    AmbiguousMetadata { dir: PathBuf, count: usize },

    #[error("Invalid timespan {value:?}: expected HH:MM:SS")]
    Timespan { value: String },

    #[error("Timeline error: {message}")]
    Timeline { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using EventcutError.
pub type EventcutResult<T> = Result<T, EventcutError>;

impl EventcutError {
    pub fn timespan(value: impl Into<String>) -> Self {
        Self::Timespan {
            value: value.into(),
        }
    }

    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
