//! Error types for controller assembly and configuration.

use std::path::PathBuf;

use escaperoom_hardware::HardwareError;
use escaperoom_network::NetworkError;
use escaperoom_puzzles::PuzzleError;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Config file could not be read.
    #[error("Failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ControllerConfig`](crate::ControllerConfig).
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config parsed but describes an unusable room.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl ControllerError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
