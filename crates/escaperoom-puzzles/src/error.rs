//! Error types for puzzle evaluation.

use escaperoom_hardware::HardwareError;

/// Result type alias for puzzle operations.
pub type Result<T> = std::result::Result<T, PuzzleError>;

/// Errors that can occur while evaluating a puzzle.
///
/// Outbound send failures are not errors here; they are logged where they
/// happen and the transition stands.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    /// Reading a sensor or driving an indicator failed.
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    /// Static configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PuzzleError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
