//! Error types for hardware operations.
//!
//! Covers line access failures on the GPIO backend and keypad input errors.

use escaperoom_core::PinId;

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Backend is not connected or has been shut down.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Line was never configured by the backend.
    #[error("Pin not configured: {pin}")]
    UnknownPin { pin: PinId },

    /// Line is already claimed by another owner.
    #[error("Pin already in use: {pin}")]
    PinInUse { pin: PinId },

    /// Writing a line failed.
    #[error("Write to {pin} failed: {message}")]
    WriteFailed { pin: PinId, message: String },

    /// Reading a line failed.
    #[error("Read from {pin} failed: {message}")]
    ReadFailed { pin: PinId, message: String },

    /// Invalid data received from device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Operation is not supported by this backend.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new write failure.
    pub fn write_failed(pin: PinId, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            pin,
            message: message.into(),
        }
    }

    /// Create a new read failure.
    pub fn read_failed(pin: PinId, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            pin,
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(n: u8) -> PinId {
        PinId::new(n).unwrap()
    }

    #[test]
    fn test_write_failed_error() {
        let error = HardwareError::write_failed(pin(19), "line busy");
        assert!(matches!(error, HardwareError::WriteFailed { .. }));
        assert_eq!(error.to_string(), "Write to GPIO19 failed: line busy");
    }

    #[test]
    fn test_unknown_pin_error() {
        let error = HardwareError::UnknownPin { pin: pin(5) };
        assert_eq!(error.to_string(), "Pin not configured: GPIO5");
    }

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("keypad");
        assert_eq!(error.to_string(), "Device disconnected: keypad");
    }

    #[test]
    fn test_invalid_data_error() {
        let error = HardwareError::invalid_data("Key 'x' is not on the keypad");
        assert_eq!(error.to_string(), "Invalid data: Key 'x' is not on the keypad");
    }
}
