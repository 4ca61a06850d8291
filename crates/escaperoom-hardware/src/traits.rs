//! Hardware port trait definitions.
//!
//! These traits are the contract between the puzzle core and the GPIO /
//! keypad backends. Unlike device traits that poll with `async fn`, the
//! ports here are callback driven (interrupts arrive on the backend's own
//! threads) and their operations are short synchronous line accesses, so
//! every trait is object-safe and used as `Arc<dyn ...>`.

use std::sync::Arc;

use escaperoom_core::PinId;
use serde::{Deserialize, Serialize};

use crate::error::{HardwareError, Result};

/// Receives debounced edge notifications for one input line.
///
/// Called from the backend's interrupt context. Implementations must not
/// block; they hand the notification off and return.
pub trait InputChangeListener: Send + Sync {
    fn on_input_change(&self, pin: PinId);
}

/// Digital input lines.
pub trait InputPort: Send + Sync {
    /// Current level of the line (`true` = high).
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be read.
    fn read(&self, pin: PinId) -> Result<bool>;

    /// Register a listener fired on both edges of `pin`.
    ///
    /// Repeated edges inside the debounce window are conflated by the
    /// backend, but listeners must still tolerate duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if edge detection cannot be enabled for the line.
    fn subscribe(&self, pin: PinId, listener: Arc<dyn InputChangeListener>) -> Result<()>;
}

/// Digital output lines.
pub trait OutputPort: Send + Sync {
    /// Drive `pin` high (`true`) or low.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be written.
    fn write(&self, pin: PinId, level: bool) -> Result<()>;
}

/// Key on the 3x4 matrix keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeypadInput {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Star key (*), used as the clear key.
    Star,

    /// Hash/pound key (#).
    Hash,
}

impl KeypadInput {
    /// Create a digit input.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit is greater than 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use escaperoom_hardware::KeypadInput;
    ///
    /// let input = KeypadInput::digit(5).unwrap();
    /// assert_eq!(input.as_digit(), Some(5));
    ///
    /// assert!(KeypadInput::digit(10).is_err());
    /// ```
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(HardwareError::invalid_data(format!(
                "Digit must be 0-9, got {}",
                d
            )));
        }
        Ok(Self::Digit(d))
    }

    /// Map a key label from the matrix layout.
    ///
    /// # Errors
    ///
    /// Returns an error for characters not printed on the keypad.
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '*' => Ok(Self::Star),
            '#' => Ok(Self::Hash),
            _ => c
                .to_digit(10)
                .map(|d| Self::Digit(d as u8))
                .ok_or_else(|| {
                    HardwareError::invalid_data(format!("Key '{c}' is not on the keypad"))
                }),
        }
    }

    /// Key label as printed on the keypad.
    pub fn as_char(&self) -> char {
        match self {
            Self::Digit(d) => char::from(b'0' + d),
            Self::Star => '*',
            Self::Hash => '#',
        }
    }

    /// Check if this input clears the entry buffer.
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Star)
    }

    /// Get the digit value if this is a digit input.
    pub fn as_digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

/// Receives key presses from a keypad scanner.
pub trait KeyPressListener: Send + Sync {
    fn on_key_press(&self, key: KeypadInput);
}

/// Matrix keypad scanner.
///
/// Scanning rows and columns is the backend's job; the core only sees one
/// [`KeypadInput`] per physical press.
pub trait KeypadPort: Send + Sync {
    /// Register a listener for key presses.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner is not available.
    fn subscribe(&self, listener: Arc<dyn KeyPressListener>) -> Result<()>;
}
