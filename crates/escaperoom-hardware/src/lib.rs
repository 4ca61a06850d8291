//! Hardware abstraction layer for the escape-room puzzle controller.
//!
//! This crate defines the ports the puzzles talk to and the status LED
//! driver built on top of them:
//!
//! - [`InputPort`] / [`OutputPort`]: digital GPIO lines addressed by
//!   [`PinId`](escaperoom_core::PinId), with edge notifications delivered to
//!   an [`InputChangeListener`].
//! - [`KeypadPort`]: a scanned 3x4 matrix keypad delivering
//!   [`KeypadInput`] presses to a [`KeyPressListener`].
//! - [`LedSignal`]: one status LED that is off, on, or flashing in a
//!   background task.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use escaperoom_core::PinId;
//! use escaperoom_hardware::{IndicatorState, LedSignal, MockBoard};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> escaperoom_hardware::Result<()> {
//! let board = MockBoard::new();
//! let pin = PinId::new(19).unwrap();
//! let mut led = LedSignal::new(pin, Arc::new(board.clone()));
//!
//! led.apply(IndicatorState::flashing(Duration::from_millis(200))).await?;
//! led.apply(IndicatorState::On).await?;
//! assert_eq!(board.output(pin), Some(true));
//! # Ok(())
//! # }
//! ```
//!
//! # Mock Implementations
//!
//! [`MockBoard`] and [`MockKeypad`] are in-memory backends used by the tests
//! and by the controller when built without a physical backend feature.

pub mod error;
pub mod led;
pub mod mock;
pub mod traits;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use led::{IndicatorState, LedSignal};
pub use mock::{MockBoard, MockKeypad};
pub use traits::{
    InputChangeListener, InputPort, KeyPressListener, KeypadInput, KeypadPort, OutputPort,
};
