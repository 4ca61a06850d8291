//! In-memory hardware backends.
//!
//! Used by tests across the workspace and by the controller binary when no
//! physical backend feature is enabled.

pub mod board;
pub mod keypad;

pub use board::MockBoard;
pub use keypad::MockKeypad;
