//! Puzzle evaluation engine.
//!
//! Three puzzle variants share one state-machine shape ([`Puzzle`]):
//!
//! - [`BreakerMatch`]: toggle switches scored against a target position,
//!   with progress LEDs
//! - [`WireDefusal`]: cut the right wire, red/green feedback LEDs
//! - [`KeypadCode`]: enter a code with a limited number of strikes, gated
//!   by another puzzle
//!
//! Puzzles read sensors through [`InputPort`](escaperoom_hardware::InputPort),
//! drive indicators through [`LedSignal`](escaperoom_hardware::LedSignal) and
//! report terminal transitions through a
//! [`Messenger`](escaperoom_network::Messenger).

pub mod breaker;
pub mod config;
pub mod error;
pub mod keypad;
pub mod puzzle;
pub mod result;
pub mod wire;

pub use breaker::{BreakerMatch, progress_indicator};
pub use config::{
    BreakerConfig, BreakerPuzzleConfig, KeypadConfig, KeypadPuzzleConfig, WireConfig,
    WirePuzzleConfig, WireTimings,
};
pub use error::{PuzzleError, Result};
pub use keypad::KeypadCode;
pub use puzzle::{AnyPuzzle, Puzzle};
pub use result::{PuzzleEvent, PuzzleResult};
pub use wire::WireDefusal;
