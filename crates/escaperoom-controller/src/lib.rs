//! Escape-room puzzle controller.
//!
//! Ties the puzzles to hardware and to the show-control network:
//!
//! - [`ControllerConfig`]: TOML configuration with the installed room as
//!   default
//! - [`Dispatcher`]: one worker per puzzle, input and key forwarding, the
//!   keypad gate, and inbound message routing
//! - [`DoorLock`]: the vault door relay
//! - [`room::build`]: assembles all of the above
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use escaperoom_controller::{ControllerConfig, room};
//! use escaperoom_hardware::{MockBoard, MockKeypad};
//! use escaperoom_network::MockMessenger;
//!
//! # #[tokio::main]
//! # async fn main() -> escaperoom_controller::Result<()> {
//! let board = MockBoard::new();
//! let ports = room::Ports {
//!     input: Arc::new(board.clone()),
//!     output: Arc::new(board),
//!     keypad: Arc::new(MockKeypad::new()),
//! };
//!
//! let dispatcher = room::build(&ControllerConfig::default(), ports, Arc::new(MockMessenger::new()))?;
//! for status in dispatcher.results() {
//!     println!("{} (challenge {}): {}", status.name, status.challenge, status.result);
//! }
//! dispatcher.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod door;
pub mod error;
pub mod logging;
pub mod room;

pub use config::{ControllerConfig, DoorConfig, NetworkConfig};
pub use dispatcher::{Dispatcher, PuzzleId, PuzzleStatus, Router};
pub use door::DoorLock;
pub use error::{ControllerError, Result};
