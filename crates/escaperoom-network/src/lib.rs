//! Network layer for the show-control link.
//!
//! Messages travel as OSC packets in UDP datagrams, encoded by
//! [`OscCodec`](escaperoom_protocol::OscCodec).
//!
//! # Components
//!
//! - **Messenger** / **UdpMessenger**: fire-and-forget outbound notifications,
//!   usually to a subnet broadcast address
//! - **OscServer**: inbound receive loop feeding the dispatcher
//! - **MockMessenger**: records sent messages for tests
//!
//! # Example
//!
//! ```no_run
//! use escaperoom_network::{Messenger, UdpMessenger, UdpMessengerConfig};
//! use escaperoom_protocol::OscMessage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = UdpMessengerConfig::new("10.100.20.255:10000".parse()?).with_broadcast(true);
//! let messenger = UdpMessenger::bind(config).await?;
//! messenger.send(OscMessage::with_int("/escaperoom/challenge/1/success", 1))?;
//! # Ok(())
//! # }
//! ```

mod error;
mod messenger;
mod mock;
mod server;

pub use error::NetworkError;
pub use messenger::{Messenger, UdpMessenger, UdpMessengerConfig};
pub use mock::MockMessenger;
pub use server::{OscServer, OscServerConfig};
