//! Outbound notifications.
//!
//! Sends are fire-and-forget: a datagram is encoded and handed to the socket
//! with a non-blocking write. There is no retry and no delivery guarantee.

use std::net::SocketAddr;

use escaperoom_core::constants::{DEFAULT_TARGET_ADDR, MAX_PACKET_SIZE};
use escaperoom_protocol::{OscCodec, OscMessage};
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::error::NetworkError;

/// Sends addressed messages to the show-control system.
///
/// `send` must not block; it is called from puzzle workers.
pub trait Messenger: Send + Sync {
    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be encoded or the socket
    /// refuses the datagram. Callers log and move on.
    fn send(&self, message: OscMessage) -> Result<(), NetworkError>;
}

/// Configuration for [`UdpMessenger`].
#[derive(Debug, Clone)]
pub struct UdpMessengerConfig {
    /// Local address of the sending socket.
    pub bind_addr: SocketAddr,

    /// Destination of every datagram (usually a subnet broadcast address).
    pub target: SocketAddr,

    /// Enable `SO_BROADCAST` on the socket.
    pub broadcast: bool,
}

impl UdpMessengerConfig {
    /// Send from an ephemeral port to `target`.
    pub fn new(target: SocketAddr) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 0)),
            target,
            broadcast: false,
        }
    }

    pub fn with_broadcast(mut self, broadcast: bool) -> Self {
        self.broadcast = broadcast;
        self
    }
}

impl Default for UdpMessengerConfig {
    fn default() -> Self {
        let target = DEFAULT_TARGET_ADDR
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([255, 255, 255, 255], 10000)));
        Self::new(target).with_broadcast(true)
    }
}

/// [`Messenger`] over a UDP socket.
#[derive(Debug)]
pub struct UdpMessenger {
    socket: UdpSocket,
    target: SocketAddr,
    max_packet_size: usize,
}

impl UdpMessenger {
    /// Bind the sending socket.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BindFailed`] if the socket cannot be bound,
    /// or an I/O error if broadcast cannot be enabled.
    pub async fn bind(config: UdpMessengerConfig) -> Result<Self, NetworkError> {
        let socket = UdpSocket::bind(config.bind_addr)
            .await
            .map_err(|source| NetworkError::BindFailed {
                addr: config.bind_addr,
                source,
            })?;
        socket.set_broadcast(config.broadcast)?;

        info!(
            target_addr = %config.target,
            broadcast = config.broadcast,
            "UDP messenger ready"
        );

        Ok(Self {
            socket,
            target: config.target,
            max_packet_size: MAX_PACKET_SIZE,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        Ok(self.socket.local_addr()?)
    }
}

impl Messenger for UdpMessenger {
    fn send(&self, message: OscMessage) -> Result<(), NetworkError> {
        let address = message.address.clone();
        let packet = OscCodec::with_max_packet_size(self.max_packet_size).encode_to_vec(message)?;

        self.socket
            .try_send_to(&packet, self.target)
            .map_err(|source| NetworkError::SendFailed {
                target: self.target,
                source,
            })?;

        debug!(address = %address, target_addr = %self.target, bytes = packet.len(), "Sent message");
        Ok(())
    }
}
