//! Inbound show-control receiver.
//!
//! # Architecture
//!
//! ```text
//! show control ──UDP──> OscServer ──> UdpFramed<OscCodec> ──> handler
//!                                          │
//!                                          └──> malformed datagram: warn, skip
//! ```
//!
//! One datagram is one message. A datagram that fails to decode is logged
//! and dropped; the next one is processed normally. Only the initial bind is
//! fatal.
//!
//! # Example Usage
//!
//! ```no_run
//! use escaperoom_network::{OscServer, OscServerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = OscServer::bind(OscServerConfig::default()).await?;
//! let cancel = CancellationToken::new();
//!
//! server
//!     .run(cancel, |message| println!("Received {}", message.address))
//!     .await;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;

use escaperoom_core::constants::DEFAULT_BIND_ADDR;
use escaperoom_protocol::{OscCodec, OscMessage};
use futures::StreamExt;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tokio_util::udp::UdpFramed;
use tracing::{debug, info, trace, warn};

use crate::error::NetworkError;

/// Configuration for [`OscServer`].
#[derive(Debug, Clone)]
pub struct OscServerConfig {
    /// Address to bind the receive socket to.
    pub bind_addr: SocketAddr,
}

impl Default for OscServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 10001))),
        }
    }
}

/// UDP receive loop for OSC messages.
pub struct OscServer {
    framed: UdpFramed<OscCodec>,
    local_addr: SocketAddr,
}

impl OscServer {
    /// Bind the receive socket.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BindFailed`] if the address cannot be bound
    /// (already in use, permission denied). The controller treats this as
    /// fatal.
    pub async fn bind(config: OscServerConfig) -> Result<Self, NetworkError> {
        let socket = UdpSocket::bind(config.bind_addr)
            .await
            .map_err(|source| NetworkError::BindFailed {
                addr: config.bind_addr,
                source,
            })?;
        let local_addr = socket.local_addr()?;

        info!(bind_addr = %local_addr, "OSC server listening");

        Ok(Self {
            framed: UdpFramed::new(socket, OscCodec::new()),
            local_addr,
        })
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the next well-formed message.
    ///
    /// Malformed datagrams are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket itself fails.
    pub async fn recv(&mut self) -> Result<(OscMessage, SocketAddr), NetworkError> {
        loop {
            match self.framed.next().await {
                Some(Ok((message, peer))) => {
                    trace!(address = %message.address, peer = %peer, "Received message");
                    return Ok((message, peer));
                }
                Some(Err(escaperoom_core::Error::Io(e))) => return Err(NetworkError::Io(e)),
                Some(Err(e)) => {
                    warn!(error = %e, "Dropping malformed datagram");
                }
                None => {
                    return Err(NetworkError::Io(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "receive stream ended",
                    )));
                }
            }
        }
    }

    /// Deliver every received message to `handler` until `cancel` fires.
    ///
    /// Socket errors are logged and the loop keeps receiving.
    pub async fn run<F>(mut self, cancel: CancellationToken, mut handler: F)
    where
        F: FnMut(OscMessage),
    {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(bind_addr = %self.local_addr, "OSC server stopping");
                    return;
                }
                received = self.recv() => match received {
                    Ok((message, _peer)) => handler(message),
                    Err(e) => warn!(error = %e, "OSC receive failed"),
                },
            }
        }
    }
}

impl std::fmt::Debug for OscServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OscServer")
            .field("local_addr", &self.local_addr)
            .finish()
    }
}
