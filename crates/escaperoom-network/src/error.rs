use std::net::SocketAddr;

use thiserror::Error;

/// Errors that can occur on the show-control link.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Failed to bind a UDP socket.
    #[error("Failed to bind to {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// A datagram could not be handed to the socket.
    #[error("Failed to send to {target}: {source}")]
    SendFailed {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Message encoding or decoding failed.
    #[error("Codec error: {0}")]
    Codec(#[from] escaperoom_core::Error),

    /// Low-level I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
