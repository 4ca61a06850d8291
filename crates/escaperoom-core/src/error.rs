use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Protocol errors
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    #[error("Unsupported argument type tag: {0:?}")]
    UnsupportedTypeTag(char),

    #[error("Packet too large: {size} bytes (max {max_size})")]
    PacketTooLarge { size: usize, max_size: usize },

    // Identifier validation
    #[error("Invalid pin: {0}")]
    InvalidPin(String),

    #[error("Invalid challenge id: {0}")]
    InvalidChallenge(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
