use crate::address::Address;
use escaperoom_core::constants::NOTIFY_VALUE;
use serde::{Deserialize, Serialize};

/// Single OSC argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OscArg {
    /// 32-bit big-endian integer (`i`).
    Int(i32),
    /// 32-bit big-endian IEEE float (`f`).
    Float(f32),
    /// NUL-terminated, 4-byte padded string (`s`).
    Str(String),
}

impl OscArg {
    /// OSC type tag for this argument.
    pub fn type_tag(&self) -> char {
        match self {
            OscArg::Int(_) => 'i',
            OscArg::Float(_) => 'f',
            OscArg::Str(_) => 's',
        }
    }
}

/// Parsed OSC message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscMessage {
    pub address: String,
    pub args: Vec<OscArg>,
}

impl OscMessage {
    pub fn new(address: impl Into<String>, args: Vec<OscArg>) -> Self {
        OscMessage {
            address: address.into(),
            args,
        }
    }

    /// Message with an integer payload.
    pub fn with_int(address: impl Into<String>, value: i32) -> Self {
        Self::new(address, vec![OscArg::Int(value)])
    }

    /// Outbound notification: the address with the conventional `1` payload.
    pub fn notify(address: Address) -> Self {
        Self::with_int(address.to_string(), NOTIFY_VALUE)
    }

    /// Parse the address into a known route.
    pub fn route(&self) -> escaperoom_core::Result<Address> {
        self.address.parse()
    }
}
