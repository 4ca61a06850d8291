//! Controller configuration stored in a TOML file.
//!
//! Every section is optional; a missing section or field takes the value of
//! the single-board room. That layout keeps the breaker panel on its
//! installed lines and moves the wire bundle, its LEDs and the door relay
//! onto free lines:
//!
//! ```text
//! breaker inputs  4 14 17 18 22 23 9 25 11 8 6 12    LEDs 19 16 26
//! wire inputs     27 10 13 5 7(cut) 3                LEDs red 20 21, green 24
//! door relay      2
//! ```
//!
//! A minimal file that only moves the network ports:
//!
//! ```toml
//! [network]
//! bind_addr = "0.0.0.0:9001"
//! target_addr = "192.168.1.255:9000"
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

use escaperoom_core::PinId;
use escaperoom_core::constants::{DEFAULT_BIND_ADDR, DEFAULT_TARGET_ADDR};
use escaperoom_puzzles::{BreakerPuzzleConfig, KeypadPuzzleConfig, WireConfig, WirePuzzleConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ControllerError, Result};

/// Show-control link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Where inbound resets and door commands are received.
    pub bind_addr: SocketAddr,

    /// Where outbound notifications are sent.
    pub target_addr: SocketAddr,

    /// Enable broadcast on the sending socket.
    pub broadcast: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 10001))),
            target_addr: DEFAULT_TARGET_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([10, 100, 20, 255], 10000))),
            broadcast: true,
        }
    }
}

/// Electromagnetic door relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    pub pin: PinId,

    /// Level that releases the door; locking drives the opposite level.
    pub unlock_level: bool,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            pin: PinId::bcm(2),
            unlock_level: true,
        }
    }
}

/// Complete controller configuration (TOML).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub network: NetworkConfig,
    pub door: DoorConfig,
    pub breaker: BreakerPuzzleConfig,
    pub wire: WirePuzzleConfig,
    pub keypad: KeypadPuzzleConfig,

    /// Pending events per puzzle before input changes are dropped.
    pub queue_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            door: DoorConfig::default(),
            breaker: BreakerPuzzleConfig::default(),
            wire: single_board_wire(),
            keypad: KeypadPuzzleConfig::default(),
            queue_capacity: 16,
        }
    }
}

/// Wire puzzle moved off the breaker panel's lines.
fn single_board_wire() -> WirePuzzleConfig {
    const WIRING: [(u8, bool); 6] = [
        (27, false),
        (10, false),
        (13, false),
        (5, false),
        (7, true),
        (3, false),
    ];

    WirePuzzleConfig {
        wires: WIRING
            .iter()
            .map(|&(pin, needs_cutting)| WireConfig {
                pin: PinId::bcm(pin),
                needs_cutting,
            })
            .collect(),
        red_leds: [PinId::bcm(20), PinId::bcm(21)],
        green_led: PinId::bcm(24),
        ..WirePuzzleConfig::default()
    }
}

impl ControllerConfig {
    /// Load config from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed. The result is
    /// not validated; call [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ControllerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// # Errors
    /// Returns the first problem found: an invalid puzzle section, a zero
    /// queue capacity, or a line claimed twice. Every line has one owner:
    /// an input belongs to one puzzle and is never driven as an output.
    pub fn validate(&self) -> Result<()> {
        self.breaker.validate()?;
        self.wire.validate()?;
        self.keypad.keypad.validate()?;

        if self.queue_capacity == 0 {
            return Err(ControllerError::invalid_config("queue_capacity must be > 0"));
        }

        let inputs = self
            .breaker
            .breakers
            .iter()
            .map(|b| (b.pin, "breaker input"))
            .chain(self.wire.wires.iter().map(|w| (w.pin, "wire input")));
        let outputs = self
            .breaker
            .leds
            .iter()
            .map(|&pin| (pin, "breaker LED"))
            .chain(self.wire.red_leds.iter().map(|&pin| (pin, "wire red LED")))
            .chain(std::iter::once((self.wire.green_led, "wire green LED")))
            .chain(std::iter::once((self.door.pin, "door relay")));

        let mut owners: HashMap<PinId, &str> = HashMap::new();
        for (pin, owner) in inputs.chain(outputs) {
            if let Some(previous) = owners.insert(pin, owner) {
                return Err(ControllerError::invalid_config(format!(
                    "{pin} is claimed by both {previous} and {owner}"
                )));
            }
        }
        Ok(())
    }
}
