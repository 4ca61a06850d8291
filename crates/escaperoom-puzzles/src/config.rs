//! Static puzzle configuration.
//!
//! Every struct here is built once at startup (usually deserialized from the
//! controller's TOML file) and never mutated afterwards. `Default` mirrors
//! the installed room.

use std::time::Duration;

use escaperoom_core::{ChallengeId, PinId};
use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};

/// One toggle switch and the position it must be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerConfig {
    pub pin: PinId,
    pub expected_on: bool,
}

/// One wire and whether it is the one to cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireConfig {
    pub pin: PinId,
    pub needs_cutting: bool,
}

/// Secret code and how many wrong entries are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypadConfig {
    pub code: String,
    pub max_strikes: u32,
}

impl KeypadConfig {
    /// Check that the code is non-empty, digits only, and strikes are allowed.
    ///
    /// # Errors
    /// Returns `PuzzleError::InvalidConfig` describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.code.is_empty() {
            return Err(PuzzleError::invalid_config("keypad code is empty"));
        }
        if !self.code.chars().all(|c| c.is_ascii_digit()) {
            return Err(PuzzleError::invalid_config(format!(
                "keypad code must be digits only, got '{}'",
                self.code
            )));
        }
        if self.max_strikes == 0 {
            return Err(PuzzleError::invalid_config("max_strikes must be at least 1"));
        }
        Ok(())
    }
}

fn default_flash_interval_ms() -> u64 {
    200
}

/// Breaker panel: toggles scored against a target, three progress LEDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerPuzzleConfig {
    pub challenge: ChallengeId,
    pub breakers: Vec<BreakerConfig>,
    pub leds: Vec<PinId>,
    #[serde(default = "default_flash_interval_ms")]
    pub flash_interval_ms: u64,
}

impl BreakerPuzzleConfig {
    pub fn flash_interval(&self) -> Duration {
        Duration::from_millis(self.flash_interval_ms)
    }

    /// Counter value that solves the panel.
    pub fn success_target(&self) -> i32 {
        self.breakers.iter().filter(|b| b.expected_on).count() as i32
    }

    /// # Errors
    /// Returns `PuzzleError::InvalidConfig` for an unsolvable panel or a
    /// zero flash interval.
    pub fn validate(&self) -> Result<()> {
        if self.success_target() == 0 {
            return Err(PuzzleError::invalid_config(
                "breaker panel needs at least one breaker expected on",
            ));
        }
        if self.flash_interval_ms == 0 {
            return Err(PuzzleError::invalid_config("breaker flash interval is zero"));
        }
        Ok(())
    }
}

impl Default for BreakerPuzzleConfig {
    fn default() -> Self {
        const WIRING: [(u8, bool); 12] = [
            (4, true),
            (14, false),
            (17, false),
            (18, false),
            (22, true),
            (23, true),
            (9, false),
            (25, true),
            (11, false),
            (8, false),
            (6, true),
            (12, true),
        ];

        Self {
            challenge: ChallengeId::fixed(1),
            breakers: WIRING
                .iter()
                .map(|&(pin, expected_on)| BreakerConfig {
                    pin: PinId::bcm(pin),
                    expected_on,
                })
                .collect(),
            leds: vec![PinId::bcm(19), PinId::bcm(16), PinId::bcm(26)],
            flash_interval_ms: default_flash_interval_ms(),
        }
    }
}

/// Indicator timings for the wire puzzle, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireTimings {
    /// Idle flash interval of both reds.
    pub idle_interval_ms: u64,
    /// Phase offset of the second red while idle.
    pub idle_offset_ms: u64,
    /// Failure flash interval of the first red.
    pub failure_interval_ms: u64,
    /// Failure flash interval of the second red.
    pub failure_alt_interval_ms: u64,
}

impl Default for WireTimings {
    fn default() -> Self {
        Self {
            idle_interval_ms: 150,
            idle_offset_ms: 80,
            failure_interval_ms: 50,
            failure_alt_interval_ms: 60,
        }
    }
}

/// Wire bundle: cut the right one, two red LEDs and one green.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePuzzleConfig {
    pub challenge: ChallengeId,
    pub wires: Vec<WireConfig>,
    pub red_leds: [PinId; 2],
    pub green_led: PinId,
    #[serde(default)]
    pub timings: WireTimings,
}

impl WirePuzzleConfig {
    /// # Errors
    /// Returns `PuzzleError::InvalidConfig` unless exactly one wire must be
    /// cut, or for a zero flash interval.
    pub fn validate(&self) -> Result<()> {
        let targets = self.wires.iter().filter(|w| w.needs_cutting).count();
        if targets != 1 {
            return Err(PuzzleError::invalid_config(format!(
                "wire bundle needs exactly one wire to cut, found {targets}"
            )));
        }

        let t = &self.timings;
        if t.idle_interval_ms == 0 || t.failure_interval_ms == 0 || t.failure_alt_interval_ms == 0
        {
            return Err(PuzzleError::invalid_config("wire flash interval is zero"));
        }
        Ok(())
    }
}

impl Default for WirePuzzleConfig {
    fn default() -> Self {
        const WIRING: [(u8, bool); 6] = [
            (17, false),
            (27, false),
            (22, false),
            (10, false),
            (9, true),
            (11, false),
        ];

        Self {
            challenge: ChallengeId::fixed(4),
            wires: WIRING
                .iter()
                .map(|&(pin, needs_cutting)| WireConfig {
                    pin: PinId::bcm(pin),
                    needs_cutting,
                })
                .collect(),
            red_leds: [PinId::bcm(23), PinId::bcm(24)],
            green_led: PinId::bcm(25),
            timings: WireTimings::default(),
        }
    }
}

/// Code entry gated behind the wire puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypadPuzzleConfig {
    pub challenge: ChallengeId,
    #[serde(flatten)]
    pub keypad: KeypadConfig,
}

impl Default for KeypadPuzzleConfig {
    fn default() -> Self {
        Self {
            challenge: ChallengeId::fixed(4),
            keypad: KeypadConfig {
                code: "8140".to_string(),
                max_strikes: 3,
            },
        }
    }
}
