use crate::{
    Result,
    constants::{MAX_BCM_PIN, MAX_CHALLENGE_ID, MIN_CHALLENGE_ID},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Digital line identifier (BCM numbering).
///
/// The core only references pins; configuring the line is the job of the
/// hardware backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PinId(u8);

impl PinId {
    /// Create a new pin id with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidPin` if the line number is above the highest BCM line.
    pub fn new(pin: u8) -> Result<Self> {
        if pin > MAX_BCM_PIN {
            return Err(Error::InvalidPin(format!(
                "BCM line must be 0-{MAX_BCM_PIN}, got {pin}"
            )));
        }
        Ok(PinId(pin))
    }

    /// Const constructor for fixed wiring tables.
    ///
    /// # Panics
    /// Panics if the line is above the highest BCM line. In a `const` item
    /// this is a compile error.
    #[must_use]
    pub const fn bcm(pin: u8) -> Self {
        assert!(pin <= MAX_BCM_PIN, "BCM line out of range");
        PinId(pin)
    }

    /// Get the raw line number.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PinId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        PinId::new(value)
    }
}

impl From<PinId> for u8 {
    fn from(pin: PinId) -> Self {
        pin.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Challenge number used in `/escaperoom/challenge/<n>/...` addresses.
///
/// Several puzzles may share one challenge number; a reset for that number
/// reaches all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ChallengeId(u8);

impl ChallengeId {
    /// Create a new challenge id with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidChallenge` if the id is outside the valid range.
    pub fn new(id: u8) -> Result<Self> {
        if !(MIN_CHALLENGE_ID..=MAX_CHALLENGE_ID).contains(&id) {
            return Err(Error::InvalidChallenge(format!(
                "Challenge must be {MIN_CHALLENGE_ID}-{MAX_CHALLENGE_ID}, got {id}"
            )));
        }
        Ok(ChallengeId(id))
    }

    /// Const constructor for fixed challenge numbers.
    ///
    /// # Panics
    /// Panics if the id is outside the valid range. In a `const` item this
    /// is a compile error.
    #[must_use]
    pub const fn fixed(id: u8) -> Self {
        assert!(
            id >= MIN_CHALLENGE_ID && id <= MAX_CHALLENGE_ID,
            "challenge id out of range"
        );
        ChallengeId(id)
    }

    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ChallengeId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        ChallengeId::new(value)
    }
}

impl From<ChallengeId> for u8 {
    fn from(id: ChallengeId) -> Self {
        id.0
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChallengeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u8 = s
            .parse()
            .map_err(|_| Error::InvalidChallenge(format!("Not a number: {s}")))?;
        ChallengeId::new(id)
    }
}
